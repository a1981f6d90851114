//! The per-kind action builder.

use std::marker::PhantomData;
use std::time::Instant;

use metrics::{counter, histogram};
use simplekube_resources::Kind;

use crate::delete::DeleteAction;
use crate::get::GetAction;
use crate::list::ListAction;
use crate::put::{PutAction, PutVerb};
use crate::scope::{Cluster, Namespaced, Scope};

/// Callback run against the native object of kind `N`.
pub type DataHandler<N> = Box<dyn FnOnce(&mut N) -> anyhow::Result<()> + Send>;

/// Builds actions for kind `K` against scope `S`. Each verb consumes the
/// builder; facades hand out a fresh one per accessor call.
pub struct Action<K, S> {
    scope: S,
    _kind: PhantomData<fn() -> K>,
}

pub type ClusterAction<K> = Action<K, Cluster<<K as Kind>::Native>>;
pub type NamespacedAction<K> = Action<K, Namespaced<<K as Kind>::Native>>;

impl<K, S> Action<K, S>
where
    K: Kind,
    S: Scope<K::Native>,
{
    pub fn new(scope: S) -> Self {
        Self { scope, _kind: PhantomData }
    }

    pub fn get(self, name: impl Into<String>) -> GetAction<K, S> {
        GetAction::new(self.scope, name.into())
    }

    pub fn create(self, value: K) -> PutAction<K, S> {
        PutAction::new(self.scope, PutVerb::Create, value)
    }

    pub fn update(self, value: K) -> PutAction<K, S> {
        PutAction::new(self.scope, PutVerb::Update, value)
    }

    pub fn list(self) -> ListAction<K, S> {
        ListAction::new(self.scope)
    }

    pub fn delete(self, name: impl Into<String>) -> DeleteAction<K, S> {
        DeleteAction::new(self.scope, name.into())
    }
}

/// Record one finished `run()`.
pub(crate) fn observe(verb: &'static str, kind: &'static str, started: Instant, ok: bool) {
    counter!("simplekube_actions_total", 1, "verb" => verb, "kind" => kind);
    if !ok {
        counter!("simplekube_action_errors_total", 1, "verb" => verb, "kind" => kind);
    }
    histogram!("simplekube_action_latency_ms", started.elapsed().as_secs_f64() * 1000.0, "verb" => verb, "kind" => kind);
}
