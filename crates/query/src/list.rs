use std::marker::PhantomData;
use std::time::Instant;

use simplekube_core::{flatten_labels, QueryOptions, Result};
use simplekube_resources::Kind;
use tracing::debug;

use crate::action::observe;
use crate::scope::Scope;

/// List objects, optionally narrowed by labels.
pub struct ListAction<K, S> {
    scope: S,
    opts: QueryOptions,
    _kind: PhantomData<fn() -> K>,
}

impl<K, S> ListAction<K, S>
where
    K: Kind,
    S: Scope<K::Native>,
{
    pub(crate) fn new(scope: S) -> Self {
        Self { scope, opts: QueryOptions::default(), _kind: PhantomData }
    }

    /// Only return objects carrying every given `key=value` label.
    /// Replaces any previously set label filter.
    pub fn filter_by_labels<I, Key, Val>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (Key, Val)>,
        Key: AsRef<str>,
        Val: AsRef<str>,
    {
        self.opts.list.label_selector = flatten_labels(labels);
        self
    }

    pub fn query_options(&self) -> &QueryOptions {
        &self.opts
    }

    pub async fn run(self) -> Result<Vec<K>> {
        let (items, res) = self.run_partial().await;
        res.map(|()| items)
    }

    /// Like [`run`](Self::run), but on a translation failure also hands back
    /// the items loaded before it, in backend order.
    pub async fn run_partial(self) -> (Vec<K>, Result<()>) {
        let started = Instant::now();
        let (items, res) = self.execute().await;
        observe("list", K::NAME, started, res.is_ok());
        (items, res)
    }

    async fn execute(self) -> (Vec<K>, Result<()>) {
        let Self { mut scope, opts, .. } = self;
        debug!(kind = K::NAME, ns = ?scope.namespace(), selector = %opts.list.label_selector, "list");
        scope.set_query_options(opts);
        let objs = match scope.list().await {
            Ok(objs) => objs,
            Err(err) => return (Vec::new(), Err(err)),
        };
        let mut items = Vec::with_capacity(objs.len());
        for obj in &objs {
            match K::load(obj) {
                Ok(item) => items.push(item),
                Err(err) => return (items, Err(err.into())),
            }
        }
        (items, Ok(()))
    }
}
