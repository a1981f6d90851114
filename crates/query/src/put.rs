use std::time::Instant;

use simplekube_core::{Error, Result};
use simplekube_resources::Kind;
use tracing::debug;

use crate::action::{observe, DataHandler};
use crate::scope::Scope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutVerb {
    Create,
    Update,
}

impl PutVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            PutVerb::Create => "create",
            PutVerb::Update => "update",
        }
    }
}

/// Write one object: dump, optional handler, then a single backend call.
pub struct PutAction<K: Kind, S> {
    scope: S,
    verb: PutVerb,
    value: K,
    handler: Option<DataHandler<K::Native>>,
}

impl<K, S> PutAction<K, S>
where
    K: Kind,
    S: Scope<K::Native>,
{
    pub(crate) fn new(scope: S, verb: PutVerb, value: K) -> Self {
        Self { scope, verb, value, handler: None }
    }

    pub fn verb(&self) -> PutVerb {
        self.verb
    }

    /// Adjust the native object before it is sent. An error aborts the
    /// action before anything reaches the backend.
    pub fn data_handler<F>(mut self, handler: F) -> Self
    where
        F: FnOnce(&mut K::Native) -> anyhow::Result<()> + Send + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub async fn run(self) -> Result<()> {
        let started = Instant::now();
        let verb = self.verb;
        let res = self.execute().await;
        observe(verb.as_str(), K::NAME, started, res.is_ok());
        res
    }

    async fn execute(self) -> Result<()> {
        let Self { scope, verb, value, handler } = self;
        let mut obj = value.dump()?;
        if let Some(handler) = handler {
            handler(&mut obj).map_err(Error::Handler)?;
        }
        debug!(kind = K::NAME, ns = ?scope.namespace(), verb = verb.as_str(), "put");
        match verb {
            PutVerb::Create => scope.create(&obj).await,
            PutVerb::Update => scope.update(&obj).await,
        }
    }
}
