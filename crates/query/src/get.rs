use std::marker::PhantomData;
use std::time::Instant;

use simplekube_core::{format, Error, Result};
use simplekube_resources::Kind;
use tracing::debug;

use crate::action::{observe, DataHandler};
use crate::scope::Scope;

/// Fetch one object by name.
pub struct GetAction<K: Kind, S> {
    scope: S,
    name: String,
    handler: Option<DataHandler<K::Native>>,
    _kind: PhantomData<fn() -> K>,
}

impl<K, S> GetAction<K, S>
where
    K: Kind,
    S: Scope<K::Native>,
{
    pub(crate) fn new(scope: S, name: String) -> Self {
        Self { scope, name, handler: None, _kind: PhantomData }
    }

    /// Inspect or modify the fetched native object before it is loaded.
    /// An error aborts the action and is returned as is.
    pub fn data_handler<F>(mut self, handler: F) -> Self
    where
        F: FnOnce(&mut K::Native) -> anyhow::Result<()> + Send + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    pub async fn run(self) -> Result<K> {
        let started = Instant::now();
        let res = self.execute().await;
        observe("get", K::NAME, started, res.is_ok());
        res
    }

    async fn execute(self) -> Result<K> {
        let Self { scope, name, handler, .. } = self;
        debug!(kind = K::NAME, ns = ?scope.namespace(), name = %name, "get");
        let mut obj = scope.get(&name).await.map_err(format)?;
        if let Some(handler) = handler {
            handler(&mut obj).map_err(Error::Handler)?;
        }
        Ok(K::load(&obj)?)
    }
}
