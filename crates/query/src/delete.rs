use std::marker::PhantomData;
use std::time::Instant;

use simplekube_core::Result;
use simplekube_resources::Kind;
use tracing::debug;

use crate::action::observe;
use crate::scope::Scope;

/// Delete one object by name.
pub struct DeleteAction<K, S> {
    scope: S,
    name: String,
    _kind: PhantomData<fn() -> K>,
}

impl<K, S> DeleteAction<K, S>
where
    K: Kind,
    S: Scope<K::Native>,
{
    pub(crate) fn new(scope: S, name: String) -> Self {
        Self { scope, name, _kind: PhantomData }
    }

    pub async fn run(self) -> Result<()> {
        let started = Instant::now();
        debug!(kind = K::NAME, ns = ?self.scope.namespace(), name = %self.name, "delete");
        let res = self.scope.delete(&self.name).await;
        observe("delete", K::NAME, started, res.is_ok());
        res
    }
}
