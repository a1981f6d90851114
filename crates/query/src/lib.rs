//! simplekube: typed queries over a fixed set of Kubernetes kinds.
//!
//! Pick a scope, pick a kind, pick a verb, add options, then `run()`:
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use simplekube::Client;
//!
//! let client = Client::try_default().await?;
//! let cronjobs = client
//!     .namespaced_query("default")
//!     .cron_job()
//!     .list()
//!     .filter_by_labels([("app", "backup")])
//!     .run()
//!     .await?;
//! # let _ = cronjobs;
//! # Ok(())
//! # }
//! ```
//!
//! The simplified values only cover common fields. `data_handler` gives access
//! to the native object: on `get` it runs after the fetch and before the value
//! is loaded, on `create`/`update` after the native object is built and before
//! it is sent.

#![forbid(unsafe_code)]

mod action;
mod delete;
mod get;
mod list;
mod put;
mod query;
mod scope;

pub use action::{Action, ClusterAction, DataHandler, NamespacedAction};
pub use delete::DeleteAction;
pub use get::GetAction;
pub use list::ListAction;
pub use put::{PutAction, PutVerb};
pub use query::{ClusterQuery, NamespacedQuery};
pub use scope::{Cluster, Namespaced, Scope};

pub use simplekube_core::{Context, Error, QueryOptions, Result, TranslateError, NOT_FOUND};
pub use simplekube_kubehub::{Backend, ClientConfig, KubeBackend};
pub use simplekube_resources as resources;

/// Entry point holding the request context and the backend handle.
#[derive(Clone)]
pub struct Client<B = KubeBackend> {
    ctx: Context,
    backend: B,
}

impl<B: Backend> Client<B> {
    pub fn new(ctx: Context, backend: B) -> Self {
        Self { ctx, backend }
    }

    /// Queries for kinds living inside `namespace`.
    pub fn namespaced_query(&self, namespace: impl Into<String>) -> NamespacedQuery<B> {
        NamespacedQuery::new(namespace, self.ctx.clone(), self.backend.clone())
    }

    /// Queries for cluster-scoped kinds.
    pub fn cluster_query(&self) -> ClusterQuery<B> {
        ClusterQuery::new(self.ctx.clone(), self.backend.clone())
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl Client<KubeBackend> {
    /// Kube backend configured from the environment, background context.
    pub async fn try_default() -> anyhow::Result<Self> {
        Ok(Self::new(Context::background(), KubeBackend::try_default().await?))
    }
}
