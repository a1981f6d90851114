//! Where an action's backend calls go: the whole cluster or one namespace.

use async_trait::async_trait;
use simplekube_core::{QueryOptions, Result};
use simplekube_kubehub::{ClusterApi, NamespacedApi};

mod sealed {
    pub trait Sealed {}
}

/// Backend calls with the namespace (if any) already bound.
#[async_trait]
pub trait Scope<N>: Send + Sync + sealed::Sealed {
    fn namespace(&self) -> Option<&str>;
    fn set_query_options(&mut self, opts: QueryOptions);

    async fn get(&self, name: &str) -> Result<N>;
    async fn create(&self, obj: &N) -> Result<()>;
    async fn update(&self, obj: &N) -> Result<()>;
    async fn list(&self) -> Result<Vec<N>>;
    async fn delete(&self, name: &str) -> Result<()>;
}

pub struct Cluster<N> {
    api: Box<dyn ClusterApi<N>>,
}

impl<N> Cluster<N> {
    pub fn new(api: Box<dyn ClusterApi<N>>) -> Self {
        Self { api }
    }
}

pub struct Namespaced<N> {
    namespace: String,
    api: Box<dyn NamespacedApi<N>>,
}

impl<N> Namespaced<N> {
    pub fn new(namespace: impl Into<String>, api: Box<dyn NamespacedApi<N>>) -> Self {
        Self { namespace: namespace.into(), api }
    }
}

impl<N> sealed::Sealed for Cluster<N> {}
impl<N> sealed::Sealed for Namespaced<N> {}

#[async_trait]
impl<N: Send + Sync + 'static> Scope<N> for Cluster<N> {
    fn namespace(&self) -> Option<&str> {
        None
    }

    fn set_query_options(&mut self, opts: QueryOptions) {
        self.api.set_query_options(opts);
    }

    async fn get(&self, name: &str) -> Result<N> {
        self.api.get(name).await
    }

    async fn create(&self, obj: &N) -> Result<()> {
        self.api.create(obj).await
    }

    async fn update(&self, obj: &N) -> Result<()> {
        self.api.update(obj).await
    }

    async fn list(&self) -> Result<Vec<N>> {
        self.api.list().await
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.api.delete(name).await
    }
}

#[async_trait]
impl<N: Send + Sync + 'static> Scope<N> for Namespaced<N> {
    fn namespace(&self) -> Option<&str> {
        Some(&self.namespace)
    }

    fn set_query_options(&mut self, opts: QueryOptions) {
        self.api.set_query_options(opts);
    }

    async fn get(&self, name: &str) -> Result<N> {
        self.api.get(&self.namespace, name).await
    }

    async fn create(&self, obj: &N) -> Result<()> {
        self.api.create(&self.namespace, obj).await
    }

    async fn update(&self, obj: &N) -> Result<()> {
        self.api.update(&self.namespace, obj).await
    }

    async fn list(&self) -> Result<Vec<N>> {
        self.api.list(&self.namespace).await
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.api.delete(&self.namespace, name).await
    }
}
