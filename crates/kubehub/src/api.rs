use std::fmt::Debug;

use async_trait::async_trait;
use k8s_openapi::{ClusterResourceScope, NamespaceResourceScope};
use kube::Resource;
use serde::{de::DeserializeOwned, Serialize};
use simplekube_core::{Context, QueryOptions, Result};

/// A native wire object the backends know how to move.
pub trait NativeObject:
    Resource<DynamicType = ()> + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

impl<T> NativeObject for T where
    T: Resource<DynamicType = ()> + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

pub trait ClusterObject: NativeObject + Resource<Scope = ClusterResourceScope> {}

impl<T> ClusterObject for T where T: NativeObject + Resource<Scope = ClusterResourceScope> {}

pub trait NamespacedObject: NativeObject + Resource<Scope = NamespaceResourceScope> {}

impl<T> NamespacedObject for T where T: NativeObject + Resource<Scope = NamespaceResourceScope> {}

/// Uniform CRUD primitives for one cluster-scoped kind.
#[async_trait]
pub trait ClusterApi<N>: Send + Sync {
    /// Bind the request context. Called once, before any other call.
    fn configure(&mut self, ctx: Context);
    fn set_query_options(&mut self, opts: QueryOptions);

    async fn get(&self, name: &str) -> Result<N>;
    async fn create(&self, obj: &N) -> Result<()>;
    async fn update(&self, obj: &N) -> Result<()>;
    async fn list(&self) -> Result<Vec<N>>;
    async fn delete(&self, name: &str) -> Result<()>;
}

/// Uniform CRUD primitives for one namespace-scoped kind.
#[async_trait]
pub trait NamespacedApi<N>: Send + Sync {
    /// Bind the request context. Called once, before any other call.
    fn configure(&mut self, ctx: Context);
    fn set_query_options(&mut self, opts: QueryOptions);

    async fn get(&self, namespace: &str, name: &str) -> Result<N>;
    async fn create(&self, namespace: &str, obj: &N) -> Result<()>;
    async fn update(&self, namespace: &str, obj: &N) -> Result<()>;
    async fn list(&self, namespace: &str) -> Result<Vec<N>>;
    async fn delete(&self, namespace: &str, name: &str) -> Result<()>;
}

/// Handle to a cluster that can hand out adapters for any supported kind.
pub trait Backend: Clone + Send + Sync + 'static {
    fn cluster_api<N: ClusterObject>(&self) -> Box<dyn ClusterApi<N>>;
    fn namespaced_api<N: NamespacedObject>(&self) -> Box<dyn NamespacedApi<N>>;
}
