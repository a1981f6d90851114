//! Backend adapters over a kube-rs `Client`.

use std::marker::PhantomData;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use kube::{
    api::{Api, DeleteParams, ListParams, PostParams},
    Client, Resource,
};
use simplekube_core::{Context, Error, QueryOptions, Result};
use tracing::debug;

use crate::api::{Backend, ClusterApi, ClusterObject, NamespacedApi, NamespacedObject};
use crate::config::ClientConfig;

/// Backend talking to a real API server.
#[derive(Clone)]
pub struct KubeBackend {
    client: Client,
}

impl KubeBackend {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using [`ClientConfig::from_env`].
    pub async fn try_default() -> AnyResult<Self> {
        let client = ClientConfig::from_env().connect().await?;
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl From<Client> for KubeBackend {
    fn from(client: Client) -> Self {
        Self::new(client)
    }
}

impl Backend for KubeBackend {
    fn cluster_api<N: ClusterObject>(&self) -> Box<dyn ClusterApi<N>> {
        Box::new(KubeApi::<N>::new(self.client.clone()))
    }

    fn namespaced_api<N: NamespacedObject>(&self) -> Box<dyn NamespacedApi<N>> {
        Box::new(KubeApi::<N>::new(self.client.clone()))
    }
}

/// Adapter for one kind. Serves both scopes; the kind's scope decides which
/// contract applies.
pub struct KubeApi<N> {
    client: Client,
    ctx: Context,
    opts: QueryOptions,
    _kind: PhantomData<fn() -> N>,
}

impl<N> KubeApi<N> {
    pub fn new(client: Client) -> Self {
        Self { client, ctx: Context::background(), opts: QueryOptions::default(), _kind: PhantomData }
    }

    fn list_params(&self) -> ListParams {
        match self.opts.label_selector() {
            Some(selector) => ListParams::default().labels(selector),
            None => ListParams::default(),
        }
    }
}

fn object_name<N: Resource>(obj: &N) -> Result<String> {
    obj.meta().name.clone().ok_or(Error::MissingName)
}

#[async_trait]
impl<N: ClusterObject> ClusterApi<N> for KubeApi<N> {
    fn configure(&mut self, ctx: Context) {
        self.ctx = ctx;
    }

    fn set_query_options(&mut self, opts: QueryOptions) {
        self.opts = opts;
    }

    async fn get(&self, name: &str) -> Result<N> {
        let api: Api<N> = Api::all(self.client.clone());
        self.ctx.run(api.get(name)).await
    }

    async fn create(&self, obj: &N) -> Result<()> {
        let api: Api<N> = Api::all(self.client.clone());
        self.ctx.run(async { api.create(&PostParams::default(), obj).await.map(|_| ()) }).await
    }

    async fn update(&self, obj: &N) -> Result<()> {
        let name = object_name(obj)?;
        let api: Api<N> = Api::all(self.client.clone());
        self.ctx.run(async { api.replace(&name, &PostParams::default(), obj).await.map(|_| ()) }).await
    }

    async fn list(&self) -> Result<Vec<N>> {
        let api: Api<N> = Api::all(self.client.clone());
        let lp = self.list_params();
        debug!(kind = %N::kind(&()), selector = ?lp.label_selector, "listing cluster objects");
        self.ctx.run(async { api.list(&lp).await.map(|list| list.items) }).await
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let api: Api<N> = Api::all(self.client.clone());
        self.ctx.run(async { api.delete(name, &DeleteParams::default()).await.map(|_| ()) }).await
    }
}

#[async_trait]
impl<N: NamespacedObject> NamespacedApi<N> for KubeApi<N> {
    fn configure(&mut self, ctx: Context) {
        self.ctx = ctx;
    }

    fn set_query_options(&mut self, opts: QueryOptions) {
        self.opts = opts;
    }

    async fn get(&self, namespace: &str, name: &str) -> Result<N> {
        let api: Api<N> = Api::namespaced(self.client.clone(), namespace);
        self.ctx.run(api.get(name)).await
    }

    async fn create(&self, namespace: &str, obj: &N) -> Result<()> {
        let api: Api<N> = Api::namespaced(self.client.clone(), namespace);
        self.ctx.run(async { api.create(&PostParams::default(), obj).await.map(|_| ()) }).await
    }

    async fn update(&self, namespace: &str, obj: &N) -> Result<()> {
        let name = object_name(obj)?;
        let api: Api<N> = Api::namespaced(self.client.clone(), namespace);
        self.ctx.run(async { api.replace(&name, &PostParams::default(), obj).await.map(|_| ()) }).await
    }

    async fn list(&self, namespace: &str) -> Result<Vec<N>> {
        let api: Api<N> = Api::namespaced(self.client.clone(), namespace);
        let lp = self.list_params();
        debug!(kind = %N::kind(&()), ns = %namespace, selector = ?lp.label_selector, "listing namespaced objects");
        self.ctx.run(async { api.list(&lp).await.map(|list| list.items) }).await
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<()> {
        let api: Api<N> = Api::namespaced(self.client.clone(), namespace);
        self.ctx.run(async { api.delete(name, &DeleteParams::default()).await.map(|_| ()) }).await
    }
}
