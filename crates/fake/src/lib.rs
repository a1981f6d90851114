//! simplekube fake: an in-memory cluster for tests.
//!
//! Objects are kept as JSON keyed by resource plural, namespace and name.
//! Misses and conflicts come back as the same `kube::Error::Api` responses a
//! real API server would send, and every call that reaches the store is
//! recorded so tests can count backend round trips.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use kube::core::ErrorResponse;
use serde_json::Value as Json;
use simplekube_core::{Context, Error, QueryOptions, Result};
use simplekube_kubehub::{Backend, ClusterApi, ClusterObject, NamespacedApi, NamespacedObject, NativeObject};
use tracing::trace;

mod selector;

pub use selector::LabelSelector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Create,
    Update,
    List,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Create => "create",
            Verb::Update => "update",
            Verb::List => "list",
            Verb::Delete => "delete",
        }
    }
}

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub verb: Verb,
    /// Resource plural, e.g. `configmaps`.
    pub resource: String,
    pub namespace: Option<String>,
    pub name: Option<String>,
}

impl Action {
    pub fn matches(&self, verb: &str, resource: &str) -> bool {
        self.verb.as_str() == verb && self.resource == resource
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ObjectKey {
    resource: String,
    namespace: Option<String>,
    name: String,
}

#[derive(Default)]
struct State {
    objects: BTreeMap<ObjectKey, Json>,
    actions: Vec<Action>,
}

/// Shared handle to the in-memory cluster. Clones see the same objects.
#[derive(Clone, Default)]
pub struct FakeCluster {
    state: Arc<Mutex<State>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `obj` as is, without recording an action. Namespaced objects
    /// must carry `metadata.namespace`.
    pub fn seed<N: NativeObject>(&self, obj: N) -> Result<()> {
        let meta = obj.meta();
        let name = meta.name.clone().ok_or(Error::MissingName)?;
        let key = ObjectKey { resource: resource_of::<N>(), namespace: meta.namespace.clone(), name };
        let value = serde_json::to_value(&obj)?;
        self.state().objects.insert(key, value);
        Ok(())
    }

    /// Builder form of [`seed`](Self::seed).
    pub fn with<N: NativeObject>(self, obj: N) -> Result<Self> {
        self.seed(obj)?;
        Ok(self)
    }

    /// Read an object without recording an action.
    pub fn object<N: NativeObject>(&self, namespace: Option<&str>, name: &str) -> Option<N> {
        let key = ObjectKey { resource: resource_of::<N>(), namespace: namespace.map(str::to_string), name: name.to_string() };
        let value = self.state().objects.get(&key).cloned()?;
        serde_json::from_value(value).ok()
    }

    pub fn actions(&self) -> Vec<Action> {
        self.state().actions.clone()
    }

    pub fn clear_actions(&self) {
        self.state().actions.clear();
    }
}

impl Backend for FakeCluster {
    fn cluster_api<N: ClusterObject>(&self) -> Box<dyn ClusterApi<N>> {
        Box::new(FakeApi::<N>::new(self.clone()))
    }

    fn namespaced_api<N: NamespacedObject>(&self) -> Box<dyn NamespacedApi<N>> {
        Box::new(FakeApi::<N>::new(self.clone()))
    }
}

fn resource_of<N: NativeObject>() -> String {
    N::plural(&()).into_owned()
}

fn api_error(code: u16, reason: &str, message: String) -> Error {
    Error::Kube(kube::Error::Api(ErrorResponse { status: "Failure".into(), message, reason: reason.into(), code }))
}

fn labels_of(value: &Json) -> BTreeMap<String, String> {
    value
        .pointer("/metadata/labels")
        .and_then(Json::as_object)
        .map(|m| m.iter().filter_map(|(k, v)| Some((k.clone(), v.as_str()?.to_string()))).collect())
        .unwrap_or_default()
}

/// Adapter for one kind over a [`FakeCluster`].
pub struct FakeApi<N> {
    cluster: FakeCluster,
    ctx: Context,
    opts: QueryOptions,
    _kind: PhantomData<fn() -> N>,
}

impl<N: NativeObject> FakeApi<N> {
    pub fn new(cluster: FakeCluster) -> Self {
        Self { cluster, ctx: Context::background(), opts: QueryOptions::default(), _kind: PhantomData }
    }

    fn key(&self, namespace: Option<&str>, name: &str) -> ObjectKey {
        ObjectKey { resource: resource_of::<N>(), namespace: namespace.map(str::to_string), name: name.to_string() }
    }

    fn record(state: &mut State, verb: Verb, namespace: Option<&str>, name: Option<&str>) {
        let action = Action {
            verb,
            resource: resource_of::<N>(),
            namespace: namespace.map(str::to_string),
            name: name.map(str::to_string),
        };
        trace!(verb = verb.as_str(), resource = %action.resource, ns = ?namespace, name = ?name, "fake call");
        state.actions.push(action);
    }

    fn not_found(name: &str) -> Error {
        api_error(404, "NotFound", format!("{} \"{}\" not found", resource_of::<N>(), name))
    }

    fn get_now(&self, namespace: Option<&str>, name: &str) -> Result<N> {
        let mut state = self.cluster.state();
        Self::record(&mut state, Verb::Get, namespace, Some(name));
        let value = state.objects.get(&self.key(namespace, name)).cloned().ok_or_else(|| Self::not_found(name))?;
        Ok(serde_json::from_value(value)?)
    }

    fn encode(namespace: Option<&str>, obj: &N) -> Result<(String, Json)> {
        let meta = obj.meta();
        let name = meta.name.clone().ok_or(Error::MissingName)?;
        if let (Some(ns), Some(own)) = (namespace, meta.namespace.as_deref()) {
            if ns != own {
                return Err(api_error(
                    400,
                    "BadRequest",
                    "the namespace of the provided object does not match the namespace sent on the request".into(),
                ));
            }
        }
        let mut value = serde_json::to_value(obj)?;
        if let (Some(ns), Some(meta)) = (namespace, value.get_mut("metadata").and_then(Json::as_object_mut)) {
            meta.insert("namespace".into(), Json::String(ns.to_string()));
        }
        Ok((name, value))
    }

    fn create_now(&self, namespace: Option<&str>, obj: &N) -> Result<()> {
        let (name, value) = Self::encode(namespace, obj)?;
        let mut state = self.cluster.state();
        Self::record(&mut state, Verb::Create, namespace, Some(&name));
        let key = self.key(namespace, &name);
        if state.objects.contains_key(&key) {
            return Err(api_error(
                409,
                "AlreadyExists",
                format!("{} \"{}\" already exists", resource_of::<N>(), name),
            ));
        }
        state.objects.insert(key, value);
        Ok(())
    }

    fn update_now(&self, namespace: Option<&str>, obj: &N) -> Result<()> {
        let (name, value) = Self::encode(namespace, obj)?;
        let mut state = self.cluster.state();
        Self::record(&mut state, Verb::Update, namespace, Some(&name));
        match state.objects.get_mut(&self.key(namespace, &name)) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(Self::not_found(&name)),
        }
    }

    fn list_now(&self, namespace: Option<&str>) -> Result<Vec<N>> {
        let selector = LabelSelector::parse(&self.opts.list.label_selector)
            .map_err(|msg| api_error(400, "BadRequest", msg))?;
        let mut state = self.cluster.state();
        Self::record(&mut state, Verb::List, namespace, None);
        let resource = resource_of::<N>();
        let items = state
            .objects
            .iter()
            .filter(|(key, _)| key.resource == resource && key.namespace.as_deref() == namespace)
            .filter(|(_, value)| selector.matches(&labels_of(value)))
            .map(|(_, value)| serde_json::from_value(value.clone()))
            .collect::<Result<Vec<N>, _>>()?;
        Ok(items)
    }

    fn delete_now(&self, namespace: Option<&str>, name: &str) -> Result<()> {
        let mut state = self.cluster.state();
        Self::record(&mut state, Verb::Delete, namespace, Some(name));
        match state.objects.remove(&self.key(namespace, name)) {
            Some(_) => Ok(()),
            None => Err(Self::not_found(name)),
        }
    }
}

#[async_trait]
impl<N: ClusterObject> ClusterApi<N> for FakeApi<N> {
    fn configure(&mut self, ctx: Context) {
        self.ctx = ctx;
    }

    fn set_query_options(&mut self, opts: QueryOptions) {
        self.opts = opts;
    }

    async fn get(&self, name: &str) -> Result<N> {
        self.ctx.run(async { self.get_now(None, name) }).await
    }

    async fn create(&self, obj: &N) -> Result<()> {
        self.ctx.run(async { self.create_now(None, obj) }).await
    }

    async fn update(&self, obj: &N) -> Result<()> {
        self.ctx.run(async { self.update_now(None, obj) }).await
    }

    async fn list(&self) -> Result<Vec<N>> {
        self.ctx.run(async { self.list_now(None) }).await
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.ctx.run(async { self.delete_now(None, name) }).await
    }
}

#[async_trait]
impl<N: NamespacedObject> NamespacedApi<N> for FakeApi<N> {
    fn configure(&mut self, ctx: Context) {
        self.ctx = ctx;
    }

    fn set_query_options(&mut self, opts: QueryOptions) {
        self.opts = opts;
    }

    async fn get(&self, namespace: &str, name: &str) -> Result<N> {
        self.ctx.run(async { self.get_now(Some(namespace), name) }).await
    }

    async fn create(&self, namespace: &str, obj: &N) -> Result<()> {
        self.ctx.run(async { self.create_now(Some(namespace), obj) }).await
    }

    async fn update(&self, namespace: &str, obj: &N) -> Result<()> {
        self.ctx.run(async { self.update_now(Some(namespace), obj) }).await
    }

    async fn list(&self, namespace: &str) -> Result<Vec<N>> {
        self.ctx.run(async { self.list_now(Some(namespace)) }).await
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<()> {
        self.ctx.run(async { self.delete_now(Some(namespace), name) }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{ConfigMap, Namespace};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn cm(name: &str, ns: &str, labels: &[(&str, &str)]) -> ConfigMap {
        ConfigMap {
            metadata: ObjectMeta {
                name: Some(name.into()),
                namespace: Some(ns.into()),
                labels: Some(labels.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn namespaced(cluster: &FakeCluster) -> Box<dyn NamespacedApi<ConfigMap>> {
        cluster.namespaced_api::<ConfigMap>()
    }

    #[tokio::test]
    async fn get_missing_object_is_a_404() {
        let cluster = FakeCluster::new();
        let err = namespaced(&cluster).get("default", "nope").await.unwrap_err();
        match err {
            Error::Kube(kube::Error::Api(ae)) => {
                assert_eq!(ae.code, 404);
                assert_eq!(ae.reason, "NotFound");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(cluster.actions().len(), 1);
        assert!(cluster.actions()[0].matches("get", "configmaps"));
    }

    #[tokio::test]
    async fn create_twice_conflicts() {
        let cluster = FakeCluster::new();
        let api = namespaced(&cluster);
        api.create("default", &cm("a", "default", &[])).await.unwrap();
        let err = api.create("default", &cm("a", "default", &[])).await.unwrap_err();
        assert!(matches!(err, Error::Kube(kube::Error::Api(ref ae)) if ae.code == 409));
    }

    #[tokio::test]
    async fn create_sets_request_namespace() {
        let cluster = FakeCluster::new();
        let mut obj = cm("a", "default", &[]);
        obj.metadata.namespace = None;
        namespaced(&cluster).create("team", &obj).await.unwrap();
        let stored: ConfigMap = cluster.object(Some("team"), "a").unwrap();
        assert_eq!(stored.metadata.namespace.as_deref(), Some("team"));
    }

    #[tokio::test]
    async fn mismatched_namespace_is_rejected() {
        let cluster = FakeCluster::new();
        let err = namespaced(&cluster).create("other", &cm("a", "default", &[])).await.unwrap_err();
        assert!(matches!(err, Error::Kube(kube::Error::Api(ref ae)) if ae.code == 400));
    }

    #[tokio::test]
    async fn list_is_scoped_and_filtered() {
        let cluster = FakeCluster::new()
            .with(cm("a", "default", &[("app", "nginx")]))
            .unwrap()
            .with(cm("b", "default", &[("app", "redis")]))
            .unwrap()
            .with(cm("c", "other", &[("app", "nginx")]))
            .unwrap();
        let mut api = namespaced(&cluster);
        assert_eq!(api.list("default").await.unwrap().len(), 2);

        let mut opts = QueryOptions::default();
        opts.list.label_selector = "app=nginx".into();
        api.set_query_options(opts);
        let items = api.list("default").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].metadata.name.as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn cluster_scoped_objects_have_no_namespace() {
        let cluster = FakeCluster::new();
        let api = cluster.cluster_api::<Namespace>();
        let ns = Namespace { metadata: ObjectMeta { name: Some("team".into()), ..Default::default() }, ..Default::default() };
        api.create(&ns).await.unwrap();
        assert!(api.get("team").await.is_ok());
        assert_eq!(cluster.actions()[0].namespace, None);
    }

    #[tokio::test]
    async fn cancelled_context_records_nothing() {
        let cluster = FakeCluster::new();
        let mut api = namespaced(&cluster);
        let ctx = Context::background().with_cancel();
        ctx.cancel();
        api.configure(ctx);
        assert!(matches!(api.get("default", "a").await, Err(Error::Cancelled)));
        assert!(cluster.actions().is_empty());
    }
}
