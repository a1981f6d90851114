//! Query facades: one accessor per supported kind.

use simplekube_core::Context;
use simplekube_kubehub::Backend;
use simplekube_resources::{
    ClusterKind, ConfigMap, CronJob, Deployment, Hpa, Ingress, Job, Namespace, NamespacedKind, Service,
};

use crate::action::{Action, ClusterAction, NamespacedAction};
use crate::scope::{Cluster, Namespaced};

/// Cluster-scoped kinds.
#[derive(Clone)]
pub struct ClusterQuery<B> {
    ctx: Context,
    backend: B,
}

impl<B: Backend> ClusterQuery<B> {
    pub fn new(ctx: Context, backend: B) -> Self {
        Self { ctx, backend }
    }

    fn action<K: ClusterKind>(&self) -> ClusterAction<K> {
        let mut api = K::api(&self.backend);
        api.configure(self.ctx.clone());
        Action::new(Cluster::new(api))
    }

    pub fn namespace(&self) -> ClusterAction<Namespace> {
        self.action()
    }
}

/// Namespace-scoped kinds, all bound to one namespace.
#[derive(Clone)]
pub struct NamespacedQuery<B> {
    namespace: String,
    ctx: Context,
    backend: B,
}

impl<B: Backend> NamespacedQuery<B> {
    pub fn new(namespace: impl Into<String>, ctx: Context, backend: B) -> Self {
        Self { namespace: namespace.into(), ctx, backend }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn action<K: NamespacedKind>(&self) -> NamespacedAction<K> {
        let mut api = K::api(&self.backend);
        api.configure(self.ctx.clone());
        Action::new(Namespaced::new(self.namespace.clone(), api))
    }

    pub fn deployment(&self) -> NamespacedAction<Deployment> {
        self.action()
    }

    pub fn service(&self) -> NamespacedAction<Service> {
        self.action()
    }

    pub fn job(&self) -> NamespacedAction<Job> {
        self.action()
    }

    pub fn cron_job(&self) -> NamespacedAction<CronJob> {
        self.action()
    }

    pub fn config_map(&self) -> NamespacedAction<ConfigMap> {
        self.action()
    }

    pub fn ingress(&self) -> NamespacedAction<Ingress> {
        self.action()
    }

    pub fn hpa(&self) -> NamespacedAction<Hpa> {
        self.action()
    }
}
