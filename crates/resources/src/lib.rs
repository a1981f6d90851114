//! simplekube resources: the supported kinds.
//!
//! Each kind is a flat value type plus a translation to and from the native
//! `k8s-openapi` object, and knows which backend adapter serves it. The set is
//! closed: [`ClusterKind`] and [`NamespacedKind`] cannot be implemented
//! outside this crate.

#![forbid(unsafe_code)]

use std::fmt::Debug;

use simplekube_core::TranslateError;
use simplekube_kubehub::{Backend, ClusterApi, NamespacedApi, NativeObject};

mod common;
mod configmap;
mod cronjob;
mod deployment;
mod hpa;
mod ingress;
mod job;
mod namespace;
mod service;

pub use common::{Container, ContainerPort, ContainerResources, EnvVar, Labels, RestartPolicy};
pub use configmap::ConfigMap;
pub use cronjob::{CronJob, CronJobBehaviour};
pub use deployment::Deployment;
pub use hpa::{Hpa, HpaMetric, HpaResourceMetric, HpaTarget};
pub use ingress::{Ingress, IngressPathDef, PathType};
pub use job::{Job, JobBehaviour};
pub use namespace::Namespace;
pub use service::Service;

mod sealed {
    pub trait Sealed {}
}

/// A supported resource kind: its simplified value and translation contract.
pub trait Kind: Clone + Debug + Default + PartialEq + Send + Sync + 'static + sealed::Sealed {
    /// The native wire object this kind translates to.
    type Native: NativeObject;

    /// Short name used in logs and metrics.
    const NAME: &'static str;

    /// Simplified value -> native object.
    fn dump(&self) -> Result<Self::Native, TranslateError>;

    /// Native object -> simplified value.
    fn load(native: &Self::Native) -> Result<Self, TranslateError>;
}

pub trait ClusterKind: Kind {
    /// Unconfigured adapter for this kind.
    fn api<B: Backend>(backend: &B) -> Box<dyn ClusterApi<Self::Native>>;
}

pub trait NamespacedKind: Kind {
    /// Unconfigured adapter for this kind.
    fn api<B: Backend>(backend: &B) -> Box<dyn NamespacedApi<Self::Native>>;
}

macro_rules! cluster_kinds {
    ($($kind:ty),* $(,)?) => {$(
        impl sealed::Sealed for $kind {}
        impl ClusterKind for $kind {
            fn api<B: Backend>(backend: &B) -> Box<dyn ClusterApi<Self::Native>> {
                backend.cluster_api()
            }
        }
    )*};
}

macro_rules! namespaced_kinds {
    ($($kind:ty),* $(,)?) => {$(
        impl sealed::Sealed for $kind {}
        impl NamespacedKind for $kind {
            fn api<B: Backend>(backend: &B) -> Box<dyn NamespacedApi<Self::Native>> {
                backend.namespaced_api()
            }
        }
    )*};
}

cluster_kinds!(Namespace);
namespaced_kinds!(Deployment, Service, Job, CronJob, ConfigMap, Ingress, Hpa);
