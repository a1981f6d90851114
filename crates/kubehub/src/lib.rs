//! simplekube kubehub: backend adapter contracts and the kube-rs backend.

#![forbid(unsafe_code)]

mod api;
mod config;
mod kube_api;

pub use api::{Backend, ClusterApi, ClusterObject, NamespacedApi, NamespacedObject, NativeObject};
pub use config::ClientConfig;
pub use kube_api::{KubeApi, KubeBackend};
