//! Client wiring: where to find the cluster and how long to wait for it.

use std::time::Duration;

use anyhow::{Context as _, Result};
use kube::{config::KubeConfigOptions, Client, Config};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// kubeconfig context; `None` uses the current context.
    pub context: Option<String>,
    pub cluster: Option<String>,
    pub user: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
}

impl ClientConfig {
    /// Read `SIMPLEKUBE_*` overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            context: non_empty("SIMPLEKUBE_CONTEXT"),
            cluster: non_empty("SIMPLEKUBE_CLUSTER"),
            user: non_empty("SIMPLEKUBE_USER"),
            connect_timeout_secs: non_empty("SIMPLEKUBE_CONNECT_TIMEOUT_SECS").and_then(|s| s.parse().ok()),
            read_timeout_secs: non_empty("SIMPLEKUBE_READ_TIMEOUT_SECS").and_then(|s| s.parse().ok()),
        }
    }

    fn names_kubeconfig_entry(&self) -> bool {
        self.context.is_some() || self.cluster.is_some() || self.user.is_some()
    }

    /// Build a kube `Client`. Without kubeconfig overrides the configuration is
    /// inferred (local kubeconfig, then in-cluster service account).
    pub async fn connect(&self) -> Result<Client> {
        let mut config = if self.names_kubeconfig_entry() {
            let opts = KubeConfigOptions { context: self.context.clone(), cluster: self.cluster.clone(), user: self.user.clone() };
            Config::from_kubeconfig(&opts).await.context("loading kubeconfig")?
        } else {
            Config::infer().await.context("inferring kube config")?
        };
        if let Some(secs) = self.connect_timeout_secs {
            config.connect_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(secs) = self.read_timeout_secs {
            config.read_timeout = Some(Duration::from_secs(secs));
        }
        info!(context = ?self.context, cluster_url = %config.cluster_url, "kube client configured");
        Client::try_from(config).context("building kube client")
    }
}
