//! Pieces shared by several kinds: metadata, containers and pod templates.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1 as core;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::{Deserialize, Serialize};
use simplekube_core::TranslateError;

pub type Labels = BTreeMap<String, String>;

pub(crate) fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}

pub(crate) fn non_empty_map(m: &Labels) -> Option<Labels> {
    if m.is_empty() { None } else { Some(m.clone()) }
}

pub(crate) fn non_empty_vec<T>(v: Vec<T>) -> Option<Vec<T>> {
    if v.is_empty() { None } else { Some(v) }
}

pub(crate) fn non_zero<T: Default + PartialEq>(v: T) -> Option<T> {
    if v == T::default() { None } else { Some(v) }
}

pub(crate) fn object_meta(name: &str, labels: &Labels) -> ObjectMeta {
    ObjectMeta { name: non_empty(name), labels: non_empty_map(labels), ..Default::default() }
}

pub(crate) fn meta_name(meta: &ObjectMeta) -> String {
    meta.name.clone().unwrap_or_default()
}

pub(crate) fn meta_labels(meta: &ObjectMeta) -> Labels {
    meta.labels.clone().unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartPolicy {
    Always,
    OnFailure,
    Never,
}

impl RestartPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestartPolicy::Always => "Always",
            RestartPolicy::OnFailure => "OnFailure",
            RestartPolicy::Never => "Never",
        }
    }

    pub(crate) fn parse(s: &str) -> Result<Self, TranslateError> {
        match s {
            "Always" => Ok(RestartPolicy::Always),
            "OnFailure" => Ok(RestartPolicy::OnFailure),
            "Never" => Ok(RestartPolicy::Never),
            other => Err(TranslateError::invalid("restartPolicy", other)),
        }
    }
}

/// Batch pods must name `OnFailure` or `Never`; left unset the server would
/// default to `Always` and refuse the object.
pub(crate) fn batch_restart_policy(
    policy: Option<RestartPolicy>,
    field: &'static str,
) -> Result<RestartPolicy, TranslateError> {
    match policy {
        Some(p @ (RestartPolicy::OnFailure | RestartPolicy::Never)) => Ok(p),
        Some(RestartPolicy::Always) => Err(TranslateError::invalid(field, RestartPolicy::Always.as_str())),
        None => Err(TranslateError::invalid(field, "")),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub name: String,
    pub image: String,
    pub ports: Vec<ContainerPort>,
    pub command: Vec<String>,
    /// Resource limits.
    pub resources: Option<ContainerResources>,
    pub env: Vec<EnvVar>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerPort {
    pub port: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerResources {
    pub cpu: String,
    pub memory: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

impl Container {
    pub(crate) fn dump(&self) -> core::Container {
        // `Some` with both fields empty still sends an empty `limits` map.
        let limits = self.resources.as_ref().map(|r| {
            let mut limits = BTreeMap::new();
            if !r.cpu.is_empty() {
                limits.insert("cpu".to_string(), Quantity(r.cpu.clone()));
            }
            if !r.memory.is_empty() {
                limits.insert("memory".to_string(), Quantity(r.memory.clone()));
            }
            limits
        });
        core::Container {
            name: self.name.clone(),
            image: non_empty(&self.image),
            ports: non_empty_vec(
                self.ports.iter().map(|p| core::ContainerPort { container_port: p.port, ..Default::default() }).collect(),
            ),
            command: non_empty_vec(self.command.clone()),
            resources: limits.map(|limits| core::ResourceRequirements { limits: Some(limits), ..Default::default() }),
            env: non_empty_vec(
                self.env
                    .iter()
                    .map(|e| core::EnvVar { name: e.name.clone(), value: non_empty(&e.value), ..Default::default() })
                    .collect(),
            ),
            ..Default::default()
        }
    }

    pub(crate) fn load(c: &core::Container) -> Self {
        let resources = c.resources.as_ref().and_then(|r| r.limits.as_ref()).map(|limits| ContainerResources {
            cpu: limits.get("cpu").map(|q| q.0.clone()).unwrap_or_default(),
            memory: limits.get("memory").map(|q| q.0.clone()).unwrap_or_default(),
        });
        Self {
            name: c.name.clone(),
            image: c.image.clone().unwrap_or_default(),
            ports: c.ports.iter().flatten().map(|p| ContainerPort { port: p.container_port }).collect(),
            command: c.command.clone().unwrap_or_default(),
            resources,
            env: c
                .env
                .iter()
                .flatten()
                .map(|e| EnvVar { name: e.name.clone(), value: e.value.clone().unwrap_or_default() })
                .collect(),
        }
    }
}

/// The pod-level fields the workload kinds expose.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct PodShape {
    pub service_account: String,
    pub containers: Vec<Container>,
    pub node_selector: Labels,
    pub template_labels: Labels,
    pub restart_policy: Option<RestartPolicy>,
}

impl PodShape {
    pub(crate) fn dump(&self) -> core::PodTemplateSpec {
        let metadata = non_empty_map(&self.template_labels).map(|labels| ObjectMeta { labels: Some(labels), ..Default::default() });
        core::PodTemplateSpec {
            metadata,
            spec: Some(core::PodSpec {
                service_account_name: non_empty(&self.service_account),
                containers: self.containers.iter().map(Container::dump).collect(),
                node_selector: non_empty_map(&self.node_selector),
                restart_policy: self.restart_policy.map(|p| p.as_str().to_string()),
                ..Default::default()
            }),
        }
    }

    pub(crate) fn load(template: &core::PodTemplateSpec) -> Result<Self, TranslateError> {
        let template_labels = template.metadata.as_ref().map(meta_labels).unwrap_or_default();
        let Some(spec) = template.spec.as_ref() else {
            return Ok(Self { template_labels, ..Default::default() });
        };
        Ok(Self {
            service_account: spec.service_account_name.clone().unwrap_or_default(),
            containers: spec.containers.iter().map(Container::load).collect(),
            node_selector: spec.node_selector.clone().unwrap_or_default(),
            template_labels,
            restart_policy: spec.restart_policy.as_deref().map(RestartPolicy::parse).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nginx() -> Container {
        Container {
            name: "nginx".into(),
            image: "nginx:1.25".into(),
            ports: vec![ContainerPort { port: 80 }],
            command: vec!["nginx".into(), "-g".into(), "daemon off;".into()],
            resources: Some(ContainerResources { cpu: "500m".into(), memory: "128Mi".into() }),
            env: vec![EnvVar { name: "MODE".into(), value: "prod".into() }],
        }
    }

    #[test]
    fn container_maps_to_native_fields() {
        let native = nginx().dump();
        assert_eq!(native.image.as_deref(), Some("nginx:1.25"));
        assert_eq!(native.ports.as_ref().unwrap()[0].container_port, 80);
        let limits = native.resources.as_ref().unwrap().limits.as_ref().unwrap();
        assert_eq!(limits["cpu"], Quantity("500m".into()));
        assert_eq!(limits["memory"], Quantity("128Mi".into()));
        assert_eq!(Container::load(&native), nginx());
    }

    #[test]
    fn empty_resources_survive_the_wire() {
        let container = Container {
            name: "c".into(),
            resources: Some(ContainerResources::default()),
            ..Default::default()
        };
        let native = container.dump();
        assert_eq!(native.resources.as_ref().and_then(|r| r.limits.as_ref()).map(BTreeMap::len), Some(0));
        let json = serde_json::to_value(&native).unwrap();
        let back: core::Container = serde_json::from_value(json).unwrap();
        assert_eq!(Container::load(&back), container);
    }

    #[test]
    fn bare_container_leaves_optional_fields_unset() {
        let native = Container { name: "c".into(), ..Default::default() }.dump();
        assert!(native.image.is_none());
        assert!(native.ports.is_none());
        assert!(native.resources.is_none());
        assert!(native.env.is_none());
    }

    #[test]
    fn unknown_restart_policy_fails_to_load() {
        let template = core::PodTemplateSpec {
            metadata: None,
            spec: Some(core::PodSpec { restart_policy: Some("Sometimes".into()), ..Default::default() }),
        };
        assert_eq!(PodShape::load(&template), Err(TranslateError::invalid("restartPolicy", "Sometimes")));
    }

    #[test]
    fn missing_pod_spec_loads_empty() {
        let template = core::PodTemplateSpec::default();
        assert_eq!(PodShape::load(&template), Ok(PodShape::default()));
    }
}
