use k8s_openapi::api::apps::v1 as apps;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use serde::{Deserialize, Serialize};
use simplekube_core::TranslateError;

use crate::common::{meta_labels, meta_name, non_empty_map, object_meta, Container, Labels, PodShape};
use crate::Kind;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub name: String,
    pub service_account: String,
    pub containers: Vec<Container>,
    pub labels: Labels,
    pub template_labels: Labels,
    /// `spec.selector.matchLabels`
    pub service_selector: Labels,
    pub node_selector: Labels,
}

impl Kind for Deployment {
    type Native = apps::Deployment;
    const NAME: &'static str = "deployment";

    fn dump(&self) -> Result<apps::Deployment, TranslateError> {
        let pod = PodShape {
            service_account: self.service_account.clone(),
            containers: self.containers.clone(),
            node_selector: self.node_selector.clone(),
            template_labels: self.template_labels.clone(),
            restart_policy: None,
        };
        Ok(apps::Deployment {
            metadata: object_meta(&self.name, &self.labels),
            spec: Some(apps::DeploymentSpec {
                selector: LabelSelector { match_labels: non_empty_map(&self.service_selector), ..Default::default() },
                template: pod.dump(),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn load(native: &apps::Deployment) -> Result<Self, TranslateError> {
        let spec = native.spec.as_ref();
        let pod = spec.map(|s| PodShape::load(&s.template)).transpose()?.unwrap_or_default();
        Ok(Self {
            name: meta_name(&native.metadata),
            service_account: pod.service_account,
            containers: pod.containers,
            labels: meta_labels(&native.metadata),
            template_labels: pod.template_labels,
            service_selector: spec.and_then(|s| s.selector.match_labels.clone()).unwrap_or_default(),
            node_selector: pod.node_selector,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContainerPort;

    fn sample() -> Deployment {
        let app: Labels = [("app".to_string(), "nginx".to_string())].into();
        Deployment {
            name: "nginx".into(),
            service_account: "web".into(),
            containers: vec![Container {
                name: "nginx".into(),
                image: "nginx:latest".into(),
                ports: vec![ContainerPort { port: 80 }],
                ..Default::default()
            }],
            labels: app.clone(),
            template_labels: app.clone(),
            service_selector: app,
            node_selector: [("disktype".to_string(), "ssd".to_string())].into(),
        }
    }

    #[test]
    fn fields_land_on_native_paths() {
        let native = sample().dump().unwrap();
        let spec = native.spec.as_ref().unwrap();
        assert_eq!(spec.selector.match_labels.as_ref().unwrap()["app"], "nginx");
        let pod = spec.template.spec.as_ref().unwrap();
        assert_eq!(pod.service_account_name.as_deref(), Some("web"));
        assert_eq!(pod.node_selector.as_ref().unwrap()["disktype"], "ssd");
        assert_eq!(pod.containers[0].image.as_deref(), Some("nginx:latest"));
        assert_eq!(spec.template.metadata.as_ref().unwrap().labels.as_ref().unwrap()["app"], "nginx");
    }

    #[test]
    fn load_restores_dumped_value() {
        let native = sample().dump().unwrap();
        assert_eq!(Deployment::load(&native).unwrap(), sample());
    }

    #[test]
    fn missing_spec_loads_metadata_only() {
        let native = apps::Deployment { metadata: crate::common::object_meta("bare", &Labels::new()), ..Default::default() };
        let loaded = Deployment::load(&native).unwrap();
        assert_eq!(loaded, Deployment { name: "bare".into(), ..Default::default() });
    }
}
