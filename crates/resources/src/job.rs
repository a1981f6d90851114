use k8s_openapi::api::batch::v1 as batch;
use serde::{Deserialize, Serialize};
use simplekube_core::TranslateError;

use crate::common::{batch_restart_policy, meta_labels, meta_name, non_zero, object_meta, Container, Labels, PodShape, RestartPolicy};
use crate::Kind;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    pub service_account: String,
    pub behaviour: JobBehaviour,
    pub containers: Vec<Container>,
    pub labels: Labels,
    pub node_selector: Labels,
    pub template_labels: Labels,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobBehaviour {
    pub restart_policy: Option<RestartPolicy>,
    /// `spec.ttlSecondsAfterFinished`
    pub finished_ttl: i32,
}

impl Job {
    fn pod(&self) -> PodShape {
        PodShape {
            service_account: self.service_account.clone(),
            containers: self.containers.clone(),
            node_selector: self.node_selector.clone(),
            template_labels: self.template_labels.clone(),
            restart_policy: self.behaviour.restart_policy,
        }
    }
}

impl Kind for Job {
    type Native = batch::Job;
    const NAME: &'static str = "job";

    fn dump(&self) -> Result<batch::Job, TranslateError> {
        batch_restart_policy(self.behaviour.restart_policy, "spec.template.spec.restartPolicy")?;
        Ok(batch::Job {
            metadata: object_meta(&self.name, &self.labels),
            spec: Some(batch::JobSpec {
                template: self.pod().dump(),
                ttl_seconds_after_finished: non_zero(self.behaviour.finished_ttl),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn load(native: &batch::Job) -> Result<Self, TranslateError> {
        let spec = native.spec.as_ref();
        let pod = spec.map(|s| PodShape::load(&s.template)).transpose()?.unwrap_or_default();
        Ok(Self {
            name: meta_name(&native.metadata),
            service_account: pod.service_account,
            behaviour: JobBehaviour {
                restart_policy: pod.restart_policy,
                finished_ttl: spec.and_then(|s| s.ttl_seconds_after_finished).unwrap_or_default(),
            },
            containers: pod.containers,
            labels: meta_labels(&native.metadata),
            node_selector: pod.node_selector,
            template_labels: pod.template_labels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behaviour_maps_to_spec() {
        let job = Job {
            name: "migrate".into(),
            behaviour: JobBehaviour { restart_policy: Some(RestartPolicy::Never), finished_ttl: 300 },
            containers: vec![Container { name: "migrate".into(), image: "app:1".into(), ..Default::default() }],
            ..Default::default()
        };
        let native = job.dump().unwrap();
        let spec = native.spec.as_ref().unwrap();
        assert_eq!(spec.ttl_seconds_after_finished, Some(300));
        assert_eq!(spec.template.spec.as_ref().unwrap().restart_policy.as_deref(), Some("Never"));
        assert_eq!(Job::load(&native).unwrap(), job);
    }

    #[test]
    fn always_restart_is_not_valid_for_jobs() {
        let job = Job {
            name: "bad".into(),
            behaviour: JobBehaviour { restart_policy: Some(RestartPolicy::Always), finished_ttl: 0 },
            ..Default::default()
        };
        assert!(matches!(job.dump(), Err(TranslateError::InvalidValue { .. })));
    }

    #[test]
    fn unset_restart_policy_is_rejected() {
        let job = Job { name: "bad".into(), ..Default::default() };
        assert_eq!(job.dump(), Err(TranslateError::invalid("spec.template.spec.restartPolicy", "")));
    }
}
