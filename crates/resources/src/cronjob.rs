use k8s_openapi::api::batch::v1 as batch;
use serde::{Deserialize, Serialize};
use simplekube_core::TranslateError;

use crate::common::{batch_restart_policy, meta_labels, meta_name, non_zero, object_meta, Container, Labels, PodShape, RestartPolicy};
use crate::Kind;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronJob {
    pub name: String,
    pub schedule: String,
    pub behaviour: CronJobBehaviour,
    pub service_account: String,
    pub containers: Vec<Container>,
    pub labels: Labels,
    pub node_selector: Labels,
    pub template_labels: Labels,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronJobBehaviour {
    pub restart_policy: Option<RestartPolicy>,
    pub success_history: i32,
    pub failed_history: i32,
    /// `spec.startingDeadlineSeconds`
    pub starting_deadline: i64,
}

impl Kind for CronJob {
    type Native = batch::CronJob;
    const NAME: &'static str = "cronjob";

    fn dump(&self) -> Result<batch::CronJob, TranslateError> {
        let b = &self.behaviour;
        batch_restart_policy(b.restart_policy, "spec.jobTemplate.spec.template.spec.restartPolicy")?;
        let pod = PodShape {
            service_account: self.service_account.clone(),
            containers: self.containers.clone(),
            node_selector: self.node_selector.clone(),
            template_labels: self.template_labels.clone(),
            restart_policy: b.restart_policy,
        };
        Ok(batch::CronJob {
            metadata: object_meta(&self.name, &self.labels),
            spec: Some(batch::CronJobSpec {
                schedule: self.schedule.clone(),
                successful_jobs_history_limit: non_zero(b.success_history),
                failed_jobs_history_limit: non_zero(b.failed_history),
                starting_deadline_seconds: non_zero(b.starting_deadline),
                job_template: batch::JobTemplateSpec {
                    metadata: None,
                    spec: Some(batch::JobSpec { template: pod.dump(), ..Default::default() }),
                },
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn load(native: &batch::CronJob) -> Result<Self, TranslateError> {
        let spec = native.spec.as_ref();
        let template = spec.and_then(|s| s.job_template.spec.as_ref()).map(|j| &j.template);
        let pod = template.map(PodShape::load).transpose()?.unwrap_or_default();
        Ok(Self {
            name: meta_name(&native.metadata),
            schedule: spec.map(|s| s.schedule.clone()).unwrap_or_default(),
            behaviour: CronJobBehaviour {
                restart_policy: pod.restart_policy,
                success_history: spec.and_then(|s| s.successful_jobs_history_limit).unwrap_or_default(),
                failed_history: spec.and_then(|s| s.failed_jobs_history_limit).unwrap_or_default(),
                starting_deadline: spec.and_then(|s| s.starting_deadline_seconds).unwrap_or_default(),
            },
            service_account: pod.service_account,
            containers: pod.containers,
            labels: meta_labels(&native.metadata),
            node_selector: pod.node_selector,
            template_labels: pod.template_labels,
        })
    }
}
