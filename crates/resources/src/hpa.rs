use k8s_openapi::api::autoscaling::v2 as scaling;
use serde::{Deserialize, Serialize};
use simplekube_core::TranslateError;

use crate::common::{meta_name, non_empty, non_empty_vec, non_zero, object_meta, Labels};
use crate::Kind;

const RESOURCE_METRIC: &str = "Resource";
const TARGET_TYPES: [&str; 3] = ["Utilization", "AverageValue", "Value"];

/// Horizontal pod autoscaler (`autoscaling/v2`) driven by resource metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hpa {
    pub name: String,
    pub min: i32,
    pub max: i32,
    pub target: HpaTarget,
    pub metrics: Vec<HpaMetric>,
}

/// `spec.scaleTargetRef`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HpaTarget {
    pub name: String,
    pub kind: String,
    pub api_version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HpaMetric {
    /// Metric source type. Only `Resource` can be written.
    pub metric_type: String,
    pub resource: HpaResourceMetric,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HpaResourceMetric {
    pub name: String,
    pub target_type: String,
    /// `target.averageUtilization`
    pub utilization: i32,
}

impl HpaMetric {
    fn dump(&self) -> Result<scaling::MetricSpec, TranslateError> {
        if self.metric_type != RESOURCE_METRIC {
            return Err(TranslateError::unsupported("spec.metrics[].type", &self.metric_type));
        }
        let r = &self.resource;
        if !TARGET_TYPES.contains(&r.target_type.as_str()) {
            return Err(TranslateError::invalid("spec.metrics[].resource.target.type", &r.target_type));
        }
        Ok(scaling::MetricSpec {
            type_: self.metric_type.clone(),
            resource: Some(scaling::ResourceMetricSource {
                name: r.name.clone(),
                target: scaling::MetricTarget {
                    type_: r.target_type.clone(),
                    average_utilization: non_zero(r.utilization),
                    ..Default::default()
                },
            }),
            ..Default::default()
        })
    }

    fn load(m: &scaling::MetricSpec) -> Self {
        let resource = m
            .resource
            .as_ref()
            .map(|r| HpaResourceMetric {
                name: r.name.clone(),
                target_type: r.target.type_.clone(),
                utilization: r.target.average_utilization.unwrap_or_default(),
            })
            .unwrap_or_default();
        Self { metric_type: m.type_.clone(), resource }
    }
}

impl Kind for Hpa {
    type Native = scaling::HorizontalPodAutoscaler;
    const NAME: &'static str = "hpa";

    fn dump(&self) -> Result<scaling::HorizontalPodAutoscaler, TranslateError> {
        if self.min < 0 || (self.max != 0 && self.min > self.max) {
            return Err(TranslateError::invalid("spec.minReplicas", self.min.to_string()));
        }
        let metrics = self.metrics.iter().map(HpaMetric::dump).collect::<Result<Vec<_>, _>>()?;
        Ok(scaling::HorizontalPodAutoscaler {
            metadata: object_meta(&self.name, &Labels::new()),
            spec: Some(scaling::HorizontalPodAutoscalerSpec {
                min_replicas: non_zero(self.min),
                max_replicas: self.max,
                scale_target_ref: scaling::CrossVersionObjectReference {
                    name: self.target.name.clone(),
                    kind: self.target.kind.clone(),
                    api_version: non_empty(&self.target.api_version),
                },
                metrics: non_empty_vec(metrics),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn load(native: &scaling::HorizontalPodAutoscaler) -> Result<Self, TranslateError> {
        let Some(spec) = native.spec.as_ref() else {
            return Ok(Self { name: meta_name(&native.metadata), ..Default::default() });
        };
        let target = &spec.scale_target_ref;
        Ok(Self {
            name: meta_name(&native.metadata),
            min: spec.min_replicas.unwrap_or_default(),
            max: spec.max_replicas,
            target: HpaTarget {
                name: target.name.clone(),
                kind: target.kind.clone(),
                api_version: target.api_version.clone().unwrap_or_default(),
            },
            metrics: spec.metrics.iter().flatten().map(HpaMetric::load).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu_hpa() -> Hpa {
        Hpa {
            name: "web".into(),
            min: 2,
            max: 10,
            target: HpaTarget { name: "web".into(), kind: "Deployment".into(), api_version: "apps/v1".into() },
            metrics: vec![HpaMetric {
                metric_type: "Resource".into(),
                resource: HpaResourceMetric { name: "cpu".into(), target_type: "Utilization".into(), utilization: 75 },
            }],
        }
    }

    #[test]
    fn resource_metrics_round_trip() {
        let native = cpu_hpa().dump().unwrap();
        let spec = native.spec.as_ref().unwrap();
        assert_eq!(spec.min_replicas, Some(2));
        assert_eq!(spec.max_replicas, 10);
        let metric = &spec.metrics.as_ref().unwrap()[0];
        assert_eq!(metric.resource.as_ref().unwrap().target.average_utilization, Some(75));
        assert_eq!(Hpa::load(&native).unwrap(), cpu_hpa());
    }

    #[test]
    fn non_resource_metrics_cannot_be_written() {
        let mut hpa = cpu_hpa();
        hpa.metrics[0].metric_type = "Pods".into();
        assert_eq!(hpa.dump().unwrap_err(), TranslateError::unsupported("spec.metrics[].type", "Pods"));
    }

    #[test]
    fn min_above_max_is_rejected() {
        let hpa = Hpa { min: 5, max: 2, ..cpu_hpa() };
        assert!(matches!(hpa.dump(), Err(TranslateError::InvalidValue { field: "spec.minReplicas", .. })));
    }

    #[test]
    fn non_resource_metrics_still_load() {
        let mut native = cpu_hpa().dump().unwrap();
        let metrics = native.spec.as_mut().unwrap().metrics.as_mut().unwrap();
        metrics.push(scaling::MetricSpec { type_: "Pods".into(), ..Default::default() });
        let loaded = Hpa::load(&native).unwrap();
        assert_eq!(loaded.metrics.len(), 2);
        assert_eq!(loaded.metrics[1].metric_type, "Pods");
    }
}
