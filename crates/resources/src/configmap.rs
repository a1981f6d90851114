use k8s_openapi::api::core::v1 as core;
use serde::{Deserialize, Serialize};
use simplekube_core::TranslateError;

use crate::common::{meta_labels, meta_name, non_empty_map, object_meta, Labels};
use crate::Kind;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigMap {
    pub name: String,
    pub labels: Labels,
    pub data: Labels,
}

impl Kind for ConfigMap {
    type Native = core::ConfigMap;
    const NAME: &'static str = "configmap";

    fn dump(&self) -> Result<core::ConfigMap, TranslateError> {
        Ok(core::ConfigMap {
            metadata: object_meta(&self.name, &self.labels),
            data: non_empty_map(&self.data),
            ..Default::default()
        })
    }

    fn load(native: &core::ConfigMap) -> Result<Self, TranslateError> {
        Ok(Self {
            name: meta_name(&native.metadata),
            labels: meta_labels(&native.metadata),
            data: native.data.clone().unwrap_or_default(),
        })
    }
}
