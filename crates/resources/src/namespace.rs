use k8s_openapi::api::core::v1 as core;
use serde::{Deserialize, Serialize};
use simplekube_core::TranslateError;

use crate::common::{meta_labels, meta_name, object_meta, Labels};
use crate::Kind;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    pub labels: Labels,
}

impl Kind for Namespace {
    type Native = core::Namespace;
    const NAME: &'static str = "namespace";

    fn dump(&self) -> Result<core::Namespace, TranslateError> {
        Ok(core::Namespace { metadata: object_meta(&self.name, &self.labels), ..Default::default() })
    }

    fn load(native: &core::Namespace) -> Result<Self, TranslateError> {
        Ok(Self { name: meta_name(&native.metadata), labels: meta_labels(&native.metadata) })
    }
}
