use k8s_openapi::api::core::v1 as core;
use serde::{Deserialize, Serialize};
use simplekube_core::TranslateError;

use crate::common::{meta_labels, meta_name, non_empty_map, object_meta, Labels};
use crate::Kind;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    /// First service port.
    pub port: i32,
    pub selector: Labels,
    pub labels: Labels,
}

impl Kind for Service {
    type Native = core::Service;
    const NAME: &'static str = "service";

    fn dump(&self) -> Result<core::Service, TranslateError> {
        if self.port < 0 || self.port > 65535 {
            return Err(TranslateError::invalid("spec.ports[0].port", self.port.to_string()));
        }
        let ports = (self.port != 0).then(|| vec![core::ServicePort { port: self.port, ..Default::default() }]);
        Ok(core::Service {
            metadata: object_meta(&self.name, &self.labels),
            spec: Some(core::ServiceSpec { ports, selector: non_empty_map(&self.selector), ..Default::default() }),
            ..Default::default()
        })
    }

    fn load(native: &core::Service) -> Result<Self, TranslateError> {
        let spec = native.spec.as_ref();
        Ok(Self {
            name: meta_name(&native.metadata),
            port: spec.and_then(|s| s.ports.as_ref()).and_then(|p| p.first()).map(|p| p.port).unwrap_or_default(),
            selector: spec.and_then(|s| s.selector.clone()).unwrap_or_default(),
            labels: meta_labels(&native.metadata),
        })
    }
}
