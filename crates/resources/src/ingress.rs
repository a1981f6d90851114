use k8s_openapi::api::networking::v1 as net;
use serde::{Deserialize, Serialize};
use simplekube_core::TranslateError;

use crate::common::{meta_labels, meta_name, non_empty, object_meta, Labels};
use crate::Kind;

/// Single-host ingress: `domain` and `paths` map onto the first rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingress {
    pub name: String,
    pub domain: String,
    pub paths: Vec<IngressPathDef>,
    pub labels: Labels,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressPathDef {
    pub path: String,
    pub path_type: PathType,
    pub service: String,
    pub port: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathType {
    Exact,
    #[default]
    Prefix,
    ImplementationSpecific,
}

impl PathType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathType::Exact => "Exact",
            PathType::Prefix => "Prefix",
            PathType::ImplementationSpecific => "ImplementationSpecific",
        }
    }

    fn parse(s: &str) -> Result<Self, TranslateError> {
        match s {
            "Exact" => Ok(PathType::Exact),
            "Prefix" => Ok(PathType::Prefix),
            "ImplementationSpecific" => Ok(PathType::ImplementationSpecific),
            other => Err(TranslateError::invalid("pathType", other)),
        }
    }
}

impl IngressPathDef {
    fn dump(&self) -> net::HTTPIngressPath {
        net::HTTPIngressPath {
            path: non_empty(&self.path),
            path_type: self.path_type.as_str().to_string(),
            backend: net::IngressBackend {
                service: Some(net::IngressServiceBackend {
                    name: self.service.clone(),
                    port: Some(net::ServiceBackendPort { number: Some(self.port), name: None }),
                }),
                resource: None,
            },
        }
    }

    fn load(p: &net::HTTPIngressPath) -> Result<Self, TranslateError> {
        let service = p.backend.service.as_ref();
        Ok(Self {
            path: p.path.clone().unwrap_or_default(),
            path_type: PathType::parse(&p.path_type)?,
            service: service.map(|s| s.name.clone()).unwrap_or_default(),
            port: service.and_then(|s| s.port.as_ref()).and_then(|p| p.number).unwrap_or_default(),
        })
    }
}

impl Kind for Ingress {
    type Native = net::Ingress;
    const NAME: &'static str = "ingress";

    fn dump(&self) -> Result<net::Ingress, TranslateError> {
        let http = (!self.paths.is_empty())
            .then(|| net::HTTPIngressRuleValue { paths: self.paths.iter().map(IngressPathDef::dump).collect() });
        let rules = (http.is_some() || !self.domain.is_empty())
            .then(|| vec![net::IngressRule { host: non_empty(&self.domain), http }]);
        Ok(net::Ingress {
            metadata: object_meta(&self.name, &self.labels),
            spec: Some(net::IngressSpec { rules, ..Default::default() }),
            ..Default::default()
        })
    }

    fn load(native: &net::Ingress) -> Result<Self, TranslateError> {
        let rule = native.spec.as_ref().and_then(|s| s.rules.as_ref()).and_then(|r| r.first());
        let paths = rule
            .and_then(|r| r.http.as_ref())
            .map(|h| h.paths.iter().map(IngressPathDef::load).collect::<Result<Vec<_>, _>>())
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            name: meta_name(&native.metadata),
            domain: rule.and_then(|r| r.host.clone()).unwrap_or_default(),
            paths,
            labels: meta_labels(&native.metadata),
        })
    }
}
