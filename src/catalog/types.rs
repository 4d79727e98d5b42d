//
//  types.rs
//  opncat
//

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// HTTP verb an endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
    /// Verb is chosen by the caller at request time.
    #[serde(rename = "*")]
    Any,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Any => "*",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification label shown for each controller and endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndpointType {
    #[serde(rename = "Abstract [non-callable]")]
    Abstract,
    Service,
    Resources,
}

impl EndpointType {
    /// Abstract wins over everything; otherwise the controller name decides.
    pub fn classify(is_abstract: bool, controller: &str, service_marker: &str) -> Self {
        if is_abstract {
            Self::Abstract
        } else if controller.contains(service_marker) {
            Self::Service
        } else {
            Self::Resources
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abstract => "Abstract [non-callable]",
            Self::Service => "Service",
            Self::Resources => "Resources",
        }
    }
}

impl fmt::Display for EndpointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One exposed command of a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub module: String,
    pub controller: String,
    pub is_abstract: bool,
    pub base_class: String,
    pub command: String,
    /// Positional argument names, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
    pub filename: String,
    /// Set only when the model descriptor exists on disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_filename: Option<PathBuf>,
    #[serde(rename = "type")]
    pub endpoint_type: EndpointType,
}

impl Endpoint {
    /// Dispatcher name: `module/controller/command`.
    pub fn qualified_name(&self) -> String {
        format!("{}/{}/{}", self.module, self.controller, self.command)
    }

    /// Abstract controllers are catalogued but cannot be called.
    pub fn is_callable(&self) -> bool {
        !self.is_abstract
    }
}

/// Cross-reference from a controller to a related source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerLink {
    #[serde(rename = "type")]
    pub link_type: String,
    pub link: String,
    pub name: String,
}

/// All endpoints of one controller file plus the metadata they share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controller {
    #[serde(rename = "type")]
    pub controller_type: EndpointType,
    pub filename: String,
    pub is_abstract: bool,
    pub base_class: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uses: Vec<ControllerLink>,
    pub endpoints: Vec<Endpoint>,
}

/// Module name to its controllers, in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub modules: BTreeMap<String, Vec<Controller>>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn controller_count(&self) -> usize {
        self.modules.values().map(Vec::len).sum()
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints().count()
    }

    /// Every endpoint, module by module, controller by controller.
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.modules
            .values()
            .flatten()
            .flat_map(|controller| controller.endpoints.iter())
    }
}
