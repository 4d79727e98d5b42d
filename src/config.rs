//
//  config.rs
//  opncat
//

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::catalog::types::HttpMethod;
use crate::error::{CatalogError, Result};

/// Top-level collection configuration (`opncat.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectConfig {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub conventions: ConventionConfig,
    /// Extra implicit commands, appended to the built-in table.
    #[serde(default)]
    pub base_defaults: Vec<BaseDefaultEntry>,
}

/// Which files in the source tree are controllers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Lowercased path suffix of a controller file.
    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,
    /// Lowercased path fragment every controller lives under.
    #[serde(default = "default_controllers_root")]
    pub controllers_root: String,
    /// Path fragments to skip (compared lowercased).
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,
}

/// Naming conventions of the target framework.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConventionConfig {
    #[serde(default = "default_action_suffix")]
    pub action_suffix: String,
    #[serde(default = "default_controller_suffix")]
    pub controller_suffix: String,
    #[serde(default = "default_service_marker")]
    pub service_marker: String,
    #[serde(default = "default_models_dir")]
    pub models_dir: String,
}

/// One `[[base_defaults]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseDefaultEntry {
    pub base_class: String,
    pub command: String,
    pub method: HttpMethod,
}

fn default_file_suffix() -> String {
    "controller.php".to_string()
}

fn default_controllers_root() -> String {
    "mvc/app/controllers".to_string()
}

fn default_exclude() -> Vec<String> {
    vec!["core/api/firmwarecontroller.php".to_string()]
}

fn default_action_suffix() -> String {
    "Action".to_string()
}

fn default_controller_suffix() -> String {
    "Controller.php".to_string()
}

fn default_service_marker() -> String {
    "service".to_string()
}

fn default_models_dir() -> String {
    "models".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            file_suffix: default_file_suffix(),
            controllers_root: default_controllers_root(),
            exclude: default_exclude(),
        }
    }
}

impl Default for ConventionConfig {
    fn default() -> Self {
        Self {
            action_suffix: default_action_suffix(),
            controller_suffix: default_controller_suffix(),
            service_marker: default_service_marker(),
            models_dir: default_models_dir(),
        }
    }
}

impl CollectConfig {
    /// Load config from a TOML file. A missing file yields defaults, a
    /// malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(|source| CatalogError::Config {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(CatalogError::io(path, e)),
        }
    }
}

impl ScanConfig {
    /// Does this path name a controller we should analyze?
    pub fn is_controller_path(&self, path: &Path) -> bool {
        let lower = path.to_string_lossy().replace('\\', "/").to_lowercase();
        lower.ends_with(&self.file_suffix.to_lowercase())
            && lower.contains(&self.controllers_root.to_lowercase())
            && !self
                .exclude
                .iter()
                .any(|excluded| lower.contains(&excluded.to_lowercase()))
    }
}
