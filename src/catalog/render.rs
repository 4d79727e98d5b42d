//! Catalog rendering.
//!
//! Two shapes are produced from the same catalog:
//! - `commands`: the flat list the `raw` dispatcher loads
//! - `catalog`: every module with its controllers and their metadata

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::types::{Catalog, Controller, Endpoint, HttpMethod};
use crate::error::{CatalogError, Result};

/// Output shape selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CatalogFormat {
    #[default]
    Commands,
    Catalog,
}

/// One callable command as the dispatcher sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandRecord {
    pub module: String,
    pub controller: String,
    pub command: String,
    pub method: HttpMethod,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
}

impl CommandRecord {
    pub fn name(&self) -> String {
        format!("{}/{}/{}", self.module, self.controller, self.command)
    }
}

impl From<&Endpoint> for CommandRecord {
    fn from(endpoint: &Endpoint) -> Self {
        Self {
            module: endpoint.module.clone(),
            controller: endpoint.controller.clone(),
            command: endpoint.command.clone(),
            method: endpoint.method,
            parameters: endpoint.parameters.clone(),
        }
    }
}

/// A module section of the full catalog.
#[derive(Debug, Serialize)]
struct ModuleSection<'a> {
    name: &'a str,
    title: String,
    controllers: &'a [Controller],
}

/// Callable endpoints as dispatcher records, in catalog order.
pub fn command_records(catalog: &Catalog) -> Vec<CommandRecord> {
    catalog
        .endpoints()
        .filter(|endpoint| endpoint.is_callable())
        .map(CommandRecord::from)
        .collect()
}

pub fn render(catalog: &Catalog, format: CatalogFormat) -> Result<String> {
    let text = match format {
        CatalogFormat::Commands => serde_yaml::to_string(&command_records(catalog))?,
        CatalogFormat::Catalog => {
            let sections: Vec<ModuleSection<'_>> = catalog
                .modules
                .iter()
                .map(|(name, controllers)| ModuleSection {
                    name,
                    title: name.to_uppercase(),
                    controllers,
                })
                .collect();
            serde_yaml::to_string(&sections)?
        }
    };
    Ok(text)
}

/// Render and write atomically (temp file, then rename).
pub fn write_catalog(catalog: &Catalog, format: CatalogFormat, path: &Path) -> Result<()> {
    let text = render(catalog, format)?;
    let temp_path = path.with_extension("yaml.tmp");
    fs::write(&temp_path, text).map_err(|e| CatalogError::io(&temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| CatalogError::io(path, e))?;
    Ok(())
}
