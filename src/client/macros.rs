//
//  macros.rs
//  opncat
//

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{CatalogError, Result};

/// A named sequence of dispatcher commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Macro {
    pub name: String,
    pub commands: Vec<String>,
}

pub fn load_macros(path: &Path) -> Result<Vec<Macro>> {
    let contents = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    parse_macros(&contents)
}

pub fn parse_macros(contents: &str) -> Result<Vec<Macro>> {
    Ok(serde_yaml::from_str(contents)?)
}

pub fn find_macro<'a>(macros: &'a [Macro], name: &str) -> Option<&'a Macro> {
    macros.iter().find(|m| m.name == name)
}
