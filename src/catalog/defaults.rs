//! Implicit commands contributed by well-known controller base classes.

use std::collections::BTreeMap;

use super::types::{Endpoint, EndpointType, HttpMethod};
use crate::config::BaseDefaultEntry;
use crate::parser::ControllerFacts;

/// A command a base class provides without the controller declaring it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultCommand {
    pub command: String,
    pub method: HttpMethod,
}

impl DefaultCommand {
    fn new(command: &str, method: HttpMethod) -> Self {
        Self {
            command: command.to_string(),
            method,
        }
    }
}

/// Base class name to its implicit commands. Built once, read-only after.
#[derive(Debug, Clone)]
pub struct BaseDefaults {
    table: BTreeMap<String, Vec<DefaultCommand>>,
}

impl Default for BaseDefaults {
    fn default() -> Self {
        let mut table = BTreeMap::new();
        table.insert(
            "ApiMutableModelControllerBase".to_string(),
            vec![
                DefaultCommand::new("set", HttpMethod::Post),
                DefaultCommand::new("get", HttpMethod::Get),
            ],
        );
        table.insert(
            "ApiMutableServiceControllerBase".to_string(),
            vec![
                DefaultCommand::new("status", HttpMethod::Get),
                DefaultCommand::new("start", HttpMethod::Post),
                DefaultCommand::new("stop", HttpMethod::Post),
                DefaultCommand::new("restart", HttpMethod::Post),
                DefaultCommand::new("reconfigure", HttpMethod::Post),
            ],
        );
        Self { table }
    }
}

impl BaseDefaults {
    /// A table with no entries.
    pub fn empty() -> Self {
        Self {
            table: BTreeMap::new(),
        }
    }

    /// Built-in table extended with config entries. An entry repeating a
    /// command of its base class replaces that command's verb.
    pub fn with_entries(mut self, entries: &[BaseDefaultEntry]) -> Self {
        for entry in entries {
            let commands = self.table.entry(entry.base_class.clone()).or_default();
            match commands.iter_mut().find(|c| c.command == entry.command) {
                Some(existing) => existing.method = entry.method,
                None => commands.push(DefaultCommand::new(&entry.command, entry.method)),
            }
        }
        self
    }

    pub fn commands_for(&self, base_class: &str) -> &[DefaultCommand] {
        self.table.get(base_class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Endpoints for every default of `facts.base_class` not already in
    /// `defined`. The verb of a same-named explicit action is irrelevant.
    pub fn merge(&self, facts: &ControllerFacts, defined: &[String], service_marker: &str) -> Vec<Endpoint> {
        let endpoint_type =
            EndpointType::classify(facts.is_abstract, &facts.controller, service_marker);

        self.commands_for(&facts.base_class)
            .iter()
            .filter(|default| !defined.iter().any(|c| *c == default.command))
            .map(|default| Endpoint {
                method: default.method,
                module: facts.module.clone(),
                controller: facts.controller.clone(),
                is_abstract: facts.is_abstract,
                base_class: facts.base_class.clone(),
                command: default.command.clone(),
                parameters: Vec::new(),
                filename: facts.filename.clone(),
                model_filename: facts.model_filename.clone(),
                endpoint_type,
            })
            .collect()
    }
}
