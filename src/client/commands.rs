//! The command file the dispatcher loads (output of `collect --format commands`).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::catalog::CommandRecord;
use crate::error::{CatalogError, Result};

/// Loaded dispatcher commands, in file order.
#[derive(Debug, Clone, Default)]
pub struct CommandSet {
    records: Vec<CommandRecord>,
}

impl CommandSet {
    pub fn new(records: Vec<CommandRecord>) -> Self {
        Self { records }
    }

    /// Load a commands file. Unknown fields are rejected.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let records: Vec<CommandRecord> = serde_yaml::from_str(contents)?;
        Ok(Self::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CommandRecord] {
        &self.records
    }

    /// Look up `module/controller/command`.
    pub fn find(&self, name: &str) -> Option<&CommandRecord> {
        self.records.iter().find(|record| record.name() == name)
    }

    /// Like [`find`](Self::find), but also checks the positional arguments.
    pub fn resolve(&self, name: &str, args: &[String]) -> Result<&CommandRecord> {
        let record = self
            .find(name)
            .ok_or_else(|| CatalogError::UnknownCommand(name.to_string()))?;

        if args.len() < record.parameters.len() {
            return Err(CatalogError::MissingArguments {
                command: name.to_string(),
                expected: record.parameters.len(),
                got: args.len(),
                names: record.parameters.join(", "),
            });
        }
        Ok(record)
    }

    /// Records grouped by `module/controller`, groups sorted.
    pub fn grouped(&self) -> BTreeMap<String, Vec<&CommandRecord>> {
        let mut groups: BTreeMap<String, Vec<&CommandRecord>> = BTreeMap::new();
        for record in &self.records {
            groups
                .entry(format!("{}/{}", record.module, record.controller))
                .or_default()
                .push(record);
        }
        groups
    }
}
