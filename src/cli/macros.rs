//! Macro commands: list and run.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{error, info, warn};

use super::raw::{call, connect, load_commands};
use super::ConnectionArgs;
use crate::client::{find_macro, load_macros, CommandSet, Macro};

/// Print the macro file back as YAML.
pub fn list(macro_file: &Path) -> Result<()> {
    let macros = load(macro_file)?;
    print!("{}", serde_yaml::to_string(&macros)?);
    Ok(())
}

pub fn run(
    connection: &ConnectionArgs,
    macro_file: &Path,
    commands_file: &Path,
    name: Option<&str>,
    args: &[String],
) -> Result<()> {
    let macros = load(macro_file)?;

    let Some(name) = name else {
        error!("macro name required");
        print!("{}", serde_yaml::to_string(&macros)?);
        return Ok(());
    };

    let Some(found) = find_macro(&macros, name) else {
        warn!(macro_name = name, "macro not found");
        return Ok(());
    };

    let commands = load_commands(commands_file)?;
    let steps = runnable(found, &commands);
    let client = connect(connection)?;

    for step in steps {
        info!(macro_name = name, command = step, "running");
        let output = call(&client, &commands, step, args, None)?;
        println!("{output}");
    }
    Ok(())
}

fn load(macro_file: &Path) -> Result<Vec<Macro>> {
    load_macros(macro_file)
        .with_context(|| format!("Failed to load macro file {}", macro_file.display()))
}

/// Macro steps present in the commands file, in order. Missing ones are
/// logged and skipped.
fn runnable<'a>(found: &'a Macro, commands: &CommandSet) -> Vec<&'a str> {
    found
        .commands
        .iter()
        .filter(|step| {
            let known = commands.find(step).is_some();
            if !known {
                warn!(macro_name = %found.name, command = %step, "command not in catalog, skipping");
            }
            known
        })
        .map(String::as_str)
        .collect()
}
