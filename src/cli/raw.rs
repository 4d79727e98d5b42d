//! Raw dispatcher: one catalog command against the API.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

use super::ConnectionArgs;
use crate::client::{pretty_json, ApiClient, CommandSet, Credentials};

pub fn raw(
    connection: &ConnectionArgs,
    commands_file: &Path,
    method: Option<&str>,
    target: Option<&str>,
    args: &[String],
) -> Result<()> {
    let commands = load_commands(commands_file)?;

    let Some(target) = target else {
        print!("{}", format_listing(&commands));
        return Ok(());
    };

    let client = connect(connection)?;
    let output = call(&client, &commands, target, args, method)?;
    println!("{output}");
    Ok(())
}

pub(crate) fn load_commands(path: &Path) -> Result<CommandSet> {
    let commands = CommandSet::load(path)
        .with_context(|| format!("Failed to load commands file {}", path.display()))?;
    info!(file = %path.display(), commands = commands.len(), "commands loaded");
    Ok(commands)
}

pub(crate) fn connect(connection: &ConnectionArgs) -> Result<ApiClient> {
    let credentials = Credentials::resolve(
        connection.key.as_deref(),
        connection.secret.as_deref(),
        connection.secret_file.as_deref(),
    )
    .context("Failed to resolve API credentials")?;

    Ok(ApiClient::new(&connection.url, credentials, connection.insecure)?)
}

/// Resolve, call and pretty print one command.
pub(crate) fn call(
    client: &ApiClient,
    commands: &CommandSet,
    target: &str,
    args: &[String],
    method: Option<&str>,
) -> Result<String> {
    let record = commands.resolve(target, args)?;
    let response = client
        .call(record, args, method)
        .with_context(|| format!("{target} failed"))?;
    Ok(pretty_json(&response)?)
}

/// Commands grouped by `module/controller`, one command per line.
pub fn format_listing(commands: &CommandSet) -> String {
    let mut out = String::new();
    for (group, records) in commands.grouped() {
        let _ = writeln!(out, "{group}");
        for record in records {
            let _ = write!(out, "  {:<6} {}", record.method.as_str(), record.command);
            if !record.parameters.is_empty() {
                let _ = write!(out, " <{}>", record.parameters.join("> <"));
            }
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_listing() {
        let commands = CommandSet::parse(
            r#"
- module: firewall
  controller: alias
  command: delItem
  method: POST
  parameters: [uuid]
- module: cron
  controller: service
  command: status
  method: GET
"#,
        )
        .unwrap();

        assert_eq!(
            format_listing(&commands),
            "cron/service\n  GET    status\nfirewall/alias\n  POST   delItem <uuid>\n"
        );
    }

    #[test]
    fn test_unknown_target_fails_before_request() {
        let commands = CommandSet::parse("[]").unwrap();
        let client = ApiClient::new("https://127.0.0.1:1", Credentials::default(), false).unwrap();
        let err = call(&client, &commands, "a/b/c", &[], None).unwrap_err();
        assert!(err.to_string().contains("Unknown command: a/b/c"));
    }
}
