//! CLI module for opncat.
//!
//! Commands:
//! - collect: scan controllers into a command catalog
//! - raw: call one catalog command against a firewall
//! - macro: list or run named command sequences

pub mod collect;
pub mod macros;
pub mod raw;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::CatalogFormat;
use crate::source::Repository;

#[derive(Parser)]
#[command(name = "opncat")]
#[command(about = "opncat - OPNsense API command catalog and dispatcher", long_about = None)]
pub struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection options shared by `raw` and `macro`.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Firewall base URL
    #[arg(long, env = "OPNSENSE_URL", default_value = "https://opnsense.local")]
    pub url: String,

    /// API key
    #[arg(long, env = "OPNSENSE_KEY")]
    pub key: Option<String>,

    /// API secret
    #[arg(long, env = "OPNSENSE_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Key/secret file downloaded from the web UI
    #[arg(long, env = "OPNSENSE_SECRET_FILE")]
    pub secret_file: Option<PathBuf>,

    /// Skip TLS certificate verification
    #[arg(long, env = "OPNSENSE_INSECURE")]
    pub insecure: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the command catalog from controller sources
    Collect {
        /// Existing source checkout (cloned or updated when omitted)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Upstream repository
        #[arg(short, long, value_enum, default_value_t = Repository::Core)]
        repo: Repository,

        /// Output file (default: <repo>.yaml)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output shape
        #[arg(short, long, value_enum, default_value_t = CatalogFormat::Commands)]
        format: CatalogFormat,

        /// Scan configuration
        #[arg(short, long, default_value = "opncat.toml")]
        config: PathBuf,
    },

    /// Call a catalog command (lists commands without a target)
    Raw {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Commands file produced by `collect`
        #[arg(long, default_value = "raw-commands.yaml")]
        commands_file: PathBuf,

        /// Verb for wildcard commands (default GET)
        #[arg(short, long)]
        method: Option<String>,

        /// module/controller/command
        target: Option<String>,

        /// Positional arguments appended to the URL
        args: Vec<String>,
    },

    /// Named command sequences
    Macro {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Macro definitions
        #[arg(long, default_value = "default-macro.yaml")]
        macro_file: PathBuf,

        /// Commands file produced by `collect`
        #[arg(long, default_value = "raw-commands.yaml")]
        commands_file: PathBuf,

        #[command(subcommand)]
        action: MacroAction,
    },
}

#[derive(Subcommand)]
pub enum MacroAction {
    /// Print the macro file
    List,
    /// Run every command of a macro in order
    Run {
        /// Macro name
        name: Option<String>,

        /// Arguments passed to every command
        args: Vec<String>,
    },
}

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Collect {
            source,
            repo,
            output,
            format,
            config,
        } => collect::collect(source, repo, output, format, &config),

        Commands::Raw {
            connection,
            commands_file,
            method,
            target,
            args,
        } => raw::raw(&connection, &commands_file, method.as_deref(), target.as_deref(), &args),

        Commands::Macro {
            connection,
            macro_file,
            commands_file,
            action,
        } => match action {
            MacroAction::List => macros::list(&macro_file),
            MacroAction::Run { name, args } => {
                macros::run(&connection, &macro_file, &commands_file, name.as_deref(), &args)
            }
        },
    }
}
