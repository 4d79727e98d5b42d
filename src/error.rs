//! Error types for opncat.
//!
//! Heuristic mismatches inside a controller never surface here: they fall
//! back to default values. Only file system, serialization and transport
//! failures are errors.

use std::path::PathBuf;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] ignore::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("git {action} failed for {url}: {stderr}")]
    Git {
        action: &'static str,
        url: String,
        stderr: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response body: {reason}\n{body}")]
    InvalidResponse { reason: String, body: String },

    #[error("Key/Secret file {0} must contain key= and secret= fields")]
    InvalidSecretFile(PathBuf),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("{command} requires at least {expected} argument(s) ({names}), got {got}")]
    MissingArguments {
        command: String,
        expected: usize,
        got: usize,
        names: String,
    },
}

impl CatalogError {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
