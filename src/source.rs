//! Source tree acquisition: which upstream repository, where it lives on
//! GitHub, and cloning or updating a local checkout with `git`.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CatalogError, Result};

/// Upstream repository the controllers come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Repository {
    Core,
    Plugins,
}

impl Repository {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Plugins => "plugins",
        }
    }

    pub fn clone_url(&self) -> String {
        format!("https://github.com/opnsense/{}.git", self.name())
    }

    /// Default local checkout: `<tmp>/<repo>`.
    pub fn default_checkout(&self) -> PathBuf {
        std::env::temp_dir().join(self.name())
    }

    /// Browsable GitHub URL of a file inside a checkout.
    ///
    /// Plugins keep two leading segments before `src` (category/plugin),
    /// core starts at `src`. Paths without a `src` segment are returned as is.
    pub fn source_url(&self, path: &Path) -> String {
        let normalized = path.to_string_lossy().replace('\\', "/");
        let parts: Vec<&str> = normalized.split('/').collect();
        let Some(src) = parts.iter().position(|p| *p == "src") else {
            return normalized;
        };

        let start = match self {
            Self::Plugins => src.saturating_sub(2),
            Self::Core => src,
        };
        format!(
            "https://github.com/opnsense/{}/blob/master/{}",
            self.name(),
            parts[start..].join("/")
        )
    }
}

/// Clone `url` into `dest`, or pull if `dest` is already a checkout.
pub fn acquire(url: &str, dest: &Path) -> Result<()> {
    if dest.join(".git").is_dir() {
        info!(url, dest = %dest.display(), "pulling changes");
        let output = Command::new("git")
            .arg("-C")
            .arg(dest)
            .args(["pull", "--ff-only"])
            .output()
            .map_err(|e| CatalogError::io(dest, e))?;
        return check_git("pull", url, &output);
    }

    info!(url, dest = %dest.display(), "cloning");
    let output = Command::new("git")
        .args(["clone", url])
        .arg(dest)
        .output()
        .map_err(|e| CatalogError::io(dest, e))?;
    check_git("clone", url, &output)
}

/// `git pull` on an up-to-date tree exits 0, so only a failed status counts.
fn check_git(action: &'static str, url: &str, output: &std::process::Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    Err(CatalogError::Git {
        action,
        url: url.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_url() {
        assert_eq!(Repository::Core.clone_url(), "https://github.com/opnsense/core.git");
        assert_eq!(
            Repository::Plugins.clone_url(),
            "https://github.com/opnsense/plugins.git"
        );
    }

    #[test]
    fn test_source_url_core() {
        let path = Path::new("/tmp/core/src/opnsense/mvc/app/models/OPNsense/Firewall/Alias.xml");
        assert_eq!(
            Repository::Core.source_url(path),
            "https://github.com/opnsense/core/blob/master/src/opnsense/mvc/app/models/OPNsense/Firewall/Alias.xml"
        );
    }

    #[test]
    fn test_source_url_plugins() {
        let path = Path::new("/tmp/plugins/net/haproxy/src/opnsense/mvc/app/models/OPNsense/HAProxy/HAProxy.xml");
        assert_eq!(
            Repository::Plugins.source_url(path),
            "https://github.com/opnsense/plugins/blob/master/net/haproxy/src/opnsense/mvc/app/models/OPNsense/HAProxy/HAProxy.xml"
        );
    }

    #[test]
    fn test_source_url_without_src() {
        let path = Path::new("models/OPNsense/Firewall/Alias.xml");
        assert_eq!(
            Repository::Core.source_url(path),
            "models/OPNsense/Firewall/Alias.xml"
        );
    }
}
