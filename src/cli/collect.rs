//
//  collect.rs
//  opncat
//

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::catalog::{write_catalog, CatalogFormat, Collector};
use crate::config::CollectConfig;
use crate::source::{acquire, Repository};

/// Scan a checkout (cloning or updating the default one when `source` is
/// not given) and write the catalog.
pub fn collect(
    source: Option<PathBuf>,
    repo: Repository,
    output: Option<PathBuf>,
    format: CatalogFormat,
    config: &Path,
) -> Result<()> {
    let config = CollectConfig::load(config)
        .with_context(|| format!("Failed to load config {}", config.display()))?;

    let root = match source {
        Some(path) => path,
        None => {
            let checkout = repo.default_checkout();
            acquire(&repo.clone_url(), &checkout)
                .with_context(|| format!("Failed to fetch {} sources", repo.name()))?;
            checkout
        }
    };
    let output = output.unwrap_or_else(|| default_output(repo));

    let collector = Collector::from_config(&config);
    let catalog = collector
        .collect(&root, repo)
        .with_context(|| format!("Failed to collect controllers under {}", root.display()))?;

    write_catalog(&catalog, format, &output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(output = %output.display(), "catalog written");
    println!(
        "✓ {} modules, {} controllers, {} endpoints -> {}",
        catalog.modules.len(),
        catalog.controller_count(),
        catalog.endpoint_count(),
        output.display()
    );
    Ok(())
}

fn default_output(repo: Repository) -> PathBuf {
    PathBuf::from(format!("{}.yaml", repo.name()))
}
