//
//  aggregate.rs
//  opncat
//

use std::path::PathBuf;

use super::types::{Catalog, Controller, ControllerLink, Endpoint};
use crate::source::Repository;

/// Sorted endpoints of one analyzed controller file.
#[derive(Debug, Clone)]
pub struct FileEndpoints {
    pub path: PathBuf,
    pub endpoints: Vec<Endpoint>,
}

/// Sort by command. The sort is stable, so equal commands keep their order.
pub fn sort_endpoints(endpoints: &mut [Endpoint]) {
    endpoints.sort_by(|a, b| a.command.cmp(&b.command));
}

/// Group per-file results into modules of controllers.
///
/// Files are taken in path order and files without endpoints are dropped.
/// Controller metadata comes from the first endpoint, and a model link is
/// recorded when that endpoint carries a model file.
pub fn aggregate(mut files: Vec<FileEndpoints>, repo: Repository) -> Catalog {
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let mut catalog = Catalog::default();
    for file in files {
        let Some(first) = file.endpoints.first() else {
            continue;
        };

        let uses = first
            .model_filename
            .as_ref()
            .map(|model| ControllerLink {
                link_type: "model".to_string(),
                link: repo.source_url(model),
                name: model
                    .file_name()
                    .map(|f| f.to_string_lossy().to_string())
                    .unwrap_or_default(),
            })
            .into_iter()
            .collect();

        let module = first.module.clone();
        let mut controller = Controller {
            controller_type: first.endpoint_type,
            filename: first.filename.clone(),
            is_abstract: first.is_abstract,
            base_class: first.base_class.clone(),
            uses,
            endpoints: Vec::new(),
        };
        controller.endpoints = file.endpoints;

        catalog.modules.entry(module).or_default().push(controller);
    }

    catalog
}
