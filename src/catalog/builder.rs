//
//  builder.rs
//  opncat
//

use ignore::WalkBuilder;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::aggregate::{aggregate, sort_endpoints, FileEndpoints};
use super::defaults::BaseDefaults;
use super::types::{Catalog, Endpoint};
use crate::config::{CollectConfig, ScanConfig};
use crate::error::{CatalogError, Result};
use crate::parser::{analyze_controller, extract_actions, PatternLibrary};
use crate::source::Repository;

/// Per-file analysis pipeline plus the tree walk that feeds it.
#[derive(Debug, Clone)]
pub struct Collector {
    scan: ScanConfig,
    patterns: PatternLibrary,
    defaults: BaseDefaults,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(
            ScanConfig::default(),
            PatternLibrary::default(),
            BaseDefaults::default(),
        )
    }
}

impl Collector {
    pub fn new(scan: ScanConfig, patterns: PatternLibrary, defaults: BaseDefaults) -> Self {
        Self {
            scan,
            patterns,
            defaults,
        }
    }

    pub fn from_config(config: &CollectConfig) -> Self {
        Self::new(
            config.scan.clone(),
            PatternLibrary::from_conventions(&config.conventions),
            BaseDefaults::default().with_entries(&config.base_defaults),
        )
    }

    pub fn patterns(&self) -> &PatternLibrary {
        &self.patterns
    }

    /// Endpoints of one controller source, merged and sorted by command.
    /// Empty when the file defines no actions.
    pub fn analyze_source(&self, path: &Path, source: &str) -> Vec<Endpoint> {
        let facts = analyze_controller(path, source, &self.patterns);
        let scan = extract_actions(source, &facts, &self.patterns);
        if scan.endpoints.is_empty() {
            return Vec::new();
        }

        let mut endpoints = scan.endpoints;
        endpoints.extend(
            self.defaults
                .merge(&facts, &scan.commands, &self.patterns.service_marker),
        );
        sort_endpoints(&mut endpoints);
        endpoints
    }

    /// Invalid UTF-8 is replaced, not rejected; only the read itself can fail.
    pub fn analyze_file(&self, path: &Path) -> Result<Vec<Endpoint>> {
        let bytes = fs::read(path).map_err(|e| CatalogError::io(path, e))?;
        let source = String::from_utf8_lossy(&bytes);
        Ok(self.analyze_source(path, &source))
    }

    /// Controller files under `root`, sorted by path.
    pub fn controller_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(CatalogError::io(
                root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "source directory not found"),
            ));
        }

        let mut files = Vec::new();
        for entry in WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .ignore(false)
            .build()
        {
            let entry = entry?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            if self.scan.is_controller_path(entry.path()) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Walk `root`, analyze every controller in parallel and aggregate.
    /// Any unreadable file aborts the whole collection.
    pub fn collect(&self, root: &Path, repo: Repository) -> Result<Catalog> {
        let files = self.controller_files(root)?;
        info!(root = %root.display(), files = files.len(), "analyzing controllers");

        let results = files
            .par_iter()
            .map(|path| -> Result<FileEndpoints> {
                let endpoints = self.analyze_file(path)?;
                debug!(file = %path.display(), endpoints = endpoints.len(), "analyzed");
                Ok(FileEndpoints {
                    path: path.clone(),
                    endpoints,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let catalog = aggregate(results, repo);
        info!(
            modules = catalog.modules.len(),
            controllers = catalog.controller_count(),
            endpoints = catalog.endpoint_count(),
            "catalog built"
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{EndpointType, HttpMethod};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use tempfile::tempdir;

    const SERVICE_CONTROLLER: &str = r#"<?php

namespace OPNsense\Cron\Api;

use OPNsense\Base\ApiMutableServiceControllerBase;

class ServiceController extends ApiMutableServiceControllerBase
{
    protected static $internalServiceClass = '\OPNsense\Cron\Cron';
    protected static $internalServiceName = 'cron';

    public function statusAction()
    {
        return ['status' => 'running'];
    }

    public function reconfigureAction()
    {
        if ($this->request->isPost()) {
            return ['status' => 'ok'];
        }
    }
}
"#;

    const ALIAS_CONTROLLER: &str = r#"<?php
namespace OPNsense\Firewall\Api;

class AliasController extends ApiMutableModelControllerBase
{
    protected static $internalModelClass = 'OPNsense\Firewall\Alias';

    public function setItemAction($uuid)
    {
        return $this->setBase("alias", "aliases.alias", $uuid);
    }

    public function searchItemAction()
    {
        return $this->searchBase("aliases.alias", array('name'));
    }

    public function getAction()
    {
        return ['alias' => []];
    }
}
"#;

    const PLAIN_CONTROLLER: &str = "<?php\nclass PlainController extends ApiControllerBase\n{\n    public function initialize()\n    {\n    }\n}\n";

    const ABSTRACT_CONTROLLER: &str = "<?php\nabstract class ApiMutableServiceControllerBase extends ApiControllerBase\n{\n    public function startAction()\n    {\n        if ($this->request->isPost()) {\n        }\n    }\n\n    public function statusAction()\n    {\n    }\n}\n";

    fn write_tree(root: &Path) {
        let app = root.join("src/opnsense/mvc/app");
        let files = [
            ("controllers/OPNsense/Cron/Api/ServiceController.php", SERVICE_CONTROLLER),
            ("controllers/OPNsense/Firewall/Api/AliasController.php", ALIAS_CONTROLLER),
            ("controllers/OPNsense/Firewall/Api/PlainController.php", PLAIN_CONTROLLER),
            (
                "controllers/OPNsense/Base/Api/AbstractServiceController.php",
                ABSTRACT_CONTROLLER,
            ),
            ("controllers/OPNsense/Core/Api/FirmwareController.php", SERVICE_CONTROLLER),
            ("models/OPNsense/Firewall/Alias.xml", "<model/>"),
            ("models/OPNsense/Firewall/Alias.php", "<?php"),
        ];
        for (rel, contents) in files {
            let path = app.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
    }

    #[test]
    fn test_service_controller_merge() {
        let collector = Collector::default();
        let path = Path::new("/x/mvc/app/controllers/OPNsense/Cron/Api/ServiceController.php");
        let endpoints = collector.analyze_source(path, SERVICE_CONTROLLER);

        let commands: Vec<_> = endpoints.iter().map(|e| e.command.as_str()).collect();
        assert_eq!(
            commands,
            vec!["reconfigure", "restart", "start", "status", "stop"]
        );
        // Explicit status keeps its own verb, explicit reconfigure too.
        let status = endpoints.iter().find(|e| e.command == "status").unwrap();
        assert_eq!(status.method, HttpMethod::Get);
        assert!(endpoints.iter().all(|e| e.endpoint_type == EndpointType::Service));
        assert!(endpoints.iter().all(|e| e.module == "cron"));
    }

    #[test]
    fn test_commands_unique() {
        let collector = Collector::default();
        let path = Path::new("/x/mvc/app/controllers/OPNsense/Cron/Api/ServiceController.php");
        let endpoints = collector.analyze_source(path, SERVICE_CONTROLLER);
        let unique: HashSet<_> = endpoints.iter().map(|e| &e.command).collect();
        assert_eq!(unique.len(), endpoints.len());
    }

    #[test]
    fn test_explicit_action_beats_default() {
        let collector = Collector::default();
        let path = Path::new("/x/mvc/app/controllers/OPNsense/Firewall/Api/AliasController.php");
        let endpoints = collector.analyze_source(path, ALIAS_CONTROLLER);

        let pairs: Vec<_> = endpoints
            .iter()
            .map(|e| (e.command.as_str(), e.method))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("get", HttpMethod::Get),
                ("searchItem", HttpMethod::Any),
                ("set", HttpMethod::Post),
                ("setItem", HttpMethod::Post),
            ]
        );
    }

    #[test]
    fn test_no_actions_no_endpoints() {
        let collector = Collector::default();
        let path = Path::new("/x/mvc/app/controllers/OPNsense/Firewall/Api/PlainController.php");
        assert!(collector.analyze_source(path, PLAIN_CONTROLLER).is_empty());
    }

    #[test]
    fn test_collect_tree() {
        let dir = tempdir().unwrap();
        write_tree(dir.path());

        let catalog = Collector::default()
            .collect(dir.path(), Repository::Core)
            .unwrap();

        assert_eq!(
            catalog.modules.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["base", "cron", "firewall"]
        );
        // PlainController has no actions, FirmwareController is denylisted.
        assert_eq!(catalog.controller_count(), 3);
        assert!(!catalog.endpoints().any(|e| e.module == "core"));

        let alias = &catalog.modules["firewall"][0];
        assert_eq!(alias.filename, "AliasController.php");
        assert_eq!(alias.uses.len(), 1);
        assert_eq!(alias.uses[0].name, "Alias.xml");
        assert!(alias.uses[0]
            .link
            .ends_with("src/opnsense/mvc/app/models/OPNsense/Firewall/Alias.xml"));

        let base = &catalog.modules["base"][0];
        assert!(base.is_abstract);
        assert_eq!(base.controller_type, EndpointType::Abstract);
        assert!(base
            .endpoints
            .iter()
            .all(|e| e.endpoint_type == EndpointType::Abstract));
    }

    #[test]
    fn test_collect_is_idempotent() {
        let dir = tempdir().unwrap();
        write_tree(dir.path());

        let collector = Collector::default();
        let first = collector.collect(dir.path(), Repository::Core).unwrap();
        let second = collector.collect(dir.path(), Repository::Core).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_latin1_comment_does_not_abort() {
        let dir = tempdir().unwrap();
        let api = dir.path().join("mvc/app/controllers/OPNsense/Cron/Api");
        fs::create_dir_all(&api).unwrap();

        let mut source = b"<?php\n// caf".to_vec();
        source.push(0xe9);
        source.extend_from_slice(
            b"\nclass SettingsController extends ApiControllerBase\n{\n    public function getAction()\n    {\n        return [];\n    }\n}\n",
        );
        fs::write(api.join("SettingsController.php"), source).unwrap();

        let catalog = Collector::default()
            .collect(dir.path(), Repository::Core)
            .unwrap();
        let commands: Vec<_> = catalog.endpoints().map(|e| e.qualified_name()).collect();
        assert_eq!(commands, vec!["cron/settings/get"]);
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = tempdir().unwrap();
        let result = Collector::default().collect(&dir.path().join("nope"), Repository::Core);
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }
}
