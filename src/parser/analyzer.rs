//! Controller header analysis: parent class, abstractness, model link, and
//! the module/controller ids derived from the file path.

use std::path::{Path, PathBuf};

use super::patterns::PatternLibrary;

/// Facts about one controller file shared by all of its endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControllerFacts {
    pub module: String,
    pub controller: String,
    pub filename: String,
    pub base_class: String,
    pub is_abstract: bool,
    pub model_filename: Option<PathBuf>,
}

/// Analyze the header region of a controller source.
///
/// Nothing here fails: every missing match leaves its field at the default.
pub fn analyze_controller(path: &Path, source: &str, patterns: &PatternLibrary) -> ControllerFacts {
    let filename = path
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_default();
    let (base_class, is_abstract) = class_header(source, patterns);

    ControllerFacts {
        module: module_name(path),
        controller: controller_name(&filename, &patterns.controller_suffix),
        filename,
        base_class,
        is_abstract,
        model_filename: resolve_model(path, source, patterns),
    }
}

/// Module id: third path segment from the end, lowercased.
///
/// `.../OPNsense/Firewall/Api/AliasController.php` -> `firewall`
pub fn module_name(path: &Path) -> String {
    path.iter()
        .rev()
        .nth(2)
        .map(|segment| segment.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Controller id: file name before the suffix (any case), CamelCase split on every
/// capital, lowercased.
///
/// `AliasUtilController.php` -> `alias_util`
pub fn controller_name(filename: &str, suffix: &str) -> String {
    let stem = match filename.to_ascii_lowercase().find(&suffix.to_ascii_lowercase()) {
        Some(end) => &filename[..end],
        _ => filename,
    };
    let mut name = String::with_capacity(stem.len() + 4);
    for (i, c) in stem.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            name.push('_');
        }
        name.push(c.to_ascii_lowercase());
    }
    name
}

/// First class header only: `(base class short name, is abstract)`.
fn class_header(source: &str, patterns: &PatternLibrary) -> (String, bool) {
    let Some(caps) = patterns.class_header.captures(source) else {
        return (String::new(), false);
    };

    let is_abstract = caps.get(1).is_some_and(|m| m.as_str() == "abstract");
    let base_class = caps
        .get(2)
        .and_then(|m| m.as_str().rsplit('\\').next())
        .unwrap_or("")
        .to_string();

    (base_class, is_abstract)
}

/// Resolve `$internalModelClass` (or `$internalServiceClass`) to a model
/// descriptor under `<app root>/models/`, where the app root is the file
/// path minus its last five segments.
fn resolve_model(path: &Path, source: &str, patterns: &PatternLibrary) -> Option<PathBuf> {
    let class = patterns
        .model_fields
        .iter()
        .find_map(|field| field.captures(source))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|class| !class.is_empty())?;

    let app_root = path.ancestors().nth(5)?;
    let relative = format!(
        "{}.{}",
        class.trim_start_matches('\\').replace('\\', "/"),
        patterns.model_extension
    );
    let candidate = app_root.join(&patterns.models_dir).join(relative);

    if candidate.is_file() {
        Some(candidate)
    } else {
        tracing::debug!(
            controller = %path.display(),
            model = %candidate.display(),
            "model descriptor not found"
        );
        None
    }
}
