//
//  patterns.rs
//  opncat
//
//  Lexical rules for OPNsense controllers. One table of verb markers plus
//  the header regexes; nothing here holds state.
//

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::types::HttpMethod;
use crate::config::ConventionConfig;
use crate::error::Result;

// ── Rule Types ───────────────────────────────────────────────────────────────

/// A body marker that implies an HTTP verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerbRule {
    /// Text to search for in the method body
    pub marker: &'static str,
    pub method: HttpMethod,
}

impl VerbRule {
    pub const fn post(marker: &'static str) -> Self {
        Self {
            marker,
            method: HttpMethod::Post,
        }
    }

    pub const fn any(marker: &'static str) -> Self {
        Self {
            marker,
            method: HttpMethod::Any,
        }
    }
}

/// Ordered verb markers (first match wins).
pub const OPNSENSE_VERB_RULES: &[VerbRule] = &[
    VerbRule::post("request->isPost("),
    VerbRule::post("$this->delBase"),
    VerbRule::post("$this->addBase"),
    VerbRule::post("$this->setBase"),
    VerbRule::post("$this->toggleBase"),
    VerbRule::any("$this->searchBase"),
];

// ── Default Regexes ──────────────────────────────────────────────────────────

/// `[abstract] class FooController extends \Some\BaseClass`
static CLASS_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n(\w*).*class.*Controller.*extends\s([\w|\\]*)").unwrap()
});

static MODEL_CLASS_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\sprotected\sstatic\s\$internalModelClass\s=\s['|"]([\w|\\]*)['|"];"#).unwrap()
});

static SERVICE_CLASS_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\sprotected\sstatic\s\$internalServiceClass\s=\s['|"]([\w|\\]*)['|"];"#)
        .unwrap()
});

/// Visibility + `function` + name + single-line parameter list.
static METHOD_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\n\s+(private|public|protected)\s+function\s+(\w+)\((.*)\))").unwrap()
});

// ── Library ──────────────────────────────────────────────────────────────────

/// Everything the analyzer and extractor match against.
///
/// Capture groups are positional: the class header captures
/// `(leading token, parent class)`, model fields capture the class name,
/// and the method header captures `(visibility, name, parameters)` in
/// groups 2 to 4.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    pub class_header: Regex,
    /// Tried in order; the first field that matches anywhere is used.
    pub model_fields: Vec<Regex>,
    pub method_header: Regex,
    pub verb_rules: &'static [VerbRule],
    pub default_method: HttpMethod,
    /// Method-name suffix that marks an API action.
    pub action_suffix: String,
    /// File-name suffix stripped to get the controller id.
    pub controller_suffix: String,
    /// Controller ids containing this are labelled `Service`.
    pub service_marker: String,
    /// Directory under the application root holding model descriptors.
    pub models_dir: String,
    pub model_extension: String,
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self {
            class_header: CLASS_HEADER.clone(),
            model_fields: vec![MODEL_CLASS_FIELD.clone(), SERVICE_CLASS_FIELD.clone()],
            method_header: METHOD_HEADER.clone(),
            verb_rules: OPNSENSE_VERB_RULES,
            default_method: HttpMethod::Get,
            action_suffix: "Action".to_string(),
            controller_suffix: "Controller.php".to_string(),
            service_marker: "service".to_string(),
            models_dir: "models".to_string(),
            model_extension: "xml".to_string(),
        }
    }
}

impl PatternLibrary {
    /// Default regexes with naming conventions taken from config.
    pub fn from_conventions(conventions: &ConventionConfig) -> Self {
        Self {
            action_suffix: conventions.action_suffix.clone(),
            controller_suffix: conventions.controller_suffix.clone(),
            service_marker: conventions.service_marker.clone(),
            models_dir: conventions.models_dir.clone(),
            ..Self::default()
        }
    }

    /// Replace the class header regex.
    pub fn with_class_header(mut self, pattern: &str) -> Result<Self> {
        self.class_header = Regex::new(pattern)?;
        Ok(self)
    }

    /// Replace the method header regex.
    pub fn with_method_header(mut self, pattern: &str) -> Result<Self> {
        self.method_header = Regex::new(pattern)?;
        Ok(self)
    }

    pub fn with_verb_rules(mut self, rules: &'static [VerbRule]) -> Self {
        self.verb_rules = rules;
        self
    }

    /// Infer the verb of a method from its body text.
    pub fn classify_method(&self, body: &str) -> HttpMethod {
        self.verb_rules
            .iter()
            .find(|rule| body.contains(rule.marker))
            .map(|rule| rule.method)
            .unwrap_or(self.default_method)
    }

    /// Strip the action suffix, if the name is an action.
    pub fn action_command<'a>(&self, method_name: &'a str) -> Option<&'a str> {
        method_name
            .strip_suffix(self.action_suffix.as_str())
            .filter(|command| !command.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_default_get() {
        let lib = PatternLibrary::default();
        assert_eq!(lib.classify_method("return $this->getBase('alias');"), HttpMethod::Get);
        assert_eq!(lib.classify_method(""), HttpMethod::Get);
    }

    #[test]
    fn test_classify_post_markers() {
        let lib = PatternLibrary::default();
        for body in [
            "if ($this->request->isPost()) {",
            "return $this->delBase('items.item', $uuid);",
            "return $this->addBase('item', 'items.item');",
            "return $this->setBase('item', 'items.item', $uuid);",
            "return $this->toggleBase('items.item', $uuid);",
        ] {
            assert_eq!(lib.classify_method(body), HttpMethod::Post, "{body}");
        }
    }

    #[test]
    fn test_classify_search_is_wildcard() {
        let lib = PatternLibrary::default();
        assert_eq!(
            lib.classify_method("return $this->searchBase('items.item', ['name']);"),
            HttpMethod::Any
        );
    }

    #[test]
    fn test_classify_priority() {
        // POST markers are listed before searchBase.
        let lib = PatternLibrary::default();
        let body = "$this->searchBase('a'); $this->toggleBase('a', $uuid);";
        assert_eq!(lib.classify_method(body), HttpMethod::Post);
    }

    #[test]
    fn test_swapped_rules() {
        const ONLY_SEARCH: &[VerbRule] = &[VerbRule::any("$this->searchBase")];
        let lib = PatternLibrary::default().with_verb_rules(ONLY_SEARCH);
        assert_eq!(lib.classify_method("$this->delBase('a')"), HttpMethod::Get);
    }

    #[test]
    fn test_action_command() {
        let lib = PatternLibrary::default();
        assert_eq!(lib.action_command("searchItemAction"), Some("searchItem"));
        assert_eq!(lib.action_command("initialize"), None);
        assert_eq!(lib.action_command("Action"), None);
    }

    #[test]
    fn test_invalid_override_is_error() {
        assert!(PatternLibrary::default().with_class_header("(").is_err());
    }
}
