//
//  actions.rs
//  opncat
//
//  Action method discovery. Method boundaries come from consecutive header
//  matches, not from brace matching.
//

use super::analyzer::ControllerFacts;
use super::patterns::PatternLibrary;
use crate::catalog::types::{Endpoint, EndpointType};

/// Result of scanning one file for action methods.
#[derive(Debug, Clone, Default)]
pub struct ActionScan {
    /// Candidate endpoints in declaration order.
    pub endpoints: Vec<Endpoint>,
    /// Commands the file defines explicitly.
    pub commands: Vec<String>,
}

/// A method header located in the source.
struct MethodHeader<'a> {
    name: &'a str,
    params: &'a str,
    start: usize,
    end: usize,
}

/// Find action methods, slice their bodies and classify their verbs.
pub fn extract_actions(source: &str, facts: &ControllerFacts, patterns: &PatternLibrary) -> ActionScan {
    let headers: Vec<MethodHeader<'_>> = patterns
        .method_header
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(MethodHeader {
                name: caps.get(3)?.as_str(),
                params: caps.get(4).map_or("", |m| m.as_str()),
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect();

    let endpoint_type =
        EndpointType::classify(facts.is_abstract, &facts.controller, &patterns.service_marker);

    let mut scan = ActionScan::default();
    for (idx, header) in headers.iter().enumerate() {
        let Some(command) = patterns.action_command(header.name) else {
            continue;
        };

        let body_end = headers.get(idx + 1).map_or(source.len(), |next| next.start);
        let body = &source[header.end..body_end];

        scan.commands.push(command.to_string());
        scan.endpoints.push(Endpoint {
            method: patterns.classify_method(body),
            module: facts.module.clone(),
            controller: facts.controller.clone(),
            is_abstract: facts.is_abstract,
            base_class: facts.base_class.clone(),
            command: command.to_string(),
            parameters: parse_parameters(header.params),
            filename: facts.filename.clone(),
            model_filename: facts.model_filename.clone(),
            endpoint_type,
        });
    }

    scan
}

/// Parameter names from a raw PHP parameter list, in order.
///
/// `?string $uuid = null, array &...$rest` -> `["uuid", "rest"]`
pub fn parse_parameters(raw: &str) -> Vec<String> {
    if raw.chars().all(char::is_whitespace) {
        return Vec::new();
    }

    split_top_level(raw)
        .into_iter()
        .filter_map(|param| {
            let declaration = param.split('=').next().unwrap_or(param).trim();
            let name = declaration
                .split_whitespace()
                .last()?
                .trim_start_matches('&')
                .trim_start_matches("...")
                .trim_start_matches('$');
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

/// Split on commas outside brackets and string literals.
fn split_top_level(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in raw.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '(' | '[') => depth += 1,
            (None, ')' | ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&raw[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&raw[start..]);
    parts
}
