//! Dispatcher client for the OPNsense REST API.
//!
//! Takes command records produced by `collect`, composes the request URL
//! from them and prints the JSON response.

pub mod commands;
pub mod credentials;
pub mod macros;

pub use commands::CommandSet;
pub use credentials::{Credentials, SecretFile};
pub use macros::{find_macro, load_macros, parse_macros, Macro};

use reqwest::blocking::Client;
use reqwest::Method;
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{CommandRecord, HttpMethod};
use crate::error::{CatalogError, Result};

pub struct ApiClient {
    base_url: String,
    credentials: Credentials,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, credentials: Credentials, insecure: bool) -> Result<Self> {
        let http = Client::builder()
            .danger_accept_invalid_certs(insecure)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            http,
        })
    }

    /// `<base>/api/<module>/<controller>/<command>[/<args>..]`
    pub fn build_url(&self, record: &CommandRecord, args: &[String]) -> String {
        let mut url = format!(
            "{}/api/{}/{}/{}",
            self.base_url, record.module, record.controller, record.command
        );
        for arg in args {
            url.push('/');
            url.push_str(arg);
        }
        url
    }

    /// Send the request and parse the body as JSON.
    pub fn call(
        &self,
        record: &CommandRecord,
        args: &[String],
        method_override: Option<&str>,
    ) -> Result<serde_json::Value> {
        let method = request_method(record.method, method_override)?;
        let url = self.build_url(record, args);
        debug!(%method, %url, "calling api");

        let response = self
            .http
            .request(method, &url)
            .basic_auth(&self.credentials.key, Some(&self.credentials.secret))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, %url, "api returned an error status");
        }

        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| CatalogError::InvalidResponse {
            reason: e.to_string(),
            body,
        })
    }
}

/// Wildcard endpoints take the override (or GET); others keep their verb.
pub fn request_method(method: HttpMethod, method_override: Option<&str>) -> Result<Method> {
    match method {
        HttpMethod::Get => Ok(Method::GET),
        HttpMethod::Post => Ok(Method::POST),
        HttpMethod::Any => match method_override {
            Some(name) => Method::from_bytes(name.to_uppercase().as_bytes())
                .map_err(|_| CatalogError::InvalidMethod(name.to_string())),
            None => Ok(Method::GET),
        },
    }
}

/// JSON pretty printed with four-space indentation.
pub fn pretty_json(value: &serde_json::Value) -> Result<String> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(method: HttpMethod) -> CommandRecord {
        CommandRecord {
            module: "firewall".to_string(),
            controller: "alias_util".to_string(),
            command: "list".to_string(),
            method,
            parameters: vec!["alias".to_string()],
        }
    }

    #[test]
    fn test_build_url() {
        let client = ApiClient::new("https://fw.local/", Credentials::default(), false).unwrap();
        let url = client.build_url(&record(HttpMethod::Get), &["blocklist".to_string()]);
        assert_eq!(url, "https://fw.local/api/firewall/alias_util/list/blocklist");

        let bare = client.build_url(&record(HttpMethod::Get), &[]);
        assert_eq!(bare, "https://fw.local/api/firewall/alias_util/list");
    }

    #[test]
    fn test_request_method() {
        assert_eq!(request_method(HttpMethod::Get, Some("post")).unwrap(), Method::GET);
        assert_eq!(request_method(HttpMethod::Post, None).unwrap(), Method::POST);
        assert_eq!(request_method(HttpMethod::Any, None).unwrap(), Method::GET);
        assert_eq!(request_method(HttpMethod::Any, Some("post")).unwrap(), Method::POST);
        assert!(matches!(
            request_method(HttpMethod::Any, Some("bad method")),
            Err(CatalogError::InvalidMethod(_))
        ));
    }

    #[test]
    fn test_pretty_json() {
        let value = serde_json::json!({"status": "ok"});
        assert_eq!(pretty_json(&value).unwrap(), "{\n    \"status\": \"ok\"\n}");
    }
}
