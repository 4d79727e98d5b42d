//
//  credentials.rs
//  opncat
//

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{CatalogError, Result};

/// API key and secret used for basic auth.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"***")
            .finish()
    }
}

impl Credentials {
    /// Explicit key and secret win; the secret file only fills in when one
    /// of them is missing.
    pub fn resolve(key: Option<&str>, secret: Option<&str>, secret_file: Option<&Path>) -> Result<Self> {
        let mut credentials = Self {
            key: key.unwrap_or_default().to_string(),
            secret: secret.unwrap_or_default().to_string(),
        };

        if credentials.key.is_empty() || credentials.secret.is_empty() {
            if let Some(path) = secret_file {
                let contents = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
                let fields = Self::parse_secret_file(&contents)
                    .ok_or_else(|| CatalogError::InvalidSecretFile(path.to_path_buf()))?;
                if let Some(key) = fields.key {
                    credentials.key = key;
                }
                if let Some(secret) = fields.secret {
                    credentials.secret = secret;
                }
            }
        }

        Ok(credentials)
    }

    /// Parse the `key=` / `secret=` file downloaded from the web UI.
    /// Needs at least two lines; later lines override earlier ones.
    pub fn parse_secret_file(contents: &str) -> Option<SecretFile> {
        let lines: Vec<&str> = contents.split('\n').collect();
        if lines.len() < 2 {
            return None;
        }

        let mut fields = SecretFile::default();
        for line in lines {
            let line = line.trim_end_matches('\r');
            if let Some(key) = line.strip_prefix("key=") {
                fields.key = Some(key.to_string());
            }
            if let Some(secret) = line.strip_prefix("secret=") {
                fields.secret = Some(secret.to_string());
            }
        }
        Some(fields)
    }
}

/// Fields found in a secret file. Absent lines leave the value unset.
#[derive(Default, PartialEq, Eq)]
pub struct SecretFile {
    pub key: Option<String>,
    pub secret: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_secret_file() {
        let parsed = Credentials::parse_secret_file("key=abc\nsecret=xyz\n").unwrap();
        assert_eq!(parsed.key.as_deref(), Some("abc"));
        assert_eq!(parsed.secret.as_deref(), Some("xyz"));
    }

    #[test]
    fn test_parse_secret_file_crlf() {
        let parsed = Credentials::parse_secret_file("key=abc\r\nsecret=xyz\r\n").unwrap();
        assert_eq!(parsed.secret.as_deref(), Some("xyz"));
    }

    #[test]
    fn test_single_line_rejected() {
        assert!(Credentials::parse_secret_file("key=abc").is_none());
    }

    #[test]
    fn test_explicit_values_skip_file() {
        let creds = Credentials::resolve(
            Some("k"),
            Some("s"),
            Some(Path::new("/does/not/exist")),
        )
        .unwrap();
        assert_eq!(creds.key, "k");
        assert_eq!(creds.secret, "s");
    }

    #[test]
    fn test_file_fills_missing_secret() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apikey.txt");
        std::fs::write(&path, "key=from-file\nsecret=file-secret\n").unwrap();

        let creds = Credentials::resolve(Some("k"), None, Some(&path)).unwrap();
        assert_eq!(creds.key, "from-file");
        assert_eq!(creds.secret, "file-secret");
    }

    #[test]
    fn test_file_without_key_keeps_explicit_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apikey.txt");
        std::fs::write(&path, "# downloaded\nsecret=file-secret\n").unwrap();

        let creds = Credentials::resolve(Some("explicit-key"), None, Some(&path)).unwrap();
        assert_eq!(creds.key, "explicit-key");
        assert_eq!(creds.secret, "file-secret");
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("apikey.txt");
        std::fs::write(&path, "nothing").unwrap();
        assert!(matches!(
            Credentials::resolve(None, None, Some(&path)),
            Err(CatalogError::InvalidSecretFile(_))
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let creds = Credentials {
            key: "k".to_string(),
            secret: "hunter2".to_string(),
        };
        assert!(!format!("{creds:?}").contains("hunter2"));
    }
}
