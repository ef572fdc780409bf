//! Configuration loading and management

use crate::core::error::{ConfigError, ShapeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Paging defaults and server settings for resource listings.
///
/// Every key is optional in YAML; missing keys fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Requested page sizes above this are silently capped
    pub max_page_size: usize,

    pub default_page_size: usize,

    pub default_page_number: usize,

    /// Order-by string used when the caller sends none
    pub default_order_by: String,

    /// Socket address the server binds to
    pub bind_address: String,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            max_page_size: 20,
            default_page_size: 10,
            default_page_number: 1,
            default_order_by: "name".to_string(),
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}

impl ListingConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ShapeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> ShapeResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ShapeError;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ListingConfig::default();
        assert_eq!(config.max_page_size, 20);
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.default_page_number, 1);
        assert_eq!(config.default_order_by, "name");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ListingConfig::from_yaml_str("max_page_size: 50\ndefault_order_by: age desc\n")
            .unwrap();
        assert_eq!(config.max_page_size, 50);
        assert_eq!(config.default_order_by, "age desc");
        assert_eq!(config.default_page_size, 10);
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bind_address: 0.0.0.0:8080").unwrap();

        let config = ListingConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ListingConfig::from_yaml_file(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(
            err,
            ShapeError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_malformed_file_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_page_size: [not, a, number]").unwrap();

        let err = ListingConfig::from_yaml_file(file.path()).unwrap_err();
        match err {
            ShapeError::Config(ConfigError::ParseError { file: Some(_), .. }) => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
