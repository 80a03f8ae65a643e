//! Document configuration.
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL the web services are reachable at; becomes `basePath`.
    pub web_services_url: String,
    /// Path the resource listing is served from.
    pub api_path: String,
    pub api_version: String,
    pub swagger_version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            web_services_url: String::new(),
            api_path: "/apidocs.json".to_string(),
            api_version: "1.0".to_string(),
            swagger_version: "1.2".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        from_str_with_path(&source).map_err(|(at, message)| ConfigError::Parse {
            path: path.to_path_buf(),
            at,
            message,
        })
    }
}

/// Deserialize with JSON-path context; the error is `(path, message)`.
fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, (String, String)> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        (path, err.into_inner().to_string())
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(src: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(src.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_keys_take_defaults() {
        let file = write_config(r#"{"web_services_url": "http://here.com"}"#);
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.web_services_url, "http://here.com");
        assert_eq!(config.api_path, "/apidocs.json");
        assert_eq!(config.swagger_version, "1.2");
    }

    #[test]
    fn type_errors_carry_the_json_path() {
        let file = write_config(r#"{"api_version": 3}"#);
        match Config::load(file.path()) {
            Err(ConfigError::Parse { at, .. }) => assert_eq!(at, "api_version"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_config(r#"{"api_pth": "/x"}"#);
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Read { .. })));
    }
}
