// src/util/config.rs
// Application configuration: optional YAML file, then environment overrides

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::log_debug;

pub const DEFAULT_CONFIG_PATH: &str = "./config.yaml";
pub const DEFAULT_CONTROL_URL: &str = "https://api.pinecone.io";
pub const DEFAULT_DATA_URL: &str = "https://prod-1-data.ke.pinecone.io";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub api_key: String,
    pub assistant_name: String,
    /// Host serving assistant metadata (existence checks)
    pub control_url: String,
    /// Host serving chat completions and file listings
    pub data_url: String,
    pub request_timeout_secs: u64,
    pub show_assistant_files: bool,
    pub show_citations: bool,
    pub log_dir: PathBuf,
    pub database_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            assistant_name: String::new(),
            control_url: DEFAULT_CONTROL_URL.to_string(),
            data_url: DEFAULT_DATA_URL.to_string(),
            request_timeout_secs: 60,
            show_assistant_files: false,
            show_citations: true,
            log_dir: PathBuf::from("./logs"),
            database_path: PathBuf::from("./db/assistant_chat.db"),
        }
    }
}

impl AppConfig {
    /// Loads `.env`, the YAML file named by `ASSISTANT_CHAT_CONFIG` (or
    /// `./config.yaml` when present), then applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let path = std::env::var("ASSISTANT_CHAT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Environment variables win over file values.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PINECONE_API_KEY") {
            self.api_key = v;
        }
        if let Some(v) = lookup("PINECONE_ASSISTANT_NAME") {
            self.assistant_name = v;
        }
        if let Some(v) = lookup("PINECONE_CONTROL_URL") {
            self.control_url = v;
        }
        if let Some(v) = lookup("PINECONE_DATA_URL") {
            self.data_url = v;
        }
        if let Some(v) = lookup("SHOW_ASSISTANT_FILES") {
            self.show_assistant_files = parse_flag(&v, self.show_assistant_files);
        }
        if let Some(v) = lookup("SHOW_CITATIONS") {
            self.show_citations = parse_flag(&v, self.show_citations);
        }
        if let Some(v) = lookup("ASSISTANT_CHAT_LOG_DIR") {
            self.log_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("ASSISTANT_CHAT_DB") {
            self.database_path = PathBuf::from(v);
        }
        log_debug!("Config after env overrides: assistant={} data_url={}", self.assistant_name, self.data_url);
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_flag(value: &str, fallback: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => fallback,
    }
}

pub struct ConfigValidator;

impl ConfigValidator {
    /// Checks values that would make every request fail. A missing assistant
    /// name or API key is not an error here: the UI reports it as a setup
    /// problem instead.
    pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
        Self::validate_url("control_url", &config.control_url)?;
        Self::validate_url("data_url", &config.data_url)?;

        if config.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    fn validate_url(field: &'static str, url: &str) -> Result<(), ConfigError> {
        if url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field,
                reason: "must not be empty".to_string(),
            });
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field,
                reason: format!("expected an http(s) URL, got {}", url),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_yaml_values_fill_missing_fields_with_defaults() {
        let yaml = r#"
assistant_name: "utpl-helper"
show_assistant_files: true
"#;

        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.assistant_name, "utpl-helper");
        assert!(config.show_assistant_files);
        assert!(config.show_citations);
        assert_eq!(config.control_url, DEFAULT_CONTROL_URL);
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = AppConfig::from_yaml("assistant_name: from-file\napi_key: file-key\n").unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("PINECONE_ASSISTANT_NAME", "from-env"),
            ("SHOW_CITATIONS", "false"),
        ]);

        config.apply_env_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.assistant_name, "from-env");
        assert_eq!(config.api_key, "file-key");
        assert!(!config.show_citations);
    }

    #[test]
    fn test_unrecognised_flag_keeps_previous_value() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| (key == "SHOW_ASSISTANT_FILES").then(|| "maybe".to_string()));
        assert!(!config.show_assistant_files);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data_url: \"http://localhost:8080\"").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.data_url, "http://localhost:8080");
    }

    #[test]
    fn test_validation_rejects_bad_urls_and_zero_timeout() {
        let mut config = AppConfig::default();
        assert!(ConfigValidator::validate(&config).is_ok());

        config.data_url = "ftp://example.com".to_string();
        assert!(ConfigValidator::validate(&config).is_err());

        config.data_url = DEFAULT_DATA_URL.to_string();
        config.request_timeout_secs = 0;
        assert!(ConfigValidator::validate(&config).is_err());
    }
}
