//! Adapter credentials and extraction settings.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

pub const DEFAULT_MODEL_ID: &str = "qwen-turbo";
pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_EXTRACTION_PASSES: u32 = 2;

pub const ENV_API_KEY: &str = "SAVOR_API_KEY";
pub const ENV_MODEL_ID: &str = "SAVOR_MODEL_ID";
pub const ENV_BASE_URL: &str = "SAVOR_BASE_URL";

/// Connection settings for a remote structured-extraction service.
///
/// Construction validates the credential eagerly: a config value that
/// exists always carries a non-blank API key.
#[derive(Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.into()
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl std::fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("api_key", &"***")
            .field("model_id", &self.model_id)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AdapterConfig {
    /// Build a config from an explicit key and model.
    pub fn new(api_key: impl Into<String>, model_id: impl Into<String>) -> Result<Self> {
        let config = Self {
            api_key: api_key.into(),
            model_id: model_id.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Read settings from the environment.
    ///
    /// Returns `Ok(None)` when no API key variable is set, which selects
    /// rule-based extraction. A variable that is set but blank is an error.
    pub fn from_env() -> Result<Option<Self>> {
        let api_key = match std::env::var(ENV_API_KEY) {
            Ok(k) => k,
            Err(_) => return Ok(None),
        };
        let mut config = Self {
            api_key,
            model_id: DEFAULT_MODEL_ID.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(Some(config))
    }

    /// Load from a JSON file, using the environment for any missing key.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: AdapterConfig = serde_json::from_str(&raw)?;
        if config.api_key.trim().is_empty() {
            if let Ok(k) = std::env::var(ENV_API_KEY) {
                config.api_key = k;
            }
        }
        config.apply_env_overrides();
        config.validate()?;
        info!(
            "Loaded adapter config from {} (model={})",
            path.display(),
            config.model_id
        );
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(m) = std::env::var(ENV_MODEL_ID) {
            if !m.trim().is_empty() {
                self.model_id = m;
            }
        }
        if let Ok(u) = std::env::var(ENV_BASE_URL) {
            if !u.trim().is_empty() {
                self.base_url = u;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config(format!(
                "an API key is required (set {} or api_key)",
                ENV_API_KEY
            )));
        }
        if self.model_id.trim().is_empty() {
            return Err(Error::Config("model_id must not be empty".into()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "base_url must be an http(s) URL, got {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

/// Per-run extraction switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSettings {
    /// Try the adapter first when one is available.
    #[serde(default = "default_use_model")]
    pub use_model: bool,
    /// Forwarded to the adapter untouched.
    #[serde(default = "default_passes")]
    pub extraction_passes: u32,
}

fn default_use_model() -> bool {
    true
}
fn default_passes() -> u32 {
    DEFAULT_EXTRACTION_PASSES
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            use_model: true,
            extraction_passes: DEFAULT_EXTRACTION_PASSES,
        }
    }
}

impl ExtractionSettings {
    pub fn rule_based_only() -> Self {
        Self {
            use_model: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_blank_key() {
        assert!(matches!(AdapterConfig::new("  ", "qwen-plus"), Err(Error::Config(_))));
        let cfg = AdapterConfig::new("sk-test", "qwen-plus").unwrap();
        assert_eq!(cfg.model_id, "qwen-plus");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let cfg = AdapterConfig::new("sk-test", "m").unwrap().with_base_url("ftp://x");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_debug_masks_key() {
        let cfg = AdapterConfig::new("sk-secret", "m").unwrap();
        let shown = format!("{:?}", cfg);
        assert!(!shown.contains("sk-secret"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adapter.json");
        std::fs::write(
            &path,
            r#"{"api_key":"sk-file","model_id":"qwen-plus","timeout_secs":5}"#,
        )
        .unwrap();
        let cfg = AdapterConfig::load(&path).unwrap();
        assert_eq!(cfg.api_key, "sk-file");
        assert_eq!(cfg.timeout_secs, 5);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AdapterConfig::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_settings_defaults() {
        let s = ExtractionSettings::default();
        assert!(s.use_model);
        assert_eq!(s.extraction_passes, 2);
        assert!(!ExtractionSettings::rule_based_only().use_model);
    }
}
