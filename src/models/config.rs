use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::search::OutputFormat;
use crate::error::ConfigError;

pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_EMBEDDING_MODEL: &str = "embedding-001";
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_STORE_FILE: &str = "vector_db.json";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub indexing: IndexingConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("docrag").join("config.toml"))
    }

    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            return Self::load_from(&path);
        }
        Ok(Self::default())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_path().ok_or_else(|| {
            ConfigError::PathError("could not determine config directory".to_string())
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(path)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit.burst == 0 {
            return Err(ConfigError::ValidationError(
                "rate_limit.burst must be at least 1".to_string(),
            ));
        }
        if self.rate_limit.interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "rate_limit.interval_ms must be at least 1".to_string(),
            ));
        }
        if self.search.default_top_k == 0 {
            return Err(ConfigError::ValidationError(
                "search.default_top_k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Read the service credential from the environment.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        let var = &self.gemini.api_key_env;
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(ConfigError::MissingCredential(var.clone())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_url")]
    pub base_url: String,

    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    #[serde(default = "default_generation_model")]
    pub generation_model: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_gemini_url() -> String {
    DEFAULT_GEMINI_URL.to_string()
}

fn default_embedding_model() -> String {
    DEFAULT_EMBEDDING_MODEL.to_string()
}

fn default_generation_model() -> String {
    DEFAULT_GENERATION_MODEL.to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: default_gemini_url(),
            embedding_model: default_embedding_model(),
            generation_model: default_generation_model(),
            timeout_secs: default_timeout(),
            api_key_env: default_api_key_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("docrag").join(DEFAULT_STORE_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_FILE))
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Time to earn one permit
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Permits available at once
    #[serde(default = "default_burst")]
    pub burst: u32,

    /// Pause after each successful embedding
    #[serde(default = "default_embed_delay_ms")]
    pub embed_delay_ms: u64,
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_burst() -> u32 {
    2
}

fn default_embed_delay_ms() -> u64 {
    100
}

impl RateLimitConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn embed_delay(&self) -> Duration {
        Duration::from_millis(self.embed_delay_ms)
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            burst: default_burst(),
            embed_delay_ms: default_embed_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexingConfig {
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "**/node_modules/**".to_string(),
        "**/target/**".to_string(),
        "**/.git/**".to_string(),
        "**/dist/**".to_string(),
        "**/build/**".to_string(),
        "**/__pycache__/**".to_string(),
        "**/.venv/**".to_string(),
        "**/vendor/**".to_string(),
        "**/*.min.js".to_string(),
        "**/*.min.css".to_string(),
        "**/package-lock.json".to_string(),
    ]
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: default_exclude_patterns(),
            max_file_size: default_max_file_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    #[serde(default)]
    pub default_format: OutputFormat,
}

fn default_top_k() -> usize {
    3
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
            default_format: OutputFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.gemini.base_url, DEFAULT_GEMINI_URL);
        assert_eq!(config.gemini.embedding_model, DEFAULT_EMBEDDING_MODEL);
        assert_eq!(config.gemini.api_key_env, DEFAULT_API_KEY_ENV);
        assert!(config.store.path.ends_with(DEFAULT_STORE_FILE));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rate_limit_default() {
        let config = RateLimitConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(1));
        assert_eq!(config.burst, 2);
        assert_eq!(config.embed_delay(), Duration::from_millis(100));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [store]
            path = "/tmp/db.json"

            [rate_limit]
            burst = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.store.path, PathBuf::from("/tmp/db.json"));
        assert_eq!(config.rate_limit.burst, 5);
        assert_eq!(config.rate_limit.interval_ms, 1000);
        assert_eq!(config.search.default_top_k, 3);
    }

    #[test]
    fn test_load_from_rejects_zero_burst() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[rate_limit]\nburst = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_api_key_missing() {
        let mut config = Config::default();
        config.gemini.api_key_env = "DOCRAG_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        let err = config.api_key().unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(_)));
    }
}
