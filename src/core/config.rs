use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.nbp.pl/api";

pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::new(128).unwrap();

fn default_cache_capacity() -> NonZeroUsize {
    DEFAULT_CACHE_CAPACITY
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Settings a [`crate::client::Client`] is built from.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ClientConfig {
    pub currency_code: String,
    /// Store rates as `f64` instead of decimals.
    #[serde(default)]
    pub use_float: bool,
    /// Resolve API failures to `None` instead of returning them.
    #[serde(default)]
    pub suppress_errors: bool,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: NonZeroUsize,
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl ClientConfig {
    pub fn new(currency_code: &str) -> Self {
        Self {
            currency_code: currency_code.to_string(),
            use_float: false,
            suppress_errors: false,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            provider: ProviderConfig::default(),
        }
    }

    pub fn with_float(mut self, use_float: bool) -> Self {
        self.use_float = use_float;
        self
    }

    pub fn with_suppress_errors(mut self, suppress_errors: bool) -> Self {
        self.suppress_errors = suppress_errors;
        self
    }

    pub fn with_cache_capacity(mut self, cache_capacity: NonZeroUsize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.provider.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("pl", "nbp-rates", "nbp-rates")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization_defaults() {
        let yaml_str = r#"
currency_code: "EUR"
"#;

        let config: ClientConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config, ClientConfig::new("EUR"));
        assert!(!config.use_float);
        assert!(!config.suppress_errors);
        assert_eq!(config.cache_capacity.get(), 128);
        assert_eq!(config.provider.base_url, "https://api.nbp.pl/api");
    }

    #[test]
    fn test_config_deserialization_full() {
        let yaml_str = r#"
currency_code: "usd"
use_float: true
suppress_errors: true
cache_capacity: 16
provider:
  base_url: "http://example.com/api"
"#;

        let config: ClientConfig = serde_yaml::from_str(yaml_str).unwrap();
        assert_eq!(config.currency_code, "usd");
        assert!(config.use_float);
        assert!(config.suppress_errors);
        assert_eq!(config.cache_capacity.get(), 16);
        assert_eq!(config.provider.base_url, "http://example.com/api");
    }

    #[test]
    fn test_zero_cache_capacity_is_rejected() {
        let yaml_str = r#"
currency_code: "EUR"
cache_capacity: 0
"#;
        assert!(serde_yaml::from_str::<ClientConfig>(yaml_str).is_err());
    }

    #[test]
    fn test_builder_methods() {
        let config = ClientConfig::new("CHF")
            .with_float(true)
            .with_suppress_errors(true)
            .with_cache_capacity(NonZeroUsize::new(3).unwrap())
            .with_base_url("http://localhost:8080/api/");

        assert!(config.use_float);
        assert!(config.suppress_errors);
        assert_eq!(config.cache_capacity.get(), 3);
        assert_eq!(config.provider.base_url, "http://localhost:8080/api");
    }

    #[test]
    fn test_load_from_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "currency_code: GBP\nsuppress_errors: true\n").unwrap();

        let config = ClientConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.currency_code, "GBP");
        assert!(config.suppress_errors);

        let missing = file.path().with_extension("missing");
        let err = ClientConfig::load_from_path(&missing).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read config file"));
    }
}
