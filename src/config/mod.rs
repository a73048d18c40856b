//! Configuration loading
//!
//! Sources are merged in order, later ones winning:
//! 1. `AppConfig::default()`
//! 2. a TOML file (`droidbrb.toml` in the working directory, or an explicit path)
//! 3. `DROIDBRB_`-prefixed environment variables, `__` separating nested keys
//!    (e.g. `DROIDBRB_GEOCODING__API_KEY`)

use crate::error::ConfigError;
use crate::geo::MIN_SUGGESTION_CHARS;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_FILENAME: &str = "droidbrb.toml";
pub const CONFIG_ENV_PREFIX: &str = "DROIDBRB";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub geocoding: GeocodingConfig,
    pub places: PlacesConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeocodingConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api/geocode/json".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlacesConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: "https://places.googleapis.com/v1/places:autocomplete".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Shortest input sent to the autocomplete service
    pub min_suggestion_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_suggestion_chars: MIN_SUGGESTION_CHARS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` overrides it
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Use this file instead of looking for `droidbrb.toml`. It must exist.
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        match &self.config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::Invalid(format!(
                        "config file {} does not exist",
                        path.display()
                    )));
                }
                debug!("Loading configuration from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    debug!("Loading configuration from {}", default_path.display());
                    figment = figment.merge(Toml::file(default_path));
                }
            }
        }

        figment = figment.merge(Env::prefixed(&format!("{}_", self.env_prefix)).split("__"));

        let config: AppConfig = figment.extract()?;
        validate(&config)?;
        Ok(config)
    }
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.geocoding.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("geocoding.base_url is empty".into()));
    }
    if config.places.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("places.base_url is empty".into()));
    }
    if config.geocoding.timeout_secs == 0 {
        return Err(ConfigError::Invalid("geocoding.timeout_secs must be positive".into()));
    }
    if config.places.timeout_secs == 0 {
        return Err(ConfigError::Invalid("places.timeout_secs must be positive".into()));
    }
    Ok(())
}
