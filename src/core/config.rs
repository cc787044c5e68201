use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const FRANKFURTER_BASE_URL: &str = "https://api.frankfurter.app";
pub const EXCHANGERATE_HOST_BASE_URL: &str = "https://api.exchangerate.host";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default = "default_primary")]
    pub primary: ProviderConfig,
    #[serde(default = "default_secondary")]
    pub secondary: ProviderConfig,
}

fn default_primary() -> ProviderConfig {
    ProviderConfig {
        base_url: FRANKFURTER_BASE_URL.to_string(),
    }
}

fn default_secondary() -> ProviderConfig {
    ProviderConfig {
        base_url: EXCHANGERATE_HOST_BASE_URL.to_string(),
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            primary: default_primary(),
            secondary: default_secondary(),
        }
    }
}

/// Default selections of the from/to pickers.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConversionConfig {
    pub from: String,
    pub to: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        ConversionConfig {
            from: "USD".to_string(),
            to: "YER".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct NumberFormat {
    pub group_separator: String,
    pub decimal_separator: String,
    pub min_fraction_digits: usize,
    pub max_fraction_digits: usize,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat {
            group_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            min_fraction_digits: 4,
            max_fraction_digits: 6,
        }
    }
}

fn default_base_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default)]
    pub conversion: ConversionConfig,
    #[serde(default)]
    pub number_format: NumberFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            base_currency: default_base_currency(),
            conversion: ConversionConfig::default(),
            number_format: NumberFormat::default(),
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to the
    /// built-in defaults when no file exists there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxview", "fxview")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config = Self::parse(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    fn parse(config_str: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to an empty mapping
        if config_str.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(config_str)?)
    }
}
