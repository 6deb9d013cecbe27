//! Configuration management for shopdesk
//!
//! This module handles loading, validation, and management of
//! shopdesk configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the record files
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { path: default_data_path() }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

/// Pagination settings shared by every list page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Rows per page when the request does not say otherwise
    #[serde(default = "default_page_length")]
    pub page_length: usize,
    /// Choices offered by the page-length selector
    #[serde(default = "default_page_length_options")]
    pub page_length_options: Vec<usize>,
    /// Pages shown on each side of the current page
    #[serde(default = "default_window_delta")]
    pub window_delta: usize,
    /// Maximum autocomplete suggestions
    #[serde(default = "default_suggest_limit")]
    pub suggest_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_length: default_page_length(),
            page_length_options: default_page_length_options(),
            window_delta: default_window_delta(),
            suggest_limit: default_suggest_limit(),
        }
    }
}

fn default_page_length() -> usize {
    10
}

fn default_page_length_options() -> Vec<usize> {
    vec![10, 25, 50, 100]
}

fn default_window_delta() -> usize {
    2
}

fn default_suggest_limit() -> usize {
    8
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Thousands separator
    #[serde(default = "default_thousands_sep")]
    pub thousands_separator: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            decimal_places: default_decimal_places(),
            thousands_separator: default_thousands_sep(),
        }
    }
}

fn default_decimal_places() -> u32 {
    2
}

fn default_thousands_sep() -> String {
    ",".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Data directory settings
    #[serde(default)]
    pub data: DataConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.pagination.page_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.page_length".to_string(),
                reason: "Page length must be at least 1".to_string(),
            });
        }

        if self.pagination.page_length_options.iter().any(|&n| n == 0) {
            return Err(ConfigError::InvalidValue {
                field: "pagination.page_length_options".to_string(),
                reason: "Every page length option must be at least 1".to_string(),
            });
        }

        if self.pagination.window_delta > 10 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.window_delta".to_string(),
                reason: "Window delta must be between 0 and 10".to_string(),
            });
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Page length options with the configured default always present, sorted
    pub fn page_length_choices(&self) -> Vec<usize> {
        let mut choices = self.pagination.page_length_options.clone();
        if !choices.contains(&self.pagination.page_length) {
            choices.push(self.pagination.page_length);
        }
        choices.sort_unstable();
        choices.dedup();
        choices
    }
}

// ==================== Tests ====================
