use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Context, Result};
use thiserror::Error;
use toml::Value;
use log::{debug, info};
use crate::notifications::FeedConfig;

/// Configuration storage - section_name -> key -> value
pub type Configuration = HashMap<String, HashMap<String, String>>;

/// Configuration manager
pub struct ConfigManager {
    config: Configuration,
    config_file_path: Option<PathBuf>,
    selected_section: Option<String>,
}

impl ConfigManager {
    /// Create a new ConfigManager from a Configuration (primarily for testing)
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config,
            config_file_path: None,
            selected_section: None,
        }
    }

    /// Load configuration using discovery hierarchy
    pub fn load() -> Result<Self> {
        debug!("Starting configuration discovery");

        for path in discover_config_files() {
            debug!("Attempting to load config from: {}", path.display());
            if path.exists() {
                info!("Loading configuration from: {}", path.display());
                return Self::load_from_file(path);
            }
        }

        info!("No configuration file found, using empty configuration");
        Ok(Self::from_config(Configuration::new()))
    }

    /// Load configuration from explicit file path
    pub fn load_from_file(path: PathBuf) -> Result<Self> {
        debug!("Loading configuration from file: {}", path.display());

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = parse_toml_config(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!("Successfully loaded configuration from: {}", path.display());
        Ok(Self {
            config,
            config_file_path: Some(path),
            selected_section: None,
        })
    }

    /// Path of the loaded file, if any
    pub fn config_file_path(&self) -> Option<&PathBuf> {
        self.config_file_path.as_ref()
    }

    /// Get value from configuration with section fallback
    pub fn get_value(&self, section: &str, key: &str) -> Option<&String> {
        // Priority: selected_section -> specified section -> base
        if let Some(selected) = &self.selected_section {
            if let Some(value) = self.config.get(selected).and_then(|s| s.get(key)) {
                return Some(value);
            }
        }

        if let Some(value) = self.config.get(section).and_then(|s| s.get(key)) {
            return Some(value);
        }

        self.config.get("base").and_then(|s| s.get(key))
    }

    /// Select configuration section for --config-name
    pub fn select_section(&mut self, section: String) {
        debug!("Selecting configuration section: {}", section);
        self.selected_section = Some(section);
    }

    /// Get boolean value with type conversion
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>> {
        match self.get_value(section, key) {
            Some(value) => match value.to_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(anyhow::anyhow!("Invalid boolean value for {}.{}: {}", section, key, value)),
            },
            None => Ok(None),
        }
    }

    /// Get log level value with type conversion
    pub fn get_log_level(&self, section: &str, key: &str) -> Result<Option<log::LevelFilter>> {
        match self.get_value(section, key) {
            Some(value) => Ok(Some(crate::logging::parse_log_level(value)?)),
            None => Ok(None),
        }
    }

    /// Get path value with type conversion
    pub fn get_path(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.get_value(section, key).map(PathBuf::from)
    }

    /// Get feed configuration from the `[feed]` and `[generator]` sections
    pub fn get_feed_config(&self) -> Result<FeedConfig> {
        let mut config = FeedConfig::default();

        if let Some(retention_str) = self.get_value("feed", "retention") {
            config.retention_cap = retention_str.parse::<usize>()
                .with_context(|| format!("Invalid retention value in config: {}", retention_str))?;
        }

        if let Some(seed) = self.get_bool("feed", "seed")? {
            config.seed_sample_data = seed;
        }

        if let Some(enabled) = self.get_bool("generator", "enabled")? {
            config.generator.enabled = enabled;
        }

        if let Some(interval_str) = self.get_value("generator", "interval") {
            config.generator.interval = parse_interval(interval_str)
                .with_context(|| format!("Invalid interval value in config: {}", interval_str))?;
        }

        if let Some(probability_str) = self.get_value("generator", "probability") {
            config.generator.probability = probability_str.parse::<f64>()
                .with_context(|| format!("Invalid probability value in config: {}", probability_str))?;
        }

        config.validate()
            .with_context(|| "Feed configuration validation failed")?;

        Ok(config)
    }
}

/// Errors from parsing configuration values
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid interval format: {0}. Expected format like '30s', '500ms', '2m'")]
    InvalidIntervalFormat(String),

    #[error("Invalid interval unit: {0}. Supported units: ms, s, m, h")]
    InvalidIntervalUnit(String),

    #[error("Interval out of range: {0}")]
    IntervalOutOfRange(String),
}

/// Parse an interval such as `30s`, `500ms`, `2m` or `1h`; bare numbers are seconds
pub fn parse_interval(input: &str) -> std::result::Result<Duration, ConfigError> {
    let input = input.trim().to_lowercase();
    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(split);

    if number.is_empty() {
        return Err(ConfigError::InvalidIntervalFormat(input.clone()));
    }
    let value = number.parse::<u64>()
        .map_err(|_| ConfigError::IntervalOutOfRange(input.clone()))?;

    let seconds = |multiplier: u64| {
        value
            .checked_mul(multiplier)
            .map(Duration::from_secs)
            .ok_or_else(|| ConfigError::IntervalOutOfRange(input.clone()))
    };

    match unit.trim() {
        "ms" => Ok(Duration::from_millis(value)),
        "" | "s" | "sec" | "secs" => seconds(1),
        "m" | "min" | "mins" => seconds(60),
        "h" => seconds(3600),
        other => Err(ConfigError::InvalidIntervalUnit(other.to_string())),
    }
}

/// Discover configuration files in order of precedence
fn discover_config_files() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. Environment variable $SUPPLYFEED_CONFIG
    if let Ok(env_path) = env::var("SUPPLYFEED_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    // 2. XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("supplyfeed").join("config.toml"));
    }

    // 3. Home directory
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".supplyfeed.toml"));
    }

    // 4. Project local
    paths.push(PathBuf::from("./.supplyfeed.toml"));

    debug!("Config discovery paths: {:?}", paths);
    paths
}

/// Parse TOML content to string-based configuration
fn parse_toml_config(content: &str) -> Result<Configuration> {
    let toml_value: Value = content.parse()
        .context("Failed to parse TOML content")?;

    let mut config = Configuration::new();

    if let Value::Table(table) = toml_value {
        flatten_toml_table(&table, String::new(), &mut config);
    }

    debug!("Parsed configuration: {:?}", config);
    Ok(config)
}

/// Recursively flatten TOML tables into section.subsection format
fn flatten_toml_table(table: &toml::Table, prefix: String, config: &mut Configuration) {
    for (key, value) in table {
        let section_name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Table(subtable) => {
                if subtable.values().all(|v| !matches!(v, Value::Table(_))) {
                    // Leaf table: a configuration section
                    // Top-level keys may already have created [base]
                    config
                        .entry(section_name)
                        .or_default()
                        .extend(subtable.iter().map(|(subkey, subvalue)| (subkey.clone(), toml_value_to_string(subvalue))));
                } else {
                    flatten_toml_table(subtable, section_name, config);
                }
            }
            _ => {
                // Top-level key outside any table goes into [base]
                config
                    .entry("base".to_string())
                    .or_default()
                    .insert(key.clone(), toml_value_to_string(value));
            }
        }
    }
}

/// Convert TOML Value to string representation
fn toml_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Array(_) | Value::Table(_) | Value::Datetime(_) => value.to_string(),
    }
}
