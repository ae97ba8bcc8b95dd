//! Feed Configuration
//!
//! Static parameters of a notification store and its synthetic generator.
//! Values normally come from the `[feed]` and `[generator]` sections of the
//! configuration file (see [`crate::config::ConfigManager::get_feed_config`]).

use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::notifications::error::{NotificationError, NotificationResult};

/// Records kept before the oldest are evicted
pub const DEFAULT_RETENTION_CAP: usize = 50;

/// Time between synthetic generator ticks
pub const DEFAULT_GENERATOR_INTERVAL: Duration = Duration::from_secs(30);

/// Chance that a generator tick injects a notification
pub const DEFAULT_GENERATOR_PROBABILITY: f64 = 0.3;

/// Store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Maximum number of records retained (FIFO eviction beyond it)
    pub retention_cap: usize,
    /// Insert the illustrative records when the application starts
    pub seed_sample_data: bool,
    /// Synthetic event generator settings
    pub generator: GeneratorConfig,
}

/// Synthetic event generator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub enabled: bool,
    pub interval: Duration,
    pub probability: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            retention_cap: DEFAULT_RETENTION_CAP,
            seed_sample_data: true,
            generator: GeneratorConfig::default(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: DEFAULT_GENERATOR_INTERVAL,
            probability: DEFAULT_GENERATOR_PROBABILITY,
        }
    }
}

impl FeedConfig {
    pub fn with_retention_cap(mut self, cap: usize) -> Self {
        self.retention_cap = cap;
        self
    }

    pub fn with_seed_sample_data(mut self, seed: bool) -> Self {
        self.seed_sample_data = seed;
        self
    }

    pub fn with_generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> NotificationResult<()> {
        if self.retention_cap == 0 {
            return Err(NotificationError::invalid_config("retention cap must be at least 1"));
        }
        self.generator.validate()
    }
}

impl GeneratorConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    pub fn validate(&self) -> NotificationResult<()> {
        if self.interval.is_zero() {
            return Err(NotificationError::invalid_config("generator interval must be greater than zero"));
        }
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(NotificationError::invalid_config(format!(
                "generator probability must be within 0.0..=1.0, got {}",
                self.probability
            )));
        }
        Ok(())
    }
}
