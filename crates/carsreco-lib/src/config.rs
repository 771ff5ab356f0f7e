//! Predictor configuration

use crate::error::{PredictError, PredictResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Number of most frequent car models kept at construction time
pub const DEFAULT_MAX_MODELS: usize = 250;

/// Maximum number of predictions returned per query
pub const DEFAULT_TOP_K: usize = 10;

/// Joint probabilities at or below this value are treated as zero
pub const DEFAULT_MIN_JOINT_PROBABILITY: f64 = 1e-7;

/// Confidence level used when a query does not set one
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

/// Decimal places kept on interval bounds
pub const DEFAULT_INTERVAL_DECIMALS: u32 = 2;

/// Largest accepted `interval_decimals`; f64 carries about 15 significant digits
pub const MAX_INTERVAL_DECIMALS: u32 = 15;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "CARSRECO";

/// Predictor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Models outside the most frequent `max_models` are discarded
    #[serde(default = "default_max_models")]
    pub max_models: usize,

    /// Result cap per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Floor on the joint probability of a reported model (exclusive)
    #[serde(default = "default_min_joint_probability")]
    pub min_joint_probability: f64,

    /// Confidence level for queries that leave it unset
    #[serde(default = "default_confidence")]
    pub default_confidence: f64,

    #[serde(default = "default_interval_decimals")]
    pub interval_decimals: u32,
}

fn default_max_models() -> usize {
    DEFAULT_MAX_MODELS
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_min_joint_probability() -> f64 {
    DEFAULT_MIN_JOINT_PROBABILITY
}

fn default_confidence() -> f64 {
    DEFAULT_CONFIDENCE
}

fn default_interval_decimals() -> u32 {
    DEFAULT_INTERVAL_DECIMALS
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            max_models: default_max_models(),
            top_k: default_top_k(),
            min_joint_probability: default_min_joint_probability(),
            default_confidence: default_confidence(),
            interval_decimals: default_interval_decimals(),
        }
    }
}

impl PredictorConfig {
    /// Load configuration from `CARSRECO_*` environment variables
    pub fn load() -> Result<Self> {
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Build a configuration from any `config` source, defaults filling the gaps
    pub fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(source)
            .build()
            .context("Failed to read predictor configuration")?;

        let config: PredictorConfig = settings
            .try_deserialize()
            .context("Failed to parse predictor configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PredictResult<()> {
        if self.max_models == 0 {
            return Err(PredictError::InvalidConfig(
                "max_models must be at least 1".to_string(),
            ));
        }
        if self.top_k == 0 {
            return Err(PredictError::InvalidConfig(
                "top_k must be at least 1".to_string(),
            ));
        }
        if !(self.min_joint_probability >= 0.0) {
            return Err(PredictError::InvalidConfig(format!(
                "min_joint_probability must be non-negative, got {}",
                self.min_joint_probability
            )));
        }
        if !(self.default_confidence > 0.0 && self.default_confidence < 1.0) {
            return Err(PredictError::InvalidConfig(format!(
                "default_confidence must lie in (0, 1), got {}",
                self.default_confidence
            )));
        }
        if self.interval_decimals > MAX_INTERVAL_DECIMALS {
            return Err(PredictError::InvalidConfig(format!(
                "interval_decimals must be at most {}, got {}",
                MAX_INTERVAL_DECIMALS, self.interval_decimals
            )));
        }
        Ok(())
    }
}
