//! Pipeline configuration, resolved from the environment with fallbacks in `constants`.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Event catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub min_magnitude: f64,
    pub lookback_days: i64,
    pub limit: usize,
    pub radius_km: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: constants::get_catalog_url(),
            timeout_seconds: constants::get_http_timeout(),
            min_magnitude: constants::get_min_magnitude(),
            lookback_days: constants::get_lookback_days(),
            limit: constants::get_event_limit(),
            radius_km: constants::get_radius_km(),
        }
    }
}

/// Classifier training settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f32,
    /// Trailing fraction of examples held out each epoch
    pub validation_split: f32,
    pub dropout_rate: f32,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: constants::get_epochs(),
            batch_size: constants::get_batch_size(),
            learning_rate: constants::get_learning_rate(),
            validation_split: constants::DEFAULT_VALIDATION_SPLIT,
            dropout_rate: constants::DEFAULT_DROPOUT_RATE,
        }
    }
}

impl TrainingConfig {
    /// Reject settings the training loop cannot run with
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..1.0).contains(&self.validation_split) {
            return Err(format!("validation_split {} outside [0, 1)", self.validation_split));
        }
        if !(0.0..1.0).contains(&self.dropout_rate) {
            return Err(format!("dropout_rate {} outside [0, 1)", self.dropout_rate));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(format!("learning_rate {} must be positive", self.learning_rate));
        }
        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Synthetic candidate settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    pub count: usize,
    /// Half-width of the sampling square around the center (degrees)
    pub spread_degrees: f64,
    pub max_depth_km: f64,
    pub min_magnitude: f64,
    pub max_magnitude: f64,
    pub min_timeframe_days: u32,
    pub max_timeframe_days: u32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            count: constants::PREDICTION_COUNT,
            spread_degrees: 1.0,
            max_depth_km: 30.0,
            min_magnitude: 3.0,
            max_magnitude: 6.0,
            min_timeframe_days: 7,
            max_timeframe_days: 30,
        }
    }
}

impl SamplerConfig {
    /// Reject empty or inverted sampling ranges
    pub fn validate(&self) -> Result<(), String> {
        if self.min_timeframe_days >= self.max_timeframe_days {
            return Err(format!(
                "timeframe range [{}, {}) is empty",
                self.min_timeframe_days, self.max_timeframe_days
            ));
        }
        if !(self.min_magnitude.is_finite()
            && self.max_magnitude.is_finite()
            && self.min_magnitude <= self.max_magnitude)
        {
            return Err(format!(
                "magnitude range [{}, {}) is invalid",
                self.min_magnitude, self.max_magnitude
            ));
        }
        if !(self.spread_degrees.is_finite() && self.spread_degrees >= 0.0) {
            return Err(format!("spread_degrees {} must be >= 0", self.spread_degrees));
        }
        if !(self.max_depth_km.is_finite() && self.max_depth_km >= 0.0) {
            return Err(format!("max_depth_km {} must be >= 0", self.max_depth_km));
        }
        Ok(())
    }
}

/// Everything one pipeline run needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub catalog: CatalogConfig,
    pub training: TrainingConfig,
    pub sampler: SamplerConfig,
    /// Training is skipped when fewer events arrive
    pub min_events: usize,
    /// Fixed RNG seed; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            training: TrainingConfig::default(),
            sampler: SamplerConfig::default(),
            min_events: constants::MIN_TRAINING_EVENTS,
            seed: constants::get_seed(),
        }
    }
}
