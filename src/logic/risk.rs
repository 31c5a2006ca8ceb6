//! Risk banding for predictions and for the region as a whole.

use serde::{Deserialize, Serialize};

use crate::logic::sampler::Prediction;

/// Probability (0-100) above which risk is high
pub const HIGH_RISK_ABOVE: f32 = 60.0;
/// Probability (0-100) above which risk is medium
pub const MEDIUM_RISK_ABOVE: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Band a 0-100 probability
    pub fn from_probability(probability: f32) -> Self {
        if probability > HIGH_RISK_ABOVE {
            Self::High
        } else if probability > MEDIUM_RISK_ABOVE {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Band the mean probability; no predictions reads as low risk
    pub fn overall(predictions: &[Prediction]) -> Self {
        if predictions.is_empty() {
            return Self::Low;
        }
        let mean = predictions.iter().map(|p| p.probability).sum::<f32>() / predictions.len() as f32;
        Self::from_probability(mean)
    }
}
