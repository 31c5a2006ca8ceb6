//! Trained classifier handle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::network::Network;
use super::tensor::TensorPool;
use super::trainer::EpochReport;
use super::ModelError;
use crate::logic::features::layout::{layout_hash, validate_layout, FEATURE_VERSION};
use crate::logic::features::{FeatureVector, FEATURE_COUNT};

/// A fitted network plus what it was fitted on.
///
/// Valid for one selection; the next run builds a new one and this one is
/// dropped with its weights.
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    network: Network,
    history: Vec<EpochReport>,
    trained_on: usize,
    layout_hash: u32,
    trained_at: DateTime<Utc>,
}

/// Serializable overview for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSummary {
    pub trained_on: usize,
    pub epochs: usize,
    pub parameters: usize,
    pub final_loss: Option<f32>,
    pub final_accuracy: Option<f32>,
    pub final_val_loss: Option<f32>,
    pub final_val_accuracy: Option<f32>,
    pub layout_hash: u32,
    pub trained_at: DateTime<Utc>,
}

impl RiskClassifier {
    pub(crate) fn new(network: Network, history: Vec<EpochReport>, trained_on: usize) -> Self {
        Self {
            network,
            history,
            trained_on,
            layout_hash: layout_hash(),
            trained_at: Utc::now(),
        }
    }

    /// Probability in [0, 1] that the encoded event is followed up within the window
    pub fn predict(&self, features: &FeatureVector, pool: &TensorPool) -> Result<f32, ModelError> {
        validate_layout(features.version, features.layout_hash)?;
        validate_layout(FEATURE_VERSION, self.layout_hash)?;

        let input = pool.tensor2d(features.values.to_vec(), (1, FEATURE_COUNT))?;
        let output = self.network.forward(&input)?.flatten_all()?.to_vec1::<f32>()?;

        match output.first().copied() {
            Some(p) if p.is_finite() => Ok(p),
            _ => Err(ModelError::NonFiniteOutput),
        }
    }

    pub fn history(&self) -> &[EpochReport] {
        &self.history
    }

    pub fn trained_on(&self) -> usize {
        self.trained_on
    }

    pub fn summary(&self) -> ClassifierSummary {
        let last = self.history.last();
        ClassifierSummary {
            trained_on: self.trained_on,
            epochs: self.history.len(),
            parameters: self.network.parameter_count(),
            final_loss: last.map(|r| r.loss),
            final_accuracy: last.map(|r| r.accuracy),
            final_val_loss: last.and_then(|r| r.val_loss),
            final_val_accuracy: last.and_then(|r| r.val_accuracy),
            layout_hash: self.layout_hash,
            trained_at: self.trained_at,
        }
    }
}
