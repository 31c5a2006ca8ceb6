//! Pipeline state container.
//!
//! Reset on every new selection, then filled stage by stage:
//! fetch → training → sampling. Only the run owning `generation` writes it.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::logic::catalog::{SeismicEvent, Selection};
use crate::logic::model::RiskClassifier;
use crate::logic::sampler::Prediction;

/// Tri-state "is there a usable classifier" flag, plus the in-between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierStatus {
    #[default]
    Idle,
    Training,
    Ready,
    Unavailable,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    pub generation: u64,
    pub selection: Selection,
    pub region_label: String,
    pub loading: bool,
    pub events: Vec<SeismicEvent>,
    pub classifier: Option<Arc<RiskClassifier>>,
    pub predictions: Vec<Prediction>,
    /// 0-100
    pub training_progress: f32,
    pub status: ClassifierStatus,
    pub last_error: Option<String>,
}

impl PipelineState {
    /// Start over for a new selection; the previous classifier is dropped here
    pub fn reset(&mut self, generation: u64, selection: Selection, region_label: String) {
        *self = Self {
            generation,
            selection,
            region_label,
            loading: true,
            ..Self::default()
        };
    }

    pub fn is_ready(&self) -> bool {
        self.status == ClassifierStatus::Ready && self.classifier.is_some()
    }
}
