//! Dashboard Snapshot - what the presentation layer reads
//!
//! Flat, serializable copy of the pipeline state plus derived fields
//! (overall risk, readiness, layout info).

use serde::{Deserialize, Serialize};

use crate::constants::{APP_NAME, APP_VERSION};
use crate::logic::catalog::{SeismicEvent, Selection};
use crate::logic::features::LayoutInfo;
use crate::logic::model::ClassifierSummary;
use crate::logic::pipeline::{ClassifierStatus, PipelineState};
use crate::logic::risk::RiskLevel;
use crate::logic::sampler::Prediction;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub app: String,
    pub version: String,
    pub generation: u64,
    pub selection: Selection,
    pub region: String,
    pub loading: bool,
    pub event_count: usize,
    pub events: Vec<SeismicEvent>,
    /// Ranked, highest probability first
    pub predictions: Vec<Prediction>,
    /// 0-100
    pub training_progress: f32,
    pub classifier_status: ClassifierStatus,
    pub classifier_ready: bool,
    pub classifier: Option<ClassifierSummary>,
    pub risk_level: RiskLevel,
    pub feature_layout: LayoutInfo,
    pub last_error: Option<String>,
}

impl DashboardSnapshot {
    pub fn from_state(state: &PipelineState) -> Self {
        Self {
            app: APP_NAME.to_string(),
            version: APP_VERSION.to_string(),
            generation: state.generation,
            selection: state.selection,
            region: state.region_label.clone(),
            loading: state.loading,
            event_count: state.events.len(),
            events: state.events.clone(),
            predictions: state.predictions.clone(),
            training_progress: state.training_progress,
            classifier_status: state.status,
            classifier_ready: state.is_ready(),
            classifier: state.classifier.as_ref().map(|c| c.summary()),
            risk_level: RiskLevel::overall(&state.predictions),
            feature_layout: LayoutInfo::current(),
            last_error: state.last_error.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_reads_low_risk() {
        let snapshot = DashboardSnapshot::from_state(&PipelineState::default());

        assert!(snapshot.predictions.is_empty());
        assert_eq!(snapshot.risk_level, RiskLevel::Low);
        assert!(!snapshot.classifier_ready);
        assert_eq!(snapshot.classifier_status, ClassifierStatus::Idle);
        assert_eq!(snapshot.feature_layout.feature_count, 7);
    }

    #[test]
    fn test_serializes_to_json() {
        let snapshot = DashboardSnapshot::from_state(&PipelineState::default());
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["risk_level"], "low");
        assert_eq!(json["classifier_status"], "idle");
        assert_eq!(json["selection"]["kind"], "user_location");
    }
}
