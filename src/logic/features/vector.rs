//! Feature Vector - Core data structure for classifier input
//!
//! **Versioned feature vector with layout validation**
//!
//! Uses centralized layout from `layout.rs` for:
//! - Consistent feature ordering between training and candidate scoring
//! - Layout hash for compatibility checks against a trained classifier

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::layout::{
    layout_hash, validate_layout, LayoutMismatchError, FEATURE_COUNT, FEATURE_LAYOUT,
    FEATURE_VERSION,
};
use crate::logic::catalog::SeismicEvent;

/// Divisor applied to epoch milliseconds
pub const EPOCH_DIVISOR: f64 = 1e9;

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Versioned Feature Vector with layout metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    pub values: [f32; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create from raw values with current version
    pub fn from_values(values: [f32; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    /// Encode one (real or synthetic) event.
    ///
    /// Magnitude, depth and coordinates stay in raw units; only time is scaled.
    /// Month is the 0-based UTC calendar month, encoded on the unit circle so
    /// December and January are neighbours.
    pub fn encode(
        magnitude: f64,
        depth_km: f64,
        latitude: f64,
        longitude: f64,
        time: DateTime<Utc>,
    ) -> Self {
        let epoch_scaled = time.timestamp_millis() as f64 / EPOCH_DIVISOR;
        let angle = time.month0() as f64 * PI / 6.0;

        Self::from_values([
            magnitude as f32,
            depth_km as f32,
            latitude as f32,
            longitude as f32,
            epoch_scaled as f32,
            angle.sin() as f32,
            angle.cos() as f32,
        ])
    }

    pub fn from_event(event: &SeismicEvent) -> Self {
        Self::encode(event.magnitude, event.depth, event.latitude, event.longitude, event.time)
    }

    /// Get values as slice
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Validate that this vector is compatible with current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "named_values": FEATURE_LAYOUT.iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

impl From<&SeismicEvent> for FeatureVector {
    fn from(event: &SeismicEvent) -> Self {
        Self::from_event(event)
    }
}

// ============================================================================
// TESTS
// ============================================================================
