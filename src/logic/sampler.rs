//! Candidate Sampler & Ranker
//!
//! Scores synthetic candidates drawn around a center point with the trained
//! classifier. This is forward sampling of made-up events, not a density
//! estimate over the real catalog: the ranking only says which random
//! candidates the classifier likes best.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::logic::config::SamplerConfig;
use crate::logic::features::FeatureVector;
use crate::logic::geolocation::Location;
use crate::logic::model::{ModelError, RiskClassifier, TensorPool};
use crate::logic::risk::RiskLevel;

/// One scored synthetic candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Generation order within the batch
    pub id: usize,
    pub lat: f64,
    pub lng: f64,
    pub depth: f64,
    pub magnitude: f64,
    /// 0-100
    pub probability: f32,
    pub region: String,
    pub timeframe: String,
    pub timeframe_days: u32,
    pub risk: RiskLevel,
}

/// Draw, score and rank `config.count` candidates.
///
/// All candidates share `now` for their time features. The result is sorted
/// by descending probability; ties keep generation order. An empty timeframe
/// or magnitude range is rejected before any candidate is scored.
pub fn sample_predictions<R: Rng + ?Sized>(
    classifier: &RiskClassifier,
    pool: &TensorPool,
    center: Location,
    region: &str,
    now: DateTime<Utc>,
    config: &SamplerConfig,
    rng: &mut R,
) -> Result<Vec<Prediction>, ModelError> {
    config.validate().map_err(ModelError::InvalidConfig)?;

    let mut predictions = Vec::with_capacity(config.count);

    for id in 0..config.count {
        let lat = center.lat + (rng.gen::<f64>() - 0.5) * 2.0 * config.spread_degrees;
        let lng = center.lng + (rng.gen::<f64>() - 0.5) * 2.0 * config.spread_degrees;
        let depth = rng.gen::<f64>() * config.max_depth_km;
        let magnitude = config.min_magnitude + rng.gen::<f64>() * (config.max_magnitude - config.min_magnitude);

        let features = FeatureVector::encode(magnitude, depth, lat, lng, now);
        let probability = classifier.predict(&features, pool)? * 100.0;

        let timeframe_days = rng.gen_range(config.min_timeframe_days..config.max_timeframe_days);

        predictions.push(Prediction {
            id,
            lat,
            lng,
            depth,
            magnitude,
            probability,
            region: region.to_string(),
            timeframe: format!("{} días", timeframe_days),
            timeframe_days,
            risk: RiskLevel::from_probability(probability),
        });
    }

    predictions.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    Ok(predictions)
}
