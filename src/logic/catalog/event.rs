//! Seismic events and the GeoJSON feed they are decoded from.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// One historical earthquake record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicEvent {
    pub id: String,
    pub magnitude: f64,
    pub place: String,
    pub time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    /// Kilometers
    pub depth: f64,
}

// ============================================================================
// GEOJSON WIRE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub id: Option<String>,
    pub properties: FeatureProperties,
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
pub struct FeatureProperties {
    pub mag: Option<f64>,
    pub place: Option<String>,
    /// Epoch milliseconds
    pub time: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    /// `[longitude, latitude, depth]`
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

impl Feature {
    /// Convert to an event, or `None` when a required field is missing
    pub fn into_event(self) -> Option<SeismicEvent> {
        let magnitude = self.properties.mag?;
        let time = Utc.timestamp_millis_opt(self.properties.time?).single()?;
        let coords = self.geometry?.coordinates;
        if coords.len() < 3 {
            return None;
        }

        Some(SeismicEvent {
            id: self.id.unwrap_or_default(),
            magnitude,
            place: self.properties.place.unwrap_or_default(),
            time,
            latitude: coords[1],
            longitude: coords[0],
            depth: coords[2],
        })
    }
}

/// Decode a feature collection, skipping malformed features and capping the result
pub fn parse_feature_collection(
    body: &str,
    limit: usize,
) -> Result<Vec<SeismicEvent>, serde_json::Error> {
    let collection: FeatureCollection = serde_json::from_str(body)?;
    let total = collection.features.len();

    let events: Vec<SeismicEvent> = collection
        .features
        .into_iter()
        .filter_map(|feature| {
            let id = feature.id.clone();
            let event = feature.into_event();
            if event.is_none() {
                log::debug!("Skipping incomplete catalog feature {:?}", id);
            }
            event
        })
        .take(limit)
        .collect();

    if events.len() < total {
        log::debug!("Catalog: kept {} of {} features", events.len(), total);
    }

    Ok(events)
}
