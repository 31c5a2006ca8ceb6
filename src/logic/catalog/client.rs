//! Event Catalog API Client
//!
//! HTTP client for the USGS FDSN event query endpoint.

use chrono::{DateTime, Duration as ChronoDuration, SecondsFormat, Utc};
use std::future::Future;
use std::time::Duration;

use super::event::{parse_feature_collection, SeismicEvent};
use super::region::QueryArea;
use crate::logic::config::CatalogConfig;

/// One catalog request
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogQuery {
    pub area: QueryArea,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub min_magnitude: f64,
    pub radius_km: f64,
    pub limit: usize,
}

impl CatalogQuery {
    /// Query covering the configured lookback window ending at `now`
    pub fn new(area: QueryArea, now: DateTime<Utc>, config: &CatalogConfig) -> Self {
        Self {
            area,
            start: now - ChronoDuration::days(config.lookback_days),
            end: now,
            min_magnitude: config.min_magnitude,
            radius_km: config.radius_km,
            limit: config.limit,
        }
    }

    /// Query-string parameters in request order
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("format", "geojson".to_string()),
            ("starttime", self.start.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ("endtime", self.end.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ("minmagnitude", self.min_magnitude.to_string()),
            ("orderby", "time".to_string()),
            ("limit", self.limit.to_string()),
        ];

        match self.area {
            QueryArea::Around(center) => {
                params.push(("latitude", center.lat.to_string()));
                params.push(("longitude", center.lng.to_string()));
                params.push(("maxradiuskm", self.radius_km.to_string()));
            }
            QueryArea::Within(bbox) => {
                params.push(("minlatitude", bbox.min_lat.to_string()));
                params.push(("minlongitude", bbox.min_lng.to_string()));
                params.push(("maxlatitude", bbox.max_lat.to_string()));
                params.push(("maxlongitude", bbox.max_lng.to_string()));
            }
        }

        params
    }
}

/// Anything that can produce the event list for a query
pub trait EventSource: Send + Sync {
    fn fetch(
        &self,
        query: &CatalogQuery,
    ) -> impl Future<Output = Result<Vec<SeismicEvent>, CatalogError>> + Send;
}

/// Catalog client errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error: {0}")]
    Server(u16),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Client error: {0}")]
    Client(String),
}

/// USGS catalog client
#[derive(Debug, Clone)]
pub struct CatalogClient {
    config: CatalogConfig,
    http_client: reqwest::Client,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(format!("quake-watcher/{}", crate::constants::APP_VERSION))
            .build()
            .map_err(|e| CatalogError::Client(e.to_string()))?;

        Ok(Self { config, http_client })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

impl EventSource for CatalogClient {
    async fn fetch(&self, query: &CatalogQuery) -> Result<Vec<SeismicEvent>, CatalogError> {
        log::info!("Fetching catalog events from {}", self.config.base_url);

        let response = self.http_client
            .get(&self.config.base_url)
            .query(&query.params())
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CatalogError::Server(response.status().as_u16()));
        }

        let body = response.text().await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let events = parse_feature_collection(&body, query.limit)
            .map_err(|e| CatalogError::Parse(e.to_string()))?;

        log::info!("Catalog returned {} events", events.len());
        Ok(events)
    }
}
