//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change the default catalog endpoint or training schedule, only edit this file.

/// Default USGS FDSN event query endpoint
pub const DEFAULT_CATALOG_URL: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";

/// Default HTTP timeout (seconds)
pub const DEFAULT_HTTP_TIMEOUT: u64 = 30;

/// Minimum magnitude requested from the catalog
pub const DEFAULT_MIN_MAGNITUDE: f64 = 2.5;

/// History window requested from the catalog (days)
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// Maximum number of events kept from one fetch
pub const DEFAULT_EVENT_LIMIT: usize = 2000;

/// Search radius around the user location (km)
pub const DEFAULT_RADIUS_KM: f64 = 1000.0;

/// Training passes over the dataset
pub const DEFAULT_EPOCHS: usize = 50;

/// Mini-batch size
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Adam learning rate
pub const DEFAULT_LEARNING_RATE: f32 = 0.001;

/// Fraction of examples held out for validation
pub const DEFAULT_VALIDATION_SPLIT: f32 = 0.2;

/// Dropout rate after the first two hidden layers
pub const DEFAULT_DROPOUT_RATE: f32 = 0.2;

/// Training is skipped below this many events
pub const MIN_TRAINING_EVENTS: usize = 11;

/// Number of synthetic candidates scored after training
pub const PREDICTION_COUNT: usize = 10;

/// Label shown for predictions around the user's own position
pub const USER_LOCATION_LABEL: &str = "Mi ubicación";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Quake Watcher";

// ============================================
// Helper functions to read from env with fallback
// ============================================

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

/// Get catalog endpoint from environment or use default
pub fn get_catalog_url() -> String {
    std::env::var("QUAKE_CATALOG_URL")
        .unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string())
}

/// Get HTTP timeout from environment or use default
pub fn get_http_timeout() -> u64 {
    env_parse("QUAKE_HTTP_TIMEOUT").unwrap_or(DEFAULT_HTTP_TIMEOUT)
}

/// Get minimum magnitude from environment or use default
pub fn get_min_magnitude() -> f64 {
    env_parse("QUAKE_MIN_MAGNITUDE").unwrap_or(DEFAULT_MIN_MAGNITUDE)
}

/// Get lookback window from environment or use default
pub fn get_lookback_days() -> i64 {
    env_parse("QUAKE_LOOKBACK_DAYS").unwrap_or(DEFAULT_LOOKBACK_DAYS)
}

/// Get event cap from environment or use default
pub fn get_event_limit() -> usize {
    env_parse("QUAKE_EVENT_LIMIT").unwrap_or(DEFAULT_EVENT_LIMIT)
}

/// Get user search radius from environment or use default
pub fn get_radius_km() -> f64 {
    env_parse("QUAKE_RADIUS_KM").unwrap_or(DEFAULT_RADIUS_KM)
}

/// Get epoch count from environment or use default
pub fn get_epochs() -> usize {
    env_parse("QUAKE_EPOCHS")
        .filter(|&n: &usize| n > 0)
        .unwrap_or(DEFAULT_EPOCHS)
}

/// Get batch size from environment or use default
pub fn get_batch_size() -> usize {
    env_parse("QUAKE_BATCH_SIZE")
        .filter(|&n: &usize| n > 0)
        .unwrap_or(DEFAULT_BATCH_SIZE)
}

/// Get learning rate from environment or use default
pub fn get_learning_rate() -> f32 {
    env_parse("QUAKE_LEARNING_RATE")
        .filter(|&lr: &f32| lr > 0.0 && lr.is_finite())
        .unwrap_or(DEFAULT_LEARNING_RATE)
}

/// Fixed RNG seed for reproducible runs (unset = entropy)
pub fn get_seed() -> Option<u64> {
    env_parse("QUAKE_SEED")
}

/// Region selected at startup ("user" or a region key)
pub fn get_region() -> String {
    std::env::var("QUAKE_REGION")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|_| "user".to_string())
}
