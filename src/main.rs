//! Quake Watcher - Main Entry Point
//!
//! Runs the pipeline once for the configured selection and prints the
//! dashboard snapshot as JSON.

use quake_watcher::constants::{self, APP_NAME, APP_VERSION};
use quake_watcher::logic::catalog::{CatalogClient, Selection};
use quake_watcher::logic::config::PipelineConfig;
use quake_watcher::logic::geolocation::{EnvLocation, LocationProvider};
use quake_watcher::logic::pipeline::{QuakeWatcher, RunOutcome};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    log::info!("Starting {} v{}...", APP_NAME, APP_VERSION);

    let selection = match constants::get_region().parse::<Selection>() {
        Ok(selection) => selection,
        Err(e) => {
            log::warn!("{} - using the user location", e);
            Selection::UserLocation
        }
    };
    let location = EnvLocation.current_location();
    if location.is_none() && selection == Selection::UserLocation {
        log::info!("No user location available");
    }

    let config = PipelineConfig::default();
    let client = match CatalogClient::new(config.catalog.clone()) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to build catalog client: {}", e);
            std::process::exit(1);
        }
    };

    let watcher = QuakeWatcher::new(client, config);
    match watcher.run(selection, location).await {
        RunOutcome::Completed { events, predictions } => {
            log::info!("Ranked {} candidates from {} events", predictions, events);
        }
        RunOutcome::InsufficientData { events } => {
            log::warn!("Not enough events to train ({})", events);
        }
        RunOutcome::TrainingFailed { error, .. } => {
            log::error!("Training failed: {}", error);
        }
        RunOutcome::Superseded => {}
    }

    match serde_json::to_string_pretty(&watcher.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}
