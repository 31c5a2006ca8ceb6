//! Pipeline Module - Orchestrates one selection end to end
//!
//! fetch → feature/label build → train → sample → publish.
//!
//! Every run takes a fresh generation number. A run only writes state while
//! its generation is current, and its training loop stops at the next epoch
//! boundary once a newer selection arrives.

pub mod state;

#[cfg(test)]
mod tests;

pub use state::{ClassifierStatus, PipelineState};

use chrono::Utc;
use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::api::dashboard::DashboardSnapshot;
use crate::logic::catalog::{CatalogQuery, EventSource, Selection};
use crate::logic::config::PipelineConfig;
use crate::logic::features::{build_examples, TrainingExample};
use crate::logic::geolocation::Location;
use crate::logic::model::{fit, ModelError, RiskClassifier, TensorPool};
use crate::logic::sampler::sample_predictions;

/// Seed offsets so training and sampling draw independent streams
const TRAINING_STREAM: u64 = 0;
const SAMPLING_STREAM: u64 = 1;

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed { events: usize, predictions: usize },
    /// Too few events; training was never started
    InsufficientData { events: usize },
    /// Events kept, predictions dropped
    TrainingFailed { events: usize, error: String },
    /// A newer selection took over; nothing from this run was published
    Superseded,
}

pub struct QuakeWatcher<S> {
    source: S,
    config: PipelineConfig,
    state: Arc<RwLock<PipelineState>>,
    generation: Arc<AtomicU64>,
    pool: TensorPool,
}

impl<S: EventSource> QuakeWatcher<S> {
    pub fn new(source: S, config: PipelineConfig) -> Self {
        Self {
            source,
            config,
            state: Arc::new(RwLock::new(PipelineState::default())),
            generation: Arc::new(AtomicU64::new(0)),
            pool: TensorPool::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn pool(&self) -> &TensorPool {
        &self.pool
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot::from_state(&self.state.read())
    }

    /// Run the whole pipeline for one selection
    pub async fn run(&self, selection: Selection, user_location: Option<Location>) -> RunOutcome {
        let target = selection.resolve(user_location);
        let generation = self.begin(selection, &target.label);
        log::info!("Run {}: {:?} -> {}", generation, selection, target.label);

        // 1. Fetch
        let query = CatalogQuery::new(target.area, Utc::now(), &self.config.catalog);
        let mut events = match self.source.fetch(&query).await {
            Ok(events) => events,
            Err(e) => {
                log::warn!("Catalog fetch failed: {} - continuing with no events", e);
                Vec::new()
            }
        };
        events.truncate(self.config.catalog.limit);

        let event_count = events.len();
        let enough = event_count >= self.config.min_events;
        let examples = if enough { build_examples(&events) } else { Vec::new() };

        let stored = self.update(generation, |state| {
            state.events = events;
            state.loading = false;
            state.status = if enough { ClassifierStatus::Training } else { ClassifierStatus::Unavailable };
        });
        if !stored {
            log::info!("Run {} superseded after fetch", generation);
            return RunOutcome::Superseded;
        }

        if !enough {
            log::info!(
                "Only {} events (need {}), skipping training",
                event_count, self.config.min_events
            );
            return RunOutcome::InsufficientData { events: event_count };
        }

        // 2. Train
        let classifier = match self.train(generation, examples).await {
            Ok(classifier) => classifier,
            Err(ModelError::Cancelled { .. }) => {
                log::info!("Run {} superseded during training", generation);
                return RunOutcome::Superseded;
            }
            Err(e) => return self.fail(generation, event_count, e),
        };

        // 3. Sample & rank
        let mut rng = self.make_rng(SAMPLING_STREAM);
        let predictions = match sample_predictions(
            &classifier,
            &self.pool,
            target.center,
            &target.label,
            Utc::now(),
            &self.config.sampler,
            &mut rng,
        ) {
            Ok(predictions) => predictions,
            Err(e) => return self.fail(generation, event_count, e),
        };

        let prediction_count = predictions.len();
        let classifier = Arc::new(classifier);
        let published = self.update(generation, |state| {
            state.classifier = Some(classifier);
            state.predictions = predictions;
            state.status = ClassifierStatus::Ready;
        });
        if !published {
            log::info!("Run {} superseded before publishing", generation);
            return RunOutcome::Superseded;
        }

        log::info!("Run {} complete: {} events, {} predictions", generation, event_count, prediction_count);
        RunOutcome::Completed { events: event_count, predictions: prediction_count }
    }

    /// Fit on the blocking pool so the async loop keeps running
    async fn train(
        &self,
        generation: u64,
        examples: Vec<TrainingExample>,
    ) -> Result<RiskClassifier, ModelError> {
        let config = self.config.training.clone();
        let pool = self.pool.clone();
        let state = Arc::clone(&self.state);
        let counter = Arc::clone(&self.generation);
        let mut rng = self.make_rng(TRAINING_STREAM);

        let handle = tokio::task::spawn_blocking(move || {
            fit(&examples, &config, &pool, &mut rng, |report| {
                if counter.load(Ordering::SeqCst) != generation {
                    return ControlFlow::Break(());
                }
                let mut state = state.write();
                if state.generation == generation {
                    state.training_progress = report.progress;
                }
                ControlFlow::Continue(())
            })
        });

        handle.await.map_err(|e| ModelError::Task(e.to_string()))?
    }

    fn fail(&self, generation: u64, events: usize, error: ModelError) -> RunOutcome {
        log::error!("Run {}: no usable classifier: {}", generation, error);
        let message = error.to_string();

        let stored = self.update(generation, |state| {
            state.classifier = None;
            state.predictions.clear();
            state.status = ClassifierStatus::Unavailable;
            state.last_error = Some(message.clone());
        });

        if stored {
            RunOutcome::TrainingFailed { events, error: message }
        } else {
            RunOutcome::Superseded
        }
    }

    /// Claim the next generation and reset the state for it.
    ///
    /// The counter only moves while the state lock is held, so a reader that
    /// holds the lock always sees `state.generation` equal to the counter.
    fn begin(&self, selection: Selection, label: &str) -> u64 {
        let mut state = self.state.write();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        state.reset(generation, selection, label.to_string());
        generation
    }

    /// Apply `f` only while `generation` is still the current run
    fn update<F: FnOnce(&mut PipelineState)>(&self, generation: u64, f: F) -> bool {
        let mut state = self.state.write();
        if state.generation != generation || self.current_generation() != generation {
            return false;
        }
        f(&mut state);
        true
    }

    fn make_rng(&self, stream: u64) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
            None => StdRng::from_entropy(),
        }
    }
}
