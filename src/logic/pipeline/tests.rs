//! Pipeline scenario tests with in-memory event sources

use super::*;
use crate::logic::catalog::{CatalogError, QueryArea, RegionKey, SeismicEvent};
use crate::logic::risk::RiskLevel;
use chrono::{Duration as ChronoDuration, TimeZone};
use parking_lot::Mutex;
use std::time::Duration;

fn quake(i: usize, magnitude: f64) -> SeismicEvent {
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    SeismicEvent {
        id: format!("ev{}", i),
        magnitude,
        place: format!("{} km N of Somewhere", i),
        // newest first, as the catalog orders them
        time: base - ChronoDuration::days(i as i64 * 3),
        latitude: 36.0 + (i % 5) as f64 * 0.1,
        longitude: -119.0 - (i % 7) as f64 * 0.1,
        depth: 5.0 + (i % 4) as f64,
    }
}

fn quakes(n: usize) -> Vec<SeismicEvent> {
    (0..n).map(|i| quake(i, 2.5 + (i % 6) as f64 * 0.5)).collect()
}

fn config(epochs: usize) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.training.epochs = epochs;
    config.seed = Some(7);
    config
}

/// Same answer for every query, recording what was asked
#[derive(Default)]
struct StaticSource {
    events: Vec<SeismicEvent>,
    queries: Mutex<Vec<CatalogQuery>>,
}

impl StaticSource {
    fn new(events: Vec<SeismicEvent>) -> Self {
        Self { events, queries: Mutex::new(Vec::new()) }
    }
}

impl EventSource for StaticSource {
    async fn fetch(&self, query: &CatalogQuery) -> Result<Vec<SeismicEvent>, CatalogError> {
        self.queries.lock().push(query.clone());
        Ok(self.events.clone())
    }
}

struct FailingSource;

impl EventSource for FailingSource {
    async fn fetch(&self, _query: &CatalogQuery) -> Result<Vec<SeismicEvent>, CatalogError> {
        Err(CatalogError::Server(503))
    }
}

/// Per-region answers, each after its own delay
struct RegionSource {
    answers: Vec<(RegionKey, Vec<SeismicEvent>, Duration)>,
}

impl EventSource for RegionSource {
    async fn fetch(&self, query: &CatalogQuery) -> Result<Vec<SeismicEvent>, CatalogError> {
        let answer = self.answers.iter().find(|(key, _, _)| {
            query.area == QueryArea::Within(key.region().bbox)
        });

        match answer {
            Some((_, events, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Ok(events.clone())
            }
            None => Ok(Vec::new()),
        }
    }
}

#[tokio::test]
async fn test_empty_catalog_reads_low_risk() {
    let watcher = QuakeWatcher::new(StaticSource::default(), config(5));

    let outcome = watcher.run(Selection::Region(RegionKey::California), None).await;
    assert_eq!(outcome, RunOutcome::InsufficientData { events: 0 });

    let snapshot = watcher.snapshot();
    assert!(!snapshot.loading);
    assert!(snapshot.predictions.is_empty());
    assert_eq!(snapshot.risk_level, RiskLevel::Low);
    assert!(!snapshot.classifier_ready);
    assert_eq!(snapshot.classifier_status, ClassifierStatus::Unavailable);
}

#[tokio::test]
async fn test_fetch_error_behaves_like_empty() {
    let watcher = QuakeWatcher::new(FailingSource, config(5));

    let outcome = watcher.run(Selection::Region(RegionKey::Alaska), None).await;
    assert_eq!(outcome, RunOutcome::InsufficientData { events: 0 });

    let snapshot = watcher.snapshot();
    assert_eq!(snapshot.event_count, 0);
    assert_eq!(snapshot.region, "Alaska");
    assert!(snapshot.predictions.is_empty());
}

#[tokio::test]
async fn test_ten_events_skip_training() {
    let watcher = QuakeWatcher::new(StaticSource::new(quakes(10)), config(5));

    let outcome = watcher.run(Selection::Region(RegionKey::Yellowstone), None).await;
    assert_eq!(outcome, RunOutcome::InsufficientData { events: 10 });

    let snapshot = watcher.snapshot();
    assert_eq!(snapshot.event_count, 10);
    assert_eq!(snapshot.events[0].id, "ev0");
    assert!(snapshot.predictions.is_empty());
    assert!(snapshot.classifier.is_none());
    assert_eq!(watcher.pool().allocated_total(), 0);
}

#[tokio::test]
async fn test_full_run_publishes_ranked_predictions() {
    let watcher = QuakeWatcher::new(StaticSource::new(quakes(40)), config(5));

    let outcome = watcher.run(Selection::Region(RegionKey::California), None).await;
    assert_eq!(outcome, RunOutcome::Completed { events: 40, predictions: 10 });

    let snapshot = watcher.snapshot();
    assert_eq!(snapshot.predictions.len(), 10);
    assert!(snapshot
        .predictions
        .windows(2)
        .all(|w| w[0].probability >= w[1].probability));
    assert!(snapshot.predictions.iter().all(|p| p.region == "California"));
    assert_eq!(snapshot.training_progress, 100.0);
    assert_eq!(snapshot.classifier_status, ClassifierStatus::Ready);
    assert!(snapshot.classifier_ready);

    let summary = snapshot.classifier.unwrap();
    assert_eq!(summary.trained_on, 40);
    assert_eq!(summary.epochs, 5);

    assert_eq!(watcher.pool().live(), 0);
    assert_eq!(watcher.pool().live_bytes(), 0);
}

#[tokio::test]
async fn test_non_finite_events_fail_training() {
    let mut events = quakes(20);
    events[3].magnitude = f64::NAN;
    let watcher = QuakeWatcher::new(StaticSource::new(events), config(5));

    let outcome = watcher.run(Selection::Region(RegionKey::NewMadrid), None).await;
    assert!(matches!(outcome, RunOutcome::TrainingFailed { events: 20, .. }));

    let snapshot = watcher.snapshot();
    assert_eq!(snapshot.event_count, 20);
    assert!(snapshot.predictions.is_empty());
    assert!(snapshot.classifier.is_none());
    assert_eq!(snapshot.classifier_status, ClassifierStatus::Unavailable);
    assert!(snapshot.last_error.is_some());
    assert_eq!(watcher.pool().live(), 0);
}

#[tokio::test]
async fn test_slow_fetch_is_superseded() {
    let source = RegionSource {
        answers: vec![
            (RegionKey::Alaska, quakes(30), Duration::from_millis(50)),
            (RegionKey::California, Vec::new(), Duration::ZERO),
        ],
    };
    let watcher = QuakeWatcher::new(source, config(5));

    let (first, second) = tokio::join!(
        watcher.run(Selection::Region(RegionKey::Alaska), None),
        watcher.run(Selection::Region(RegionKey::California), None),
    );

    assert_eq!(first, RunOutcome::Superseded);
    assert_eq!(second, RunOutcome::InsufficientData { events: 0 });

    let snapshot = watcher.snapshot();
    assert_eq!(snapshot.generation, 2);
    assert_eq!(snapshot.region, "California");
    assert_eq!(snapshot.event_count, 0);
}

#[tokio::test]
async fn test_training_is_cancelled_by_newer_selection() {
    let source = RegionSource {
        answers: vec![(RegionKey::California, quakes(60), Duration::ZERO)],
    };
    let watcher = QuakeWatcher::new(source, config(100_000));

    let (first, second) = tokio::join!(
        watcher.run(Selection::Region(RegionKey::California), None),
        async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            watcher.run(Selection::Region(RegionKey::Alaska), None).await
        },
    );

    assert_eq!(first, RunOutcome::Superseded);
    assert_eq!(second, RunOutcome::InsufficientData { events: 0 });

    let snapshot = watcher.snapshot();
    assert_eq!(snapshot.region, "Alaska");
    assert!(snapshot.predictions.is_empty());
    assert_eq!(watcher.pool().live(), 0);
}

#[tokio::test]
async fn test_user_selection_query_shape() {
    let source = StaticSource::default();
    let watcher = QuakeWatcher::new(source, config(5));
    let here = Location::new(19.43, -99.13);

    watcher.run(Selection::UserLocation, Some(here)).await;
    assert_eq!(watcher.snapshot().region, "Mi ubicación");

    watcher.run(Selection::UserLocation, None).await;
    assert_eq!(watcher.snapshot().region, "California");

    let queries = watcher.source.queries.lock();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].area, QueryArea::Around(here));
    assert_eq!(
        queries[1].area,
        QueryArea::Within(RegionKey::California.region().bbox)
    );
    assert_eq!(queries[0].end - queries[0].start, ChronoDuration::days(365));
}

#[tokio::test]
async fn test_generation_increments_per_run() {
    let watcher = QuakeWatcher::new(StaticSource::default(), config(5));
    assert_eq!(watcher.current_generation(), 0);

    watcher.run(Selection::Region(RegionKey::Alaska), None).await;
    watcher.run(Selection::Region(RegionKey::Alaska), None).await;

    assert_eq!(watcher.current_generation(), 2);
    assert_eq!(watcher.snapshot().generation, 2);
}

#[tokio::test]
async fn test_progress_is_visible_while_training() {
    let source = RegionSource {
        answers: vec![(RegionKey::California, quakes(60), Duration::ZERO)],
    };
    let watcher = QuakeWatcher::new(source, config(100_000));

    let (first, observed) = tokio::join!(
        watcher.run(Selection::Region(RegionKey::California), None),
        async {
            let mut observed = None;
            for _ in 0..500 {
                tokio::time::sleep(Duration::from_millis(10)).await;
                let snapshot = watcher.snapshot();
                if snapshot.training_progress > 0.0 {
                    observed = Some((snapshot.training_progress, snapshot.classifier_status));
                    break;
                }
            }
            watcher.run(Selection::Region(RegionKey::Alaska), None).await;
            observed
        },
    );

    assert_eq!(first, RunOutcome::Superseded);
    let (progress, status) = observed.expect("no progress published while training");
    assert!(progress > 0.0 && progress < 100.0);
    assert_eq!(status, ClassifierStatus::Training);
    assert_eq!(watcher.snapshot().training_progress, 0.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_runs_keep_generation_in_step() {
    let watcher = Arc::new(QuakeWatcher::new(StaticSource::new(quakes(10)), config(5)));
    let rounds = 200;

    for _ in 0..rounds {
        let alaska = tokio::spawn({
            let watcher = Arc::clone(&watcher);
            async move { watcher.run(Selection::Region(RegionKey::Alaska), None).await }
        });
        let california = tokio::spawn({
            let watcher = Arc::clone(&watcher);
            async move { watcher.run(Selection::Region(RegionKey::California), None).await }
        });
        let reader = tokio::spawn({
            let watcher = Arc::clone(&watcher);
            async move {
                for _ in 0..50 {
                    {
                        let state = watcher.state.read();
                        assert_eq!(state.generation, watcher.current_generation());
                    }
                    tokio::task::yield_now().await;
                }
            }
        });

        let (alaska, california, reader) = tokio::join!(alaska, california, reader);
        reader.unwrap();
        let outcomes = [alaska.unwrap(), california.unwrap()];
        assert!(outcomes.iter().any(|o| *o != RunOutcome::Superseded));

        let snapshot = watcher.snapshot();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.generation, watcher.current_generation());
    }

    assert_eq!(watcher.current_generation(), 2 * rounds);
}
