//! Training examples: one feature vector and one follow-up label per event.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::layout::FEATURE_COUNT;
use super::vector::FeatureVector;
use crate::logic::catalog::SeismicEvent;

/// Follow-up window used for labelling
pub const FOLLOW_UP_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub features: FeatureVector,
    /// 1 when a qualifying follow-up event exists, else 0
    pub label: u8,
}

/// Label every event in list order.
///
/// Event `i` is labelled 1 when some event at index `j < i` happened strictly
/// after it and strictly less than 30 days later. Only earlier *positions* are
/// scanned, never later ones, so the result depends on the input ordering.
/// With the catalog's newest-first ordering this reads as "was followed up".
pub fn follow_up_labels(events: &[SeismicEvent]) -> Vec<u8> {
    let window = Duration::days(FOLLOW_UP_WINDOW_DAYS);

    events
        .iter()
        .enumerate()
        .map(|(i, event)| {
            let deadline = event.time + window;
            let followed = events[..i]
                .iter()
                .any(|earlier| earlier.time > event.time && earlier.time < deadline);
            u8::from(followed)
        })
        .collect()
}

/// Build one example per event, in input order
pub fn build_examples(events: &[SeismicEvent]) -> Vec<TrainingExample> {
    events
        .iter()
        .map(FeatureVector::from_event)
        .zip(follow_up_labels(events))
        .map(|(features, label)| TrainingExample { features, label })
        .collect()
}

/// Row-major `N x FEATURE_COUNT` matrix for tensor construction
pub fn feature_matrix(examples: &[TrainingExample]) -> Vec<f32> {
    let mut data = Vec::with_capacity(examples.len() * FEATURE_COUNT);
    for example in examples {
        data.extend_from_slice(example.features.as_slice());
    }
    data
}

/// `N x 1` label column
pub fn label_column(examples: &[TrainingExample]) -> Vec<f32> {
    examples.iter().map(|e| f32::from(e.label)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at_day(id: &str, day: i64) -> SeismicEvent {
        SeismicEvent {
            id: id.to_string(),
            magnitude: 3.0,
            place: String::new(),
            time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(day),
            latitude: 36.0,
            longitude: -120.0,
            depth: 10.0,
        }
    }

    #[test]
    fn test_single_event_has_no_follow_up() {
        assert_eq!(follow_up_labels(&[at_day("a", 0)]), vec![0]);
    }

    #[test]
    fn test_empty_input() {
        assert!(follow_up_labels(&[]).is_empty());
        assert!(build_examples(&[]).is_empty());
    }

    #[test]
    fn test_window_bounds_are_strict() {
        // Same instant is not "after"; exactly +30 days is not "within"
        let events = [at_day("same", 0), at_day("edge", 30), at_day("base", 0)];
        assert_eq!(follow_up_labels(&events)[2], 0);

        let events = [at_day("inside", 29), at_day("base", 0)];
        assert_eq!(follow_up_labels(&events), vec![0, 1]);
    }

    #[test]
    fn test_matrix_shapes() {
        let events = [at_day("b", 5), at_day("a", 0)];
        let examples = build_examples(&events);

        assert_eq!(feature_matrix(&examples).len(), 2 * FEATURE_COUNT);
        assert_eq!(label_column(&examples), vec![0.0, 1.0]);
    }
}
