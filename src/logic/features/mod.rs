//! Features Module - Feature/Label Builder
//!
//! Turns an ordered event list into fixed-width classifier inputs and
//! binary follow-up labels. The same encoder scores synthetic candidates.

pub mod labels;
pub mod layout;
pub mod vector;


// Re-export common types
pub use labels::{build_examples, feature_matrix, follow_up_labels, label_column, TrainingExample};
pub use layout::{layout_hash, LayoutInfo, FEATURE_COUNT};
pub use vector::FeatureVector;
