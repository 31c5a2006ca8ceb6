//! Model Module - Risk Classifier
//!
//! Feed-forward network trained from scratch on every selection.
//! Tensors are pooled and released on scope exit.

pub mod classifier;
pub mod network;
pub mod tensor;
pub mod trainer;

// Re-export common types
pub use classifier::{ClassifierSummary, RiskClassifier};
pub use tensor::{Tensor, TensorPool};
pub use trainer::{fit, EpochReport};

use crate::logic::features::layout::LayoutMismatchError;

/// Training / inference failures. None of them leave a usable classifier.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    #[error("Shape error: {0}")]
    Shape(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Not enough examples to train ({examples} with validation split {validation_split})")]
    EmptyTrainingSet { examples: usize, validation_split: f32 },
    #[error("Non-finite feature value in row {row}")]
    NonFiniteInput { row: usize },
    #[error("Training diverged at epoch {epoch} (loss {loss})")]
    Diverged { epoch: usize, loss: f32 },
    #[error("Model produced a non-finite probability")]
    NonFiniteOutput,
    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),
    #[error("Training cancelled after epoch {epoch}")]
    Cancelled { epoch: usize },
    #[error("Training task failed: {0}")]
    Task(String),
    #[error("Tensor backend error: {0}")]
    Backend(String),
}

impl From<candle_core::Error> for ModelError {
    fn from(e: candle_core::Error) -> Self {
        Self::Backend(e.to_string())
    }
}
