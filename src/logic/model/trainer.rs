//! Training loop: mini-batch Adam on binary cross-entropy with a trailing
//! validation split, reporting after every epoch.

use candle_core::{Device, Tensor};
use candle_nn::{AdamW, Optimizer, ParamsAdamW};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use std::time::Instant;

use super::classifier::RiskClassifier;
use super::network::Network;
use super::tensor::TensorPool;
use super::ModelError;
use crate::logic::config::TrainingConfig;
use crate::logic::features::{feature_matrix, label_column, TrainingExample, FEATURE_COUNT};

/// Probabilities are clipped to [EPS, 1 - EPS] before taking logs
const LOSS_EPSILON: f32 = 1e-7;

const ADAM_BETA1: f64 = 0.9;
const ADAM_BETA2: f64 = 0.999;
const ADAM_EPSILON: f64 = 1e-7;

/// Metrics for one completed pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochReport {
    /// 0-based
    pub epoch: usize,
    pub epochs: usize,
    pub loss: f32,
    pub accuracy: f32,
    pub val_loss: Option<f32>,
    pub val_accuracy: Option<f32>,
    /// (epoch + 1) / epochs * 100
    pub progress: f32,
}

/// Mean binary cross-entropy of `[rows, 1]` probabilities against 0/1 targets
pub fn binary_cross_entropy(probabilities: &Tensor, targets: &Tensor) -> candle_core::Result<Tensor> {
    let p = probabilities.clamp(LOSS_EPSILON, 1.0 - LOSS_EPSILON)?;
    let positive = targets.mul(&p.log()?)?;
    let negative = targets.affine(-1.0, 1.0)?.mul(&p.affine(-1.0, 1.0)?.log()?)?;
    positive.add(&negative)?.neg()?.mean_all()
}

/// Share of predictions on the right side of 0.5
pub fn accuracy(probabilities: &[f32], targets: &[f32]) -> f32 {
    if probabilities.is_empty() {
        return 0.0;
    }
    let correct = probabilities
        .iter()
        .zip(targets)
        .filter(|&(&p, &y)| (p >= 0.5) == (y >= 0.5))
        .count();
    correct as f32 / probabilities.len() as f32
}

fn column(t: &Tensor) -> candle_core::Result<Vec<f32>> {
    t.flatten_all()?.to_vec1::<f32>()
}

/// Fit a fresh network.
///
/// The input and label tensors live only inside this call. `on_epoch` sees
/// every report and may return `Break` to abandon the run, in which case
/// nothing is returned but the error.
pub fn fit<R, F>(
    examples: &[TrainingExample],
    config: &TrainingConfig,
    pool: &TensorPool,
    rng: &mut R,
    mut on_epoch: F,
) -> Result<RiskClassifier, ModelError>
where
    R: Rng + ?Sized,
    F: FnMut(&EpochReport) -> ControlFlow<()>,
{
    config.validate().map_err(ModelError::InvalidConfig)?;

    let n = examples.len();
    let split_at = (n as f32 * (1.0 - config.validation_split)).floor() as usize;
    if n == 0 || split_at == 0 {
        return Err(ModelError::EmptyTrainingSet {
            examples: n,
            validation_split: config.validation_split,
        });
    }
    for example in examples {
        example.features.validate()?;
    }
    if let Some(row) = examples
        .iter()
        .position(|e| e.features.values.iter().any(|v| !v.is_finite()))
    {
        return Err(ModelError::NonFiniteInput { row });
    }
    log::debug!("First training row: {}", examples[0].features.to_log_entry());

    let xs = pool.tensor2d(feature_matrix(examples), (n, FEATURE_COUNT))?;
    let ys = pool.tensor2d(label_column(examples), (n, 1))?;
    let validation = if split_at < n {
        let rows = n - split_at;
        let val_y = ys.narrow(0, split_at, rows)?;
        Some((xs.narrow(0, split_at, rows)?, column(&val_y)?, val_y))
    } else {
        None
    };

    let network = Network::new(config.dropout_rate, rng)?;
    let params = ParamsAdamW {
        lr: f64::from(config.learning_rate),
        beta1: ADAM_BETA1,
        beta2: ADAM_BETA2,
        eps: ADAM_EPSILON,
        weight_decay: 0.0,
    };
    let mut optimizer = AdamW::new(network.vars(), params)?;

    let mut order: Vec<u32> = (0..split_at as u32).collect();
    let mut history = Vec::with_capacity(config.epochs);
    let mut steps = 0usize;
    let started = Instant::now();

    log::info!(
        "Training classifier: {} examples ({} train / {} validation), {} epochs, batch {}",
        n, split_at, n - split_at, config.epochs, config.batch_size
    );

    for epoch in 0..config.epochs {
        order.shuffle(rng);

        let mut loss_sum = 0.0f32;
        let mut correct_sum = 0.0f32;

        for batch in order.chunks(config.batch_size) {
            let index = Tensor::from_slice(batch, batch.len(), &Device::Cpu)?;
            let bx = xs.index_select(&index, 0)?;
            let by = ys.index_select(&index, 0)?;

            let probabilities = network.forward_train(&bx, rng)?;
            let loss = binary_cross_entropy(&probabilities, &by)?;
            optimizer.backward_step(&loss)?;
            steps += 1;

            let rows = batch.len() as f32;
            loss_sum += loss.to_scalar::<f32>()? * rows;
            correct_sum += accuracy(&column(&probabilities)?, &column(&by)?) * rows;
        }

        let loss = loss_sum / split_at as f32;
        if !loss.is_finite() {
            log::warn!("Training diverged at epoch {} (loss {})", epoch, loss);
            return Err(ModelError::Diverged { epoch, loss });
        }

        let (val_loss, val_accuracy) = match &validation {
            Some((val_x, val_targets, val_y)) => {
                let probabilities = network.forward(val_x)?;
                let l = binary_cross_entropy(&probabilities, val_y)?.to_scalar::<f32>()?;
                (Some(l), Some(accuracy(&column(&probabilities)?, val_targets)))
            }
            None => (None, None),
        };

        let report = EpochReport {
            epoch,
            epochs: config.epochs,
            loss,
            accuracy: correct_sum / split_at as f32,
            val_loss,
            val_accuracy,
            progress: (epoch + 1) as f32 / config.epochs as f32 * 100.0,
        };
        log::debug!(
            "epoch {}/{}: loss {:.4} acc {:.3} val_loss {:?}",
            epoch + 1, config.epochs, report.loss, report.accuracy, report.val_loss
        );

        let flow = on_epoch(&report);
        history.push(report);
        if flow.is_break() {
            log::info!("Training cancelled after epoch {}", epoch + 1);
            return Err(ModelError::Cancelled { epoch });
        }
    }

    log::info!(
        "Training finished in {} ms ({} optimizer steps)",
        started.elapsed().as_millis(),
        steps
    );

    Ok(RiskClassifier::new(network, history, n))
}
