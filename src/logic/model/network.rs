//! Feed-forward network: 7 → 64 → 32 → 16 → 1.
//!
//! ReLU hidden layers, inverted dropout after the first two, sigmoid output.
//! Weights and biases are candle `Var`s, so gradients come from `loss.backward()`.

use candle_core::{DType, Device, Tensor, Var};
use rand::Rng;

use super::ModelError;
use crate::logic::features::FEATURE_COUNT;

/// Hidden layer widths
pub const HIDDEN_UNITS: [usize; 3] = [64, 32, 16];

/// Number of leading hidden layers followed by dropout
pub const DROPOUT_LAYERS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Relu,
    Sigmoid,
}

impl Activation {
    fn apply(self, z: &Tensor) -> candle_core::Result<Tensor> {
        match self {
            Self::Relu => z.relu(),
            Self::Sigmoid => sigmoid(z),
        }
    }
}

/// Logistic function built from differentiable primitives
pub fn sigmoid(z: &Tensor) -> candle_core::Result<Tensor> {
    z.neg()?.exp()?.affine(1.0, 1.0)?.recip()
}

/// Fully connected layer
#[derive(Debug, Clone)]
pub struct Dense {
    /// `[inputs, units]`
    pub weight: Var,
    /// `[units]`
    pub bias: Var,
    pub activation: Activation,
    /// Dropout rate applied to this layer's output while training
    pub dropout: Option<f32>,
}

impl Dense {
    /// Xavier-uniform weights, zero bias
    fn new<R: Rng + ?Sized>(
        inputs: usize,
        units: usize,
        activation: Activation,
        dropout: Option<f32>,
        rng: &mut R,
        device: &Device,
    ) -> Result<Self, ModelError> {
        // scale = sqrt(6 / (fan_in + fan_out))
        let limit = (6.0 / (inputs + units) as f64).sqrt() as f32;
        let data: Vec<f32> = (0..inputs * units)
            .map(|_| rng.gen_range(-limit..limit))
            .collect();

        let weight = Var::from_tensor(&Tensor::from_vec(data, (inputs, units), device)?)?;
        let bias = Var::from_tensor(&Tensor::zeros(units, DType::F32, device)?)?;

        Ok(Self { weight, bias, activation, dropout })
    }

    fn pre_activation(&self, input: &Tensor) -> candle_core::Result<Tensor> {
        input
            .matmul(self.weight.as_tensor())?
            .broadcast_add(self.bias.as_tensor())
    }
}

#[derive(Debug, Clone)]
pub struct Network {
    pub layers: Vec<Dense>,
}

impl Network {
    pub fn new<R: Rng + ?Sized>(dropout_rate: f32, rng: &mut R) -> Result<Self, ModelError> {
        let device = Device::Cpu;
        let dropout = (dropout_rate > 0.0).then_some(dropout_rate);
        let mut layers = Vec::with_capacity(HIDDEN_UNITS.len() + 1);
        let mut inputs = FEATURE_COUNT;

        for (i, &units) in HIDDEN_UNITS.iter().enumerate() {
            let layer_dropout = if i < DROPOUT_LAYERS { dropout } else { None };
            layers.push(Dense::new(inputs, units, Activation::Relu, layer_dropout, rng, &device)?);
            inputs = units;
        }
        layers.push(Dense::new(inputs, 1, Activation::Sigmoid, None, rng, &device)?);

        Ok(Self { layers })
    }

    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weight.as_tensor().elem_count() + l.bias.as_tensor().elem_count())
            .sum()
    }

    /// Trainable variables, layer by layer
    pub fn vars(&self) -> Vec<Var> {
        self.layers
            .iter()
            .flat_map(|l| [l.weight.clone(), l.bias.clone()])
            .collect()
    }

    /// Inference: dropout is the identity. Output is `[rows, 1]` probabilities.
    pub fn forward(&self, input: &Tensor) -> Result<Tensor, ModelError> {
        let mut activation = input.clone();
        for layer in &self.layers {
            activation = layer.activation.apply(&layer.pre_activation(&activation)?)?;
        }
        Ok(activation)
    }

    /// Training forward pass with inverted dropout (kept units scaled by 1/keep)
    pub fn forward_train<R: Rng + ?Sized>(
        &self,
        input: &Tensor,
        rng: &mut R,
    ) -> Result<Tensor, ModelError> {
        let mut activation = input.clone();

        for layer in &self.layers {
            let mut out = layer.activation.apply(&layer.pre_activation(&activation)?)?;

            if let Some(rate) = layer.dropout {
                let keep = 1.0 - rate;
                let (rows, cols) = out.dims2()?;
                let mask: Vec<f32> = (0..rows * cols)
                    .map(|_| if rng.gen::<f32>() < keep { 1.0 / keep } else { 0.0 })
                    .collect();
                out = out.mul(&Tensor::from_vec(mask, (rows, cols), out.device())?)?;
            }

            activation = out;
        }

        Ok(activation)
    }
}
