use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::{
    activation::activation::ActivationFunction,
    error::{ensure_len, NnError, Result},
    init::initializer::Initializer,
    math::matrix::{hadamard, Matrix},
};

/// A fully connected layer: `activation(x · weights + biases)`.
///
/// `weights` has shape `[input_size, size]` and `biases` has length `size`.
/// Only the optimizer mutates them, through `apply_gradients`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    weights: Matrix,
    biases: Vec<f64>,
    activation: ActivationFunction,
}

impl Layer {
    /// Creates a layer with `initializer`-sampled weights and zero biases.
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        size: usize,
        activation: ActivationFunction,
        initializer: Initializer,
        rng: &mut R,
    ) -> Result<Layer> {
        if input_size == 0 || size == 0 {
            return Err(NnError::InvalidConfig(format!(
                "layer dimensions must be non-zero, got {input_size}x{size}"
            )));
        }
        Ok(Layer {
            weights: initializer.apply(input_size, size, rng),
            biases: vec![0.0; size],
            activation,
        })
    }

    /// Builds a layer from explicit parameters; `biases.len()` must equal `weights.cols`.
    pub fn from_parts(weights: Matrix, biases: Vec<f64>, activation: ActivationFunction) -> Result<Layer> {
        let layer = Layer { weights, biases, activation };
        layer.validate()?;
        Ok(layer)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.weights.rows == 0 || self.weights.cols == 0 {
            return Err(NnError::InvalidConfig("layer has an empty weight matrix".into()));
        }
        ensure_len("Layer weight rows", self.weights.rows, self.weights.data.len())?;
        for row in &self.weights.data {
            ensure_len("Layer weight cols", self.weights.cols, row.len())?;
        }
        ensure_len("Layer biases", self.weights.cols, self.biases.len())
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    pub fn size(&self) -> usize {
        self.weights.cols
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    pub fn activation(&self) -> ActivationFunction {
        self.activation
    }

    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        let mut z = self.weights.vec_mul(input)?;
        for (zi, b) in z.iter_mut().zip(&self.biases) {
            *zi += b;
        }
        Ok(self.activation.apply(&z))
    }

    /// Backpropagates through this layer for a single sample.
    ///
    /// - `input`        — what this layer was fed during the forward pass
    /// - `output`       — what it produced
    /// - `next_deltas`  — for the output layer, ∂L/∂output; otherwise the
    ///                    downstream layer's deltas
    /// - `next_weights` — the downstream layer's weights, `None` for the output layer
    ///
    /// Returns `(deltas, gradients)` where `gradients = outer(input, deltas)`
    /// has the shape of `weights`.
    pub fn backward(
        &self,
        input: &[f64],
        output: &[f64],
        next_deltas: &[f64],
        next_weights: Option<&Matrix>,
    ) -> Result<(Vec<f64>, Matrix)> {
        ensure_len("Layer::backward input", self.input_size(), input.len())?;
        ensure_len("Layer::backward output", self.size(), output.len())?;

        let error = match next_weights {
            None => next_deltas.to_vec(),
            // next_deltas · next_weightsᵀ
            Some(w) => w.mul_vec(next_deltas)?,
        };
        let deltas = hadamard(&error, &self.activation.gradient(output))?;
        let gradients = Matrix::outer(input, &deltas);

        Ok((deltas, gradients))
    }

    /// `weights -= lr · weights_grad`, `biases[j] -= lr · deltas[j]`.
    pub(crate) fn apply_gradients(&mut self, weights_grad: &Matrix, deltas: &[f64], lr: f64) -> Result<()> {
        ensure_len("Layer::apply_gradients deltas", self.biases.len(), deltas.len())?;
        self.weights.sub_scaled(weights_grad, lr)?;
        for (b, d) in self.biases.iter_mut().zip(deltas) {
            *b -= lr * d;
        }
        Ok(())
    }
}
