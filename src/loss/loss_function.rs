use serde::{Serialize, Deserialize};

use crate::error::{ensure_len, Result};
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::loss::mse::MseLoss;

/// Selects the loss a network is trained against.
///
/// - `CrossEntropy`     — categorical cross-entropy; pair with a Softmax output.
///   The gradient is the combined Softmax+CE gradient (output - target).
/// - `MeanSquaredError` — summed squared error; pair with Sigmoid, Tanh or ReLU outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossFunction {
    CrossEntropy,
    MeanSquaredError,
}

impl LossFunction {
    /// Scalar loss of `output` against `target`.
    pub fn apply(&self, target: &[f64], output: &[f64]) -> Result<f64> {
        ensure_len("LossFunction::apply", output.len(), target.len())?;
        Ok(match self {
            LossFunction::CrossEntropy => CrossEntropyLoss::loss(target, output),
            LossFunction::MeanSquaredError => MseLoss::loss(target, output),
        })
    }

    /// Gradient w.r.t. `output`; same length as `output`.
    pub fn gradient(&self, target: &[f64], output: &[f64]) -> Result<Vec<f64>> {
        ensure_len("LossFunction::gradient", output.len(), target.len())?;
        Ok(match self {
            LossFunction::CrossEntropy => CrossEntropyLoss::derivative(target, output),
            LossFunction::MeanSquaredError => MseLoss::derivative(target, output),
        })
    }
}
