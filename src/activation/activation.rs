use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    ReLU,
    Sigmoid,
    Tanh,
    /// Vector-valued: normalises over the whole layer output rather than
    /// element by element.
    Softmax,
}

impl ActivationFunction {
    /// Applies the activation to a layer's pre-activation vector.
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        match self {
            // NaN passes through rather than being clamped to 0
            ActivationFunction::ReLU => x.iter().map(|&v| if v < 0.0 { 0.0 } else { v }).collect(),
            ActivationFunction::Sigmoid => x.iter().map(|&v| 1.0 / (1.0 + (-v).exp())).collect(),
            ActivationFunction::Tanh => x.iter().map(|&v| v.tanh()).collect(),
            ActivationFunction::Softmax => softmax(x),
        }
    }

    /// Local derivative, evaluated on the layer's **activated output** `o`.
    ///
    /// - ReLU:    `1` where `o > 0`, else `0`
    /// - Sigmoid: `o · (1 − o)`
    /// - Tanh:    `1 − o²`
    /// - Softmax: returns `o` unchanged.
    ///
    /// The Softmax case is not the real Jacobian. It is only meaningful when the
    /// output layer is paired with `LossFunction::CrossEntropy`, whose gradient
    /// `output − target` already stands in for the combined Softmax + CE
    /// derivative. Do not pair Softmax with any other loss.
    pub fn gradient(&self, output: &[f64]) -> Vec<f64> {
        match self {
            ActivationFunction::ReLU => output.iter()
                .map(|&o| if o > 0.0 { 1.0 } else { 0.0 })
                .collect(),
            ActivationFunction::Sigmoid => output.iter().map(|&o| o * (1.0 - o)).collect(),
            ActivationFunction::Tanh => output.iter().map(|&o| 1.0 - o * o).collect(),
            ActivationFunction::Softmax => output.to_vec(),
        }
    }
}

/// Numerically stable softmax: shifts by the maximum before exponentiating.
fn softmax(x: &[f64]) -> Vec<f64> {
    let max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = x.iter().map(|&v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
