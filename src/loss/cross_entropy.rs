/// Categorical cross-entropy, for use with a Softmax output layer.
pub struct CrossEntropyLoss;

impl CrossEntropyLoss {
    /// `L = -sum(target[i] * ln(output[i]))`.
    ///
    /// No clamping: an output of exactly 0 under a non-zero target yields
    /// `+inf`, and the non-finite value is left for the caller to notice.
    pub fn loss(target: &[f64], output: &[f64]) -> f64 {
        -target.iter().zip(output.iter())
            .map(|(t, o)| t * o.ln())
            .sum::<f64>()
    }

    /// Combined Softmax + cross-entropy gradient w.r.t. the logits:
    ///   ∂L/∂z_i = output[i] - target[i]
    pub fn derivative(target: &[f64], output: &[f64]) -> Vec<f64> {
        output.iter().zip(target.iter())
            .map(|(o, t)| o - t)
            .collect()
    }
}
