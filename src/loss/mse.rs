pub struct MseLoss;

impl MseLoss {
    /// Summed squared error: `sum((target - output)²)`.
    pub fn loss(target: &[f64], output: &[f64]) -> f64 {
        target.iter().zip(output.iter())
            .map(|(t, o)| (t - o).powi(2))
            .sum()
    }

    /// Per-output gradient: `-2 · (target - output)`
    pub fn derivative(target: &[f64], output: &[f64]) -> Vec<f64> {
        target.iter().zip(output.iter())
            .map(|(t, o)| -2.0 * (t - o))
            .collect()
    }
}
