use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::math::matrix::Matrix;

/// Weight initialisation schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Initializer {
    /// Every entry drawn from N(0, 1).
    RandomNormal,
    /// N(0, 1) scaled by `sqrt(2 / in_dim)`.
    ///
    /// Recommended before ReLU layers. The variance 2/fan_in accounts for
    /// the fact that ReLU zeroes half of its inputs on average.
    HeNormal,
}

impl Initializer {
    /// Samples a fresh `[in_dim, out_dim]` weight matrix from `rng`.
    pub fn apply<R: Rng + ?Sized>(&self, in_dim: usize, out_dim: usize, rng: &mut R) -> Matrix {
        let weights = Matrix::standard_normal(in_dim, out_dim, rng);
        match self {
            Initializer::RandomNormal => weights,
            Initializer::HeNormal => {
                let std_dev = (2.0 / in_dim as f64).sqrt();
                weights.map(|x| x * std_dev)
            }
        }
    }
}
