use rand::Rng;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;

use crate::error::{ensure_len, Result};

/// Dense row-major matrix of `f64`.
///
/// Layer weights are stored as `[in_dim, out_dim]`, so a row vector input
/// multiplies from the left: `x · W`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a matrix by evaluating `f(row, col)` for every entry.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Matrix
    where
        F: FnMut(usize, usize) -> f64,
    {
        let data = (0..rows)
            .map(|i| (0..cols).map(|j| f(i, j)).collect())
            .collect();
        Matrix { rows, cols, data }
    }

    /// Wraps nested rows. Every row must have the same length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, Vec::len);
        for row in &data {
            ensure_len("Matrix::from_data", cols, row.len())?;
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Matrix of `rows × cols` filled with N(0, 1) samples.
    pub fn standard_normal<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        Matrix::from_fn(rows, cols, |_, _| sample_standard_normal(rng))
    }

    /// Row vector times matrix: `v · self`. `v.len()` must equal `self.rows`.
    pub fn vec_mul(&self, v: &[f64]) -> Result<Vec<f64>> {
        ensure_len("Matrix::vec_mul", self.rows, v.len())?;
        let mut out = vec![0.0; self.cols];
        for (row, &x) in self.data.iter().zip(v) {
            for (acc, &w) in out.iter_mut().zip(row) {
                *acc += x * w;
            }
        }
        Ok(out)
    }

    /// Matrix times column vector: `self · v`. `v.len()` must equal `self.cols`.
    ///
    /// Equivalent to `v · selfᵀ` without materialising the transpose.
    pub fn mul_vec(&self, v: &[f64]) -> Result<Vec<f64>> {
        ensure_len("Matrix::mul_vec", self.cols, v.len())?;
        Ok(self.data.iter()
            .map(|row| row.iter().zip(v).map(|(w, x)| w * x).sum())
            .collect())
    }

    /// Outer product `a ⊗ b`, shape `[a.len(), b.len()]`.
    pub fn outer(a: &[f64], b: &[f64]) -> Matrix {
        Matrix::from_fn(a.len(), b.len(), |i, j| a[i] * b[j])
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// In place `self -= scale * rhs`.
    pub fn sub_scaled(&mut self, rhs: &Matrix, scale: f64) -> Result<()> {
        ensure_len("Matrix::sub_scaled (rows)", self.rows, rhs.rows)?;
        ensure_len("Matrix::sub_scaled (cols)", self.cols, rhs.cols)?;
        for (row, rhs_row) in self.data.iter_mut().zip(&rhs.data) {
            for (x, &g) in row.iter_mut().zip(rhs_row) {
                *x -= scale * g;
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.data.iter().flatten()
    }
}

/// Samples a single value from N(0, 1) using the Box-Muller transform.
pub fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // Both draws in (0, 1] to avoid log(0).
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Element-wise (Hadamard) product of two equal-length vectors.
pub fn hadamard(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    ensure_len("hadamard", a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).collect())
}

/// Index of the largest element; ties resolve to the first. `0` for an empty slice.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &x)| match best {
            Some((_, b)) if b >= x || x.is_nan() => best,
            _ => Some((i, x)),
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn vec_mul_is_row_vector_times_matrix() {
        let m = Matrix::from_data(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.vec_mul(&[1.0, -1.0]).unwrap(), vec![-3.0, -3.0, -3.0]);
    }

    #[test]
    fn mul_vec_is_matrix_times_column_vector() {
        let m = Matrix::from_data(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let v = [0.5, -2.0, 1.0];
        assert_eq!(m.mul_vec(&v).unwrap(), vec![-0.5, -2.0]);
    }

    #[test]
    fn vec_mul_rejects_wrong_length() {
        let m = Matrix::zeros(2, 3);
        assert!(m.vec_mul(&[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn from_data_rejects_ragged_rows() {
        assert!(Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
    }

    #[test]
    fn outer_product_shape_and_values() {
        let m = Matrix::outer(&[1.0, 2.0], &[3.0, 4.0, 5.0]);
        assert_eq!((m.rows, m.cols), (2, 3));
        assert_eq!(m.data[1], vec![6.0, 8.0, 10.0]);
    }

    #[test]
    fn sub_scaled_updates_in_place() {
        let mut m = Matrix::from_data(vec![vec![1.0, 1.0]]).unwrap();
        let g = Matrix::from_data(vec![vec![2.0, -4.0]]).unwrap();
        m.sub_scaled(&g, 0.5).unwrap();
        assert_eq!(m.data[0], vec![0.0, 3.0]);
    }

    #[test]
    fn standard_normal_has_roughly_unit_moments() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Matrix::standard_normal(100, 100, &mut rng);
        let n = (m.rows * m.cols) as f64;
        let mean = m.iter().sum::<f64>() / n;
        let var = m.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        assert_abs_diff_eq!(mean, 0.0, epsilon = 0.05);
        assert_abs_diff_eq!(var, 1.0, epsilon = 0.1);
    }

    #[test]
    fn argmax_picks_first_maximum() {
        assert_eq!(argmax(&[0.1, 0.7, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[]), 0);
    }
}
