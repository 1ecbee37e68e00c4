use crate::{error::{ensure_len, Result}, math::matrix::Matrix, network::network::Network};

/// Plain stochastic gradient descent with a multiplicative learning-rate decay.
#[derive(Debug, Clone, PartialEq)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one update to every layer of `network`:
    /// `weights -= lr · gradients[i]` and `biases[j] -= lr · deltas[i][j]`.
    ///
    /// `deltas` and `gradients` are in forward layer order, as returned by
    /// `Network::backward`.
    pub fn step(&self, network: &mut Network, deltas: &[Vec<f64>], gradients: &[Matrix]) -> Result<()> {
        let layers = network.layers_mut();
        ensure_len("Sgd::step deltas", layers.len(), deltas.len())?;
        ensure_len("Sgd::step gradients", layers.len(), gradients.len())?;
        for ((layer, layer_deltas), layer_grads) in layers.iter_mut().zip(deltas).zip(gradients) {
            layer.apply_gradients(layer_grads, layer_deltas, self.learning_rate)?;
        }
        Ok(())
    }

    /// `learning_rate *= factor`.
    pub fn decay(&mut self, factor: f64) {
        self.learning_rate *= factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{activation::ActivationFunction, layers::Layer, loss::LossFunction};
    use approx::assert_abs_diff_eq;

    #[test]
    fn step_moves_every_layer_against_its_gradient() {
        let mut network = Network::new(LossFunction::MeanSquaredError);
        network.add_layer(Layer::from_parts(Matrix::zeros(2, 2), vec![0.0; 2], ActivationFunction::ReLU).unwrap()).unwrap();
        network.add_layer(Layer::from_parts(Matrix::zeros(2, 1), vec![0.0], ActivationFunction::Sigmoid).unwrap()).unwrap();

        let gradients = vec![Matrix::from_fn(2, 2, |i, j| (i + j) as f64), Matrix::from_fn(2, 1, |_, _| -1.0)];
        let deltas = vec![vec![1.0, 2.0], vec![4.0]];
        Sgd::new(0.5).step(&mut network, &deltas, &gradients).unwrap();

        let first = &network.layers()[0];
        assert_eq!(first.weights().data, vec![vec![0.0, -0.5], vec![-0.5, -1.0]]);
        assert_eq!(first.biases(), &[-0.5, -1.0]);
        let second = &network.layers()[1];
        assert_eq!(second.weights().data, vec![vec![0.5], vec![0.5]]);
        assert_eq!(second.biases(), &[-2.0]);
    }

    #[test]
    fn step_rejects_missing_layers() {
        let mut network = Network::new(LossFunction::MeanSquaredError);
        network.add_layer(Layer::from_parts(Matrix::zeros(1, 1), vec![0.0], ActivationFunction::ReLU).unwrap()).unwrap();
        assert!(Sgd::new(0.1).step(&mut network, &[], &[]).is_err());
    }

    #[test]
    fn decay_is_multiplicative() {
        let mut sgd = Sgd::new(0.2);
        sgd.decay(0.5);
        sgd.decay(0.5);
        assert_abs_diff_eq!(sgd.learning_rate, 0.05, epsilon = 1e-15);
    }
}
