use std::io::{Read, Write};
use std::path::Path;

use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::{
    error::{ensure_len, NnError, Result},
    layers::dense::Layer,
    loss::loss_function::LossFunction,
    math::matrix::Matrix,
};

/// A multilayer perceptron: layers evaluated in insertion order, trained
/// against a single loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    layers: Vec<Layer>,
    loss: LossFunction,
}

impl Network {
    pub fn new(loss: LossFunction) -> Network {
        Network { layers: Vec::new(), loss }
    }

    /// Appends `layer`. Its input size must equal the current output size.
    pub fn add_layer(&mut self, layer: Layer) -> Result<()> {
        if let Some(last) = self.layers.last() {
            ensure_len("Network::add_layer", last.size(), layer.input_size())?;
        }
        self.layers.push(layer);
        Ok(())
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn loss(&self) -> LossFunction {
        self.loss
    }

    /// Width of the input the first layer expects, `None` for an empty network.
    pub fn input_size(&self) -> Option<usize> {
        self.layers.first().map(Layer::input_size)
    }

    pub fn output_size(&self) -> Option<usize> {
        self.layers.last().map(Layer::size)
    }

    /// Runs `input` through every layer and returns only the final output.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        if self.layers.is_empty() {
            return Err(NnError::EmptyNetwork);
        }
        let mut current = input.to_vec();
        for layer in &self.layers {
            current = layer.forward(&current)?;
        }
        Ok(current)
    }

    /// Forward pass that keeps every layer's output; index `i` is layer `i`'s.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<Vec<f64>>> {
        if self.layers.is_empty() {
            return Err(NnError::EmptyNetwork);
        }
        let mut outputs: Vec<Vec<f64>> = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let next = layer.forward(outputs.last().map_or(input, Vec::as_slice))?;
            outputs.push(next);
        }
        Ok(outputs)
    }

    /// Backward pass for one sample.
    ///
    /// `layer_outputs` is what `forward(input)` returned. The loss gradient
    /// seeds the output layer; each earlier layer receives the deltas and
    /// weights of the layer after it.
    ///
    /// Returns `(deltas, gradients)`, both indexed in forward order.
    pub fn backward(
        &self,
        layer_outputs: &[Vec<f64>],
        input: &[f64],
        target: &[f64],
    ) -> Result<(Vec<Vec<f64>>, Vec<Matrix>)> {
        let n = self.layers.len();
        if n == 0 {
            return Err(NnError::EmptyNetwork);
        }
        ensure_len("Network::backward layer outputs", n, layer_outputs.len())?;

        let mut deltas: Vec<Vec<f64>> = Vec::with_capacity(n);
        let mut gradients: Vec<Matrix> = Vec::with_capacity(n);
        let mut next_deltas = self.loss.gradient(target, &layer_outputs[n - 1])?;

        for i in (0..n).rev() {
            let layer_input = if i == 0 { input } else { layer_outputs[i - 1].as_slice() };
            let next_weights = self.layers.get(i + 1).map(Layer::weights);

            let (layer_deltas, layer_gradients) = self.layers[i].backward(
                layer_input,
                &layer_outputs[i],
                &next_deltas,
                next_weights,
            )?;

            next_deltas = layer_deltas.clone();
            deltas.push(layer_deltas);
            gradients.push(layer_gradients);
        }

        deltas.reverse();
        gradients.reverse();
        Ok((deltas, gradients))
    }

    /// Fails with `NumericalInstability` if any weight or bias is NaN or infinite.
    ///
    /// Not called by the training loop on its own; callers poll it when they
    /// want to abort a diverging run.
    pub fn detect_nan(&self) -> Result<()> {
        for (i, layer) in self.layers.iter().enumerate() {
            let finite = layer.weights().iter().all(|w| w.is_finite())
                && layer.biases().iter().all(|b| b.is_finite());
            if !finite {
                return Err(NnError::NumericalInstability { layer: i });
            }
        }
        Ok(())
    }

    /// Checks every per-layer and between-layer invariant. Used after deserialization.
    fn validate(&self) -> Result<()> {
        for layer in &self.layers {
            layer.validate()?;
        }
        for pair in self.layers.windows(2) {
            ensure_len("Network layer chain", pair[0].size(), pair[1].input_size())?;
        }
        Ok(())
    }

    /// Writes the network as JSON to any byte sink.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Reads a network written by `to_writer` and re-checks its shapes.
    pub fn from_reader<R: Read>(reader: R) -> Result<Network> {
        let network: Network = serde_json::from_reader(reader)?;
        network.validate()?;
        Ok(network)
    }

    /// Serializes the network weights to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        info!(path = %path.display(), layers = self.layers.len(), "saved model");
        Ok(())
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Network> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let network = Network::from_reader(std::io::BufReader::new(file))?;
        debug!(path = %path.display(), layers = network.layers.len(), "loaded model");
        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{activation::activation::ActivationFunction, init::initializer::Initializer};
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn two_layer(loss: LossFunction, out: ActivationFunction) -> Network {
        let mut rng = StdRng::seed_from_u64(11);
        let mut network = Network::new(loss);
        network.add_layer(Layer::new(3, 4, ActivationFunction::Tanh, Initializer::HeNormal, &mut rng).unwrap()).unwrap();
        network.add_layer(Layer::new(4, 2, out, Initializer::HeNormal, &mut rng).unwrap()).unwrap();
        network
    }

    /// Copy of `network` with one weight shifted by `by`.
    fn nudge(network: &Network, layer_idx: usize, row: usize, col: usize, by: f64) -> Network {
        let mut nudged = network.clone();
        let layer = &mut nudged.layers_mut()[layer_idx];
        let step = Matrix::from_fn(layer.input_size(), layer.size(), |i, j| {
            if (i, j) == (row, col) { -1.0 } else { 0.0 }
        });
        let zero_deltas = vec![0.0; layer.size()];
        layer.apply_gradients(&step, &zero_deltas, by).unwrap();
        nudged
    }

    #[test]
    fn add_layer_rejects_mismatched_input() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut network = Network::new(LossFunction::MeanSquaredError);
        network.add_layer(Layer::new(2, 3, ActivationFunction::ReLU, Initializer::HeNormal, &mut rng).unwrap()).unwrap();
        let bad = Layer::new(4, 1, ActivationFunction::Sigmoid, Initializer::HeNormal, &mut rng).unwrap();
        assert!(matches!(
            network.add_layer(bad),
            Err(NnError::ShapeMismatch { expected: 3, actual: 4, .. })
        ));
        assert_eq!(network.layers().len(), 1);
    }

    #[test]
    fn empty_network_cannot_predict() {
        let network = Network::new(LossFunction::CrossEntropy);
        assert!(matches!(network.predict(&[1.0]), Err(NnError::EmptyNetwork)));
    }

    #[test]
    fn forward_keeps_every_output_and_ends_at_predict() {
        let network = two_layer(LossFunction::MeanSquaredError, ActivationFunction::Sigmoid);
        let input = [0.2, -0.4, 0.9];
        let outputs = network.forward(&input).unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].len(), 4);
        assert_eq!(outputs[1], network.predict(&input).unwrap());
    }

    #[test]
    fn softmax_cross_entropy_delta_is_scaled_by_output() {
        // Softmax passes the loss gradient through, then it is multiplied by
        // the output: delta = (o - t) ⊙ o rather than o - t.
        let mut network = Network::new(LossFunction::CrossEntropy);
        network.add_layer(Layer::from_parts(Matrix::zeros(2, 2), vec![0.0, 0.0], ActivationFunction::Softmax).unwrap()).unwrap();
        let input = [1.0, 2.0];
        let outputs = network.forward(&input).unwrap();
        assert_eq!(outputs[0], vec![0.5, 0.5]);

        let (deltas, gradients) = network.backward(&outputs, &input, &[1.0, 0.0]).unwrap();
        assert_abs_diff_eq!(deltas[0][0], -0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(deltas[0][1], 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(gradients[0].data[1][0], -0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(gradients[0].data[1][1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn backward_returns_forward_ordered_shapes() {
        let network = two_layer(LossFunction::CrossEntropy, ActivationFunction::Softmax);
        let input = [0.2, -0.4, 0.9];
        let outputs = network.forward(&input).unwrap();
        let (deltas, gradients) = network.backward(&outputs, &input, &[1.0, 0.0]).unwrap();

        assert_eq!(deltas.iter().map(Vec::len).collect::<Vec<_>>(), vec![4, 2]);
        assert_eq!((gradients[0].rows, gradients[0].cols), (3, 4));
        assert_eq!((gradients[1].rows, gradients[1].cols), (4, 2));
    }

    #[test]
    fn backward_matches_numerical_gradient_for_mse() {
        let network = two_layer(LossFunction::MeanSquaredError, ActivationFunction::Sigmoid);
        let input = [0.3, 0.1, -0.7];
        let target = [1.0, 0.0];
        let outputs = network.forward(&input).unwrap();
        let (_, gradients) = network.backward(&outputs, &input, &target).unwrap();

        let eps = 1e-6;
        for (layer_idx, row, col) in [(0, 0, 0), (0, 2, 3), (1, 1, 0), (1, 3, 1)] {
            let plus = nudge(&network, layer_idx, row, col, eps);
            let minus = nudge(&network, layer_idx, row, col, -eps);

            let loss_plus = network.loss.apply(&target, &plus.predict(&input).unwrap()).unwrap();
            let loss_minus = network.loss.apply(&target, &minus.predict(&input).unwrap()).unwrap();
            let numeric = (loss_plus - loss_minus) / (2.0 * eps);

            assert_abs_diff_eq!(gradients[layer_idx].data[row][col], numeric, epsilon = 1e-6);
        }
    }

    #[test]
    fn backward_rejects_wrong_target_width() {
        let network = two_layer(LossFunction::MeanSquaredError, ActivationFunction::Sigmoid);
        let input = [0.0, 0.0, 0.0];
        let outputs = network.forward(&input).unwrap();
        assert!(network.backward(&outputs, &input, &[1.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn detect_nan_reports_layer() {
        let mut network = two_layer(LossFunction::MeanSquaredError, ActivationFunction::Sigmoid);
        assert!(network.detect_nan().is_ok());

        let poison = Matrix::from_fn(4, 2, |i, j| if (i, j) == (1, 1) { f64::NAN } else { 0.0 });
        network.layers_mut()[1].apply_gradients(&poison, &[0.0, 0.0], 1.0).unwrap();
        assert!(matches!(network.detect_nan(), Err(NnError::NumericalInstability { layer: 1 })));
    }

    #[test]
    fn json_round_trip_preserves_predictions() {
        let network = two_layer(LossFunction::CrossEntropy, ActivationFunction::Softmax);
        let input = [0.5, -1.5, 2.0];

        let mut bytes = Vec::new();
        network.to_writer(&mut bytes).unwrap();
        let restored = Network::from_reader(bytes.as_slice()).unwrap();

        assert_eq!(restored.loss(), LossFunction::CrossEntropy);
        assert_eq!(restored.layers().len(), 2);
        let before = network.predict(&input).unwrap();
        let after = restored.predict(&input).unwrap();
        for (a, b) in before.iter().zip(&after) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn from_reader_rejects_broken_layer_chain() {
        let json = r#"{
            "layers": [
                {"weights": {"rows": 1, "cols": 2, "data": [[1.0, 2.0]]}, "biases": [0.0, 0.0], "activation": "ReLU"},
                {"weights": {"rows": 3, "cols": 1, "data": [[1.0], [1.0], [1.0]]}, "biases": [0.0], "activation": "Sigmoid"}
            ],
            "loss": "mean_squared_error"
        }"#;
        assert!(matches!(
            Network::from_reader(json.as_bytes()),
            Err(NnError::ShapeMismatch { .. })
        ));
    }
}
