use std::path::Path;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::error::Result;
use crate::init::initializer::Initializer;
use crate::layers::dense::Layer;
use crate::loss::loss_function::LossFunction;
use crate::network::network::Network;

/// Describes one layer in a network specification.
///
/// Fields:
/// - `input_size`  — width of the layer's input (the previous layer's `size`,
///                   or the raw input dimension for the first layer)
/// - `size`        — number of neurons in this layer
/// - `activation`  — activation function applied after the affine transform
/// - `initializer` — how the weight matrix is sampled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub input_size: usize,
    pub size: usize,
    pub activation: ActivationFunction,
    #[serde(default = "default_initializer")]
    pub initializer: Initializer,
}

fn default_initializer() -> Initializer {
    Initializer::HeNormal
}

/// A serializable description of a network architecture plus its loss.
///
/// Can be stored as JSON independently of trained weights and turned into
/// a freshly initialised `Network` with `build`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    pub loss: LossFunction,
}

impl NetworkSpec {
    /// 784 → 128 ReLU → 64 ReLU → 10 Softmax with cross-entropy, He-initialised.
    pub fn digits() -> NetworkSpec {
        let layer = |input_size, size, activation| LayerSpec {
            input_size,
            size,
            activation,
            initializer: Initializer::HeNormal,
        };
        NetworkSpec {
            layers: vec![
                layer(784, 128, ActivationFunction::ReLU),
                layer(128, 64, ActivationFunction::ReLU),
                layer(64, 10, ActivationFunction::Softmax),
            ],
            loss: LossFunction::CrossEntropy,
        }
    }

    /// Samples every layer from `rng` and assembles the network.
    /// Fails with `ShapeMismatch` if adjacent layers do not chain.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        let mut network = Network::new(self.loss);
        for spec in &self.layers {
            network.add_layer(Layer::new(spec.input_size, spec.size, spec.activation, spec.initializer, &mut *rng)?)?;
        }
        Ok(network)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `NetworkSpec` from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<NetworkSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
