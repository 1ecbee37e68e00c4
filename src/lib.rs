pub mod error;
pub mod math;
pub mod activation;
pub mod init;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod data;

// Convenience re-exports
pub use error::{NnError, Result};
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use init::initializer::Initializer;
pub use layers::dense::Layer;
pub use network::network::Network;
pub use network::spec::{LayerSpec, NetworkSpec};
pub use loss::loss_function::LossFunction;
pub use optim::sgd::Sgd;
pub use train::{ConsoleProgress, TrainConfig, TrainEvent, TrainObserver, Trainer};
pub use data::Dataset;
