//! XOR with a 2-3-1 network.
//!
//! Architecture: 2 → 3 (ReLU, He) → 1 (Sigmoid, He)
//! Loss:         mean squared error
//! Optimizer:    online SGD, lr = 0.1, no decay, 2000 epochs
//!
//! The trained model is written to `xor_model.json` only if every rounded
//! prediction matches its target.
//!
//! Run with:
//!   cargo run --example xor

use ferrite_mlp::{
    data, ActivationFunction, Initializer, Layer, LossFunction, Network, Result, TrainConfig, Trainer,
};

fn main() -> Result<()> {
    let mut rng = rand::thread_rng();
    let mut network = Network::new(LossFunction::MeanSquaredError);
    network.add_layer(Layer::new(2, 3, ActivationFunction::ReLU, Initializer::HeNormal, &mut rng)?)?;
    network.add_layer(Layer::new(3, 1, ActivationFunction::Sigmoid, Initializer::HeNormal, &mut rng)?)?;

    let xor = data::dataset::xor();
    let config = TrainConfig {
        epochs: 2000,
        validation_split: 0.0,
        learning_rate_decay: 1.0,
        check_finite: false,
    };

    let mut trainer = Trainer::new(network, 0.1);
    trainer.train(&xor.inputs, &xor.targets, &config, &mut ())?;

    let mut correct = 0;
    for (input, target) in xor.inputs.iter().zip(&xor.targets) {
        let prediction = trainer.network().predict(input)?[0];
        println!("Input: {:?} - Prediction: {:.5} - Target: {}", input, prediction, target[0]);
        if prediction.round() == target[0] {
            correct += 1;
        }
    }

    if correct == xor.len() {
        trainer.into_network().save_json("xor_model.json")?;
        println!("Saved xor_model.json");
    } else {
        println!("{correct}/{} correct; not saving (try another run)", xor.len());
    }
    Ok(())
}
