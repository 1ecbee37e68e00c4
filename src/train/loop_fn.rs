use crate::error::{ensure_len, NnError, Result};
use crate::math::matrix::argmax;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::events::TrainObserver;

/// Runs one epoch of online SGD: forward, backward and update for every
/// sample, in the order given. Returns the mean training loss, measured on
/// each sample before its update.
pub(crate) fn run_one_epoch<O: TrainObserver + ?Sized>(
    network: &mut Network,
    optimizer: &Sgd,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    epoch: usize,
    observer: &mut O,
) -> Result<f64> {
    let total = inputs.len();
    let mut total_loss = 0.0;

    for (count, (input, target)) in inputs.iter().zip(targets).enumerate() {
        let outputs = network.forward(input)?;
        if let Some(output) = outputs.last() {
            total_loss += network.loss().apply(target, output)?;
        }
        let (deltas, gradients) = network.backward(&outputs, input, target)?;
        optimizer.step(network, &deltas, &gradients)?;
        observer.on_progress(epoch, count + 1, total);
    }

    Ok(if total == 0 { 0.0 } else { total_loss / total as f64 })
}

/// Fraction of samples whose predicted class (argmax) matches the target's.
/// `0.0` for an empty set.
pub(crate) fn accuracy(network: &Network, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<f64> {
    check_pairs(inputs, targets)?;
    if inputs.is_empty() {
        return Ok(0.0);
    }
    let mut correct = 0usize;
    for (input, target) in inputs.iter().zip(targets) {
        let output = network.predict(input)?;
        ensure_len("accuracy target width", output.len(), target.len())?;
        if argmax(&output) == argmax(target) {
            correct += 1;
        }
    }
    Ok(correct as f64 / inputs.len() as f64)
}

/// Every input must fit the first layer and every target the last.
pub(crate) fn check_widths(network: &Network, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<()> {
    let (Some(input_size), Some(output_size)) = (network.input_size(), network.output_size()) else {
        return Err(NnError::EmptyNetwork);
    };
    for input in inputs {
        ensure_len("training input width", input_size, input.len())?;
    }
    for target in targets {
        ensure_len("training target width", output_size, target.len())?;
    }
    Ok(())
}

/// Inputs and targets must pair up one to one.
pub(crate) fn check_pairs(inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<()> {
    ensure_len("inputs/targets pairing", inputs.len(), targets.len())
}
