use tracing::{debug, info, warn};

use crate::{
    error::Result,
    network::network::Network,
    optim::sgd::Sgd,
    train::{
        events::TrainObserver,
        loop_fn::{accuracy, check_pairs, check_widths, run_one_epoch},
        train_config::TrainConfig,
    },
};

/// Drives online stochastic gradient descent over a network it owns.
///
/// The learning rate is state: every epoch of `train` decays it in place,
/// and the decayed value carries over to later `train` calls.
#[derive(Debug, Clone)]
pub struct Trainer {
    network: Network,
    optimizer: Sgd,
}

impl Trainer {
    pub fn new(network: Network, learning_rate: f64) -> Trainer {
        Trainer { network, optimizer: Sgd::new(learning_rate) }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Hands the trained network back, e.g. for persistence.
    pub fn into_network(self) -> Network {
        self.network
    }

    /// Current (decayed) learning rate.
    pub fn learning_rate(&self) -> f64 {
        self.optimizer.learning_rate
    }

    /// Trains on `inputs`/`targets` for `config.epochs` epochs.
    ///
    /// The first `floor(len · validation_split)` samples are held out for
    /// validation and never used for updates; the rest are visited in order,
    /// one update per sample. No shuffling is done. An empty training set
    /// (no data, or `validation_split = 1`) still runs every epoch: nothing is
    /// updated but the learning rate decays.
    ///
    /// Per epoch the observer gets one progress event per sample and, when a
    /// validation split is set, the validation accuracy. The learning rate is
    /// multiplied by `learning_rate_decay` at the end of every epoch.
    ///
    /// Every input and target must match the network's input and output
    /// widths; this is checked before the first update.
    ///
    /// NaN or infinite parameters are not trapped unless `config.check_finite`
    /// is set, in which case training stops with `NumericalInstability`.
    pub fn train<O: TrainObserver + ?Sized>(
        &mut self,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
        config: &TrainConfig,
        observer: &mut O,
    ) -> Result<()> {
        config.validate()?;
        check_pairs(inputs, targets)?;
        check_widths(&self.network, inputs, targets)?;

        let n_val = config.validation_len(inputs.len());
        let (val_inputs, train_inputs) = inputs.split_at(n_val);
        let (val_targets, train_targets) = targets.split_at(n_val);
        if train_inputs.is_empty() {
            warn!("no training samples; epochs will only decay the learning rate");
        }
        info!(
            train = train_inputs.len(),
            validation = val_inputs.len(),
            epochs = config.epochs,
            learning_rate = self.optimizer.learning_rate,
            "starting training"
        );

        for epoch in 0..config.epochs {
            let mean_loss = run_one_epoch(
                &mut self.network,
                &self.optimizer,
                train_inputs,
                train_targets,
                epoch,
                &mut *observer,
            )?;

            if config.validation_split != 0.0 && !val_inputs.is_empty() {
                let val_accuracy = self.test(val_inputs, val_targets)?;
                observer.on_accuracy(epoch, val_accuracy);
                info!(epoch = epoch + 1, mean_loss, val_accuracy, "epoch complete");
            } else {
                info!(epoch = epoch + 1, mean_loss, "epoch complete");
            }

            if config.check_finite {
                self.network.detect_nan()?;
            }

            self.optimizer.decay(config.learning_rate_decay);
            debug!(epoch = epoch + 1, learning_rate = self.optimizer.learning_rate, "decayed learning rate");
        }

        Ok(())
    }

    /// Loss of the current prediction for `input` against `target`.
    pub fn evaluate(&self, input: &[f64], target: &[f64]) -> Result<f64> {
        let output = self.network.predict(input)?;
        self.network.loss().apply(target, &output)
    }

    /// Classification accuracy in `[0, 1]`: the fraction of samples where
    /// `argmax(predict(x)) == argmax(y)`.
    pub fn test(&self, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<f64> {
        accuracy(&self.network, inputs, targets)
    }
}
