use std::io::{self, Write};
use std::sync::mpsc;

use serde::{Serialize, Deserialize};

/// Events emitted by `Trainer::train`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrainEvent {
    /// Sent after every training sample. `epoch` is 0-based, `count` is the
    /// number of samples processed so far in this epoch.
    Progress { epoch: usize, count: usize, total: usize },
    /// Validation accuracy in `[0, 1]`, sent once per epoch when a validation
    /// split is configured.
    Accuracy { epoch: usize, accuracy: f64 },
}

/// Receives training progress. Both hooks default to doing nothing.
pub trait TrainObserver {
    fn on_progress(&mut self, _epoch: usize, _count: usize, _total: usize) {}

    fn on_accuracy(&mut self, _epoch: usize, _accuracy: f64) {}
}

/// Silent observer.
impl TrainObserver for () {}

/// Forwards every event over a channel. A dropped receiver is ignored so
/// training always runs to completion.
impl TrainObserver for mpsc::Sender<TrainEvent> {
    fn on_progress(&mut self, epoch: usize, count: usize, total: usize) {
        let _ = self.send(TrainEvent::Progress { epoch, count, total });
    }

    fn on_accuracy(&mut self, epoch: usize, accuracy: f64) {
        let _ = self.send(TrainEvent::Accuracy { epoch, accuracy });
    }
}

/// Prints a carriage-return progress line to stdout:
/// `Epoch 1 - 1200/48000`, then `Accuracy: 91.3%` after validation.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl TrainObserver for ConsoleProgress {
    fn on_progress(&mut self, epoch: usize, count: usize, total: usize) {
        let mut out = io::stdout().lock();
        let _ = write!(out, "\rEpoch {} - {}/{}", epoch + 1, count, total);
        if count == total {
            let _ = writeln!(out);
        }
        let _ = out.flush();
    }

    fn on_accuracy(&mut self, _epoch: usize, accuracy: f64) {
        println!("Accuracy: {:.5}%", accuracy * 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_forwards_events() {
        let (mut tx, rx) = mpsc::channel::<TrainEvent>();
        tx.on_progress(0, 1, 2);
        tx.on_accuracy(0, 0.5);
        drop(tx);
        let events: Vec<TrainEvent> = rx.iter().collect();
        assert_eq!(events, vec![
            TrainEvent::Progress { epoch: 0, count: 1, total: 2 },
            TrainEvent::Accuracy { epoch: 0, accuracy: 0.5 },
        ]);
    }

    #[test]
    fn sender_survives_dropped_receiver() {
        let (mut tx, rx) = mpsc::channel::<TrainEvent>();
        drop(rx);
        tx.on_progress(0, 1, 1);
    }
}
