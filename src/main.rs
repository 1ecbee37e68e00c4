// Trains a digit classifier from label-first CSV files (MNIST CSV export).
//
//   ferrite-mlp <TRAIN_CSV> <TEST_CSV> [--config run.json] [--out model.json] [--seed N]
//
// Log verbosity follows RUST_LOG (default: info).
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use serde::Deserialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ferrite_mlp::{
    data::load_labeled_csv, ConsoleProgress, NetworkSpec, Result, TrainConfig, Trainer,
};

const N_CLASSES: usize = 10;

/// Everything a run needs besides the data. Missing fields take the defaults
/// of the reference digit run: 784-128-64-10, lr 0.01, 3 epochs, 20% validation.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RunConfig {
    network: NetworkSpec,
    learning_rate: f64,
    training: TrainConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            network: NetworkSpec::digits(),
            learning_rate: 0.01,
            training: TrainConfig::default(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ferrite-mlp")]
#[command(about = "Train a digit classifier from label-first CSV files", long_about = None)]
struct Cli {
    /// Training set (label, then pixel values 0-255)
    train_csv: PathBuf,

    /// Test set, same layout as the training set
    test_csv: PathBuf,

    /// Run configuration JSON (network, learning_rate, training)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where the trained model is written
    #[arg(long, default_value = "model.json")]
    out: PathBuf,

    /// Seed for weight initialisation; random if omitted
    #[arg(long)]
    seed: Option<u64>,
}

fn load_run_config(path: Option<&PathBuf>) -> Result<RunConfig> {
    let Some(path) = path else {
        return Ok(RunConfig::default());
    };
    let file = std::fs::File::open(path)?;
    let config: RunConfig = serde_json::from_reader(std::io::BufReader::new(file))?;
    config.training.validate()?;
    Ok(config)
}

fn run(args: Cli) -> Result<()> {
    let config = load_run_config(args.config.as_ref())?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!("reading training data");
    let train = load_labeled_csv(&args.train_csv, N_CLASSES)?;

    let network = config.network.build(&mut rng)?;
    let mut trainer = Trainer::new(network, config.learning_rate);
    trainer.train(&train.inputs, &train.targets, &config.training, &mut ConsoleProgress)?;

    info!("reading test data");
    let test = load_labeled_csv(&args.test_csv, N_CLASSES)?;
    let accuracy = trainer.test(&test.inputs, &test.targets)?;
    println!("Test accuracy: {:.5}%", accuracy * 100.0);

    trainer.into_network().save_json(&args.out)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
