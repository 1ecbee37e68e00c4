pub mod trainer;
pub mod events;
pub mod train_config;
pub mod loop_fn;

pub use trainer::Trainer;
pub use events::{ConsoleProgress, TrainEvent, TrainObserver};
pub use train_config::TrainConfig;
