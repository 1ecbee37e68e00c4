pub mod dataset;
pub mod labeled_csv;

pub use dataset::{one_hot, Dataset};
pub use labeled_csv::{load_labeled_csv, read_labeled_csv};
