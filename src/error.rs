use thiserror::Error;

/// Everything that can go wrong while assembling, training or persisting a network.
#[derive(Debug, Error)]
pub enum NnError {
    /// Two tensors that must agree in size do not.
    /// `context` names the operation that detected it.
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A weight or bias of layer `layer` is NaN or infinite.
    #[error("numerical instability: non-finite weight or bias in layer {layer}")]
    NumericalInstability { layer: usize },

    #[error("network has no layers")]
    EmptyNetwork,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("row {row}: class label {label} is out of range for {classes} classes")]
    InvalidLabel { row: usize, label: String, classes: usize },

    #[error("row {row}, column {column}: '{value}' is not a number")]
    Parse { row: usize, column: usize, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, NnError>;

/// Fails with `ShapeMismatch` unless `actual == expected`.
pub(crate) fn ensure_len(context: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(NnError::ShapeMismatch { context, expected, actual })
    }
}
