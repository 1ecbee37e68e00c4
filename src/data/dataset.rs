use crate::error::{ensure_len, Result};

/// Paired feature and target vectors, index-aligned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub inputs: Vec<Vec<f64>>,
    pub targets: Vec<Vec<f64>>,
}

impl Dataset {
    pub fn new(inputs: Vec<Vec<f64>>, targets: Vec<Vec<f64>>) -> Result<Dataset> {
        ensure_len("Dataset targets", inputs.len(), targets.len())?;
        Ok(Dataset { inputs, targets })
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// One-hot vector of length `n_classes` with a 1 at `label`, or `None` if
/// `label` is out of range.
pub fn one_hot(label: usize, n_classes: usize) -> Option<Vec<f64>> {
    if label >= n_classes {
        return None;
    }
    let mut v = vec![0.0; n_classes];
    v[label] = 1.0;
    Some(v)
}

/// The four XOR samples with a single 0/1 target each.
pub fn xor() -> Dataset {
    Dataset {
        inputs: vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ],
        targets: vec![vec![0.0], vec![1.0], vec![1.0], vec![0.0]],
    }
}
