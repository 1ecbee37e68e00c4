//! Loader for label-first CSV datasets such as the MNIST CSV export.
//!
//! Format:
//! - no header row
//! - column 0 is an integer class label in `0..n_classes`
//! - the remaining columns are pixel intensities in `0..=255`
//!
//! Features are divided by 255 and labels are one-hot encoded.

use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::data::dataset::{one_hot, Dataset};
use crate::error::{ensure_len, NnError, Result};

const PIXEL_MAX: f64 = 255.0;

pub fn load_labeled_csv<P: AsRef<Path>>(path: P, n_classes: usize) -> Result<Dataset> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let dataset = read_labeled_csv(std::io::BufReader::new(file), n_classes)?;
    info!(path = %path.display(), samples = dataset.len(), "loaded dataset");
    Ok(dataset)
}

pub fn read_labeled_csv<R: Read>(reader: R, n_classes: usize) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut dataset = Dataset::default();
    let mut width: Option<usize> = None;

    for (row_idx, record) in rdr.records().enumerate() {
        let record = record?;
        let row = row_idx + 1;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let label_cell = record.get(0).unwrap_or_default();
        let target = label_cell.parse::<usize>().ok()
            .and_then(|label| one_hot(label, n_classes))
            .ok_or_else(|| NnError::InvalidLabel {
                row,
                label: label_cell.to_string(),
                classes: n_classes,
            })?;

        let features = record.iter()
            .enumerate()
            .skip(1)
            .map(|(column, cell)| {
                cell.parse::<f64>()
                    .map(|v| v / PIXEL_MAX)
                    .map_err(|_| NnError::Parse { row, column, value: cell.to_string() })
            })
            .collect::<Result<Vec<f64>>>()?;

        match width {
            Some(w) => ensure_len("CSV row width", w, features.len())?,
            None => width = Some(features.len()),
        }

        dataset.inputs.push(features);
        dataset.targets.push(target);
    }

    Ok(dataset)
}
