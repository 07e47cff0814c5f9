use std::fs::File;
use std::path::Path;

use log::warn;

use super::Dataset;
use crate::error::{Error, Result};
use crate::tensor::Tensor;
use crate::util::logging::log_dataset_loaded;

/// Load header-less CSV feature windows from `path`.
///
/// Each row yields one `[2, window_size]` sample: the first `window_size`
/// fields form channel 0 and the next `window_size` fields channel 1. Any
/// further fields on the row are ignored. Every sample is labelled `1` when
/// `is_fake` is set and `0` otherwise.
pub fn load_csv<P: AsRef<Path>>(path: P, is_fake: bool, window_size: usize) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let expected = 2 * window_size;
    let mut data = Vec::new();
    let mut rows = 0usize;
    for record in reader.records() {
        let record = record.map_err(|source| Error::CsvRecord {
            path: path.to_path_buf(),
            source,
        })?;
        let line = record.position().map_or(rows as u64 + 1, |p| p.line());
        if record.len() < expected {
            return Err(Error::ShortRow {
                path: path.to_path_buf(),
                line,
                expected,
                found: record.len(),
            });
        }
        for (column, field) in record.iter().take(expected).enumerate() {
            let value = field.parse::<f32>().map_err(|_| Error::Parse {
                path: path.to_path_buf(),
                line,
                column,
                value: field.to_string(),
            })?;
            data.push(value);
        }
        rows += 1;
    }
    if rows == 0 {
        warn!("{} contains no rows", path.display());
    }

    let samples = Tensor::new(data, vec![rows, 2, window_size])?;
    let labels = vec![is_fake as usize; rows];
    log_dataset_loaded(path, rows, is_fake);
    Dataset::new(samples, labels)
}
