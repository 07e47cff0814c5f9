use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::layers::ConvError;

/// Errors raised while loading data, building or training a classifier.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{}: malformed csv: {source}", path.display())]
    CsvRecord {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}:{line}: column {column} is not a number: {value:?}", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        column: usize,
        value: String,
    },

    #[error(
        "{}:{line}: expected at least {expected} values, found {found}",
        path.display()
    )]
    ShortRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{samples} samples but {labels} labels")]
    LengthMismatch { samples: usize, labels: usize },

    #[error("window size {found} does not match {expected}")]
    WindowMismatch { expected: usize, found: usize },

    #[error("label {label} is outside 0..{num_class}")]
    Label { label: usize, num_class: usize },

    #[error(
        "split of {n_samples} samples leaves an empty partition \
         (train={n_train}, test={n_test})"
    )]
    EmptySplit {
        n_samples: usize,
        n_train: usize,
        n_test: usize,
    },

    #[error("{scenario}: no samples carry label {label}")]
    MissingClass { scenario: String, label: usize },

    #[error("shape error: {0}")]
    Shape(String),

    #[error(transparent)]
    Conv(#[from] ConvError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("modem: {0}")]
    Modem(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
