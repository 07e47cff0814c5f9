pub mod dataloader;
pub mod encoding;
pub mod loader;
pub mod split;

pub use dataloader::{batch_indices, DataLoader};
pub use encoding::{from_categorical, to_categorical};
pub use loader::load_csv;
pub use split::{train_test_split, Split};

use crate::error::{Error, Result};
use crate::tensor::Tensor;

/// Feature windows with one class label per window.
///
/// Samples are stored as a `[n, 2, window]` tensor: two feature channels of
/// `window` values each.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    samples: Tensor,
    labels: Vec<usize>,
}

impl Dataset {
    /// Pair `samples` with `labels`. Both must have the same length and the
    /// samples must be `[n, 2, window]`.
    pub fn new(samples: Tensor, labels: Vec<usize>) -> Result<Self> {
        if samples.shape.len() != 3 || samples.shape[1] != 2 {
            return Err(Error::Shape(format!(
                "samples must be shaped [n, 2, window], got {:?}",
                samples.shape
            )));
        }
        if samples.len() != labels.len() {
            return Err(Error::LengthMismatch {
                samples: samples.len(),
                labels: labels.len(),
            });
        }
        Ok(Self { samples, labels })
    }

    /// A dataset with no windows of the given size.
    pub fn empty(window_size: usize) -> Self {
        Self {
            samples: Tensor::zeros(vec![0, 2, window_size]),
            labels: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn window_size(&self) -> usize {
        self.samples.shape[2]
    }

    pub fn samples(&self) -> &Tensor {
        &self.samples
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// The windows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            samples: self.samples.select(indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }

    /// `a`'s windows followed by `b`'s.
    pub fn concat(a: &Dataset, b: &Dataset) -> Result<Dataset> {
        if a.window_size() != b.window_size() {
            return Err(Error::WindowMismatch {
                expected: a.window_size(),
                found: b.window_size(),
            });
        }
        let samples = Tensor::concat(&a.samples, &b.samples)?;
        let mut labels = Vec::with_capacity(a.len() + b.len());
        labels.extend_from_slice(&a.labels);
        labels.extend_from_slice(&b.labels);
        Ok(Dataset { samples, labels })
    }

    /// Split into the sample tensor and label vector.
    pub fn into_parts(self) -> (Tensor, Vec<usize>) {
        (self.samples, self.labels)
    }
}
