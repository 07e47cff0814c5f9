use crate::error::{Error, Result};
use crate::math::round_to;

/// Square count matrix where cell `(i, j)` holds the number of samples with
/// true class `i` that were predicted as class `j`.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfusionMatrix {
    num_class: usize,
    counts: Vec<u64>,
}

/// Tally `predictions` against `labels`.
///
/// Both slices must have the same length and every class must be below
/// `num_class`.
pub fn confusion_matrix(
    predictions: &[usize],
    labels: &[usize],
    num_class: usize,
) -> Result<ConfusionMatrix> {
    if predictions.len() != labels.len() {
        return Err(Error::LengthMismatch {
            samples: predictions.len(),
            labels: labels.len(),
        });
    }
    let mut counts = vec![0u64; num_class * num_class];
    for (&p, &t) in predictions.iter().zip(labels) {
        for label in [p, t] {
            if label >= num_class {
                return Err(Error::Label { label, num_class });
            }
        }
        counts[t * num_class + p] += 1;
    }
    Ok(ConfusionMatrix { num_class, counts })
}

impl ConfusionMatrix {
    pub fn num_class(&self) -> usize {
        self.num_class
    }

    /// Count of true class `truth` predicted as `predicted`.
    pub fn get(&self, truth: usize, predicted: usize) -> u64 {
        self.counts[truth * self.num_class + predicted]
    }

    /// Number of samples whose true class is `truth`.
    pub fn row_sum(&self, truth: usize) -> u64 {
        let start = truth * self.num_class;
        self.counts[start..start + self.num_class].iter().sum()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Counts as nested rows.
    pub fn counts(&self) -> Vec<Vec<u64>> {
        self.counts
            .chunks(self.num_class.max(1))
            .map(|r| r.to_vec())
            .collect()
    }

    /// Each row divided by its sum and rounded to four decimals.
    ///
    /// A class that never occurs in the labels has a zero row sum, which
    /// yields a row of NaN.
    pub fn normalized(&self) -> Vec<Vec<f64>> {
        (0..self.num_class)
            .map(|i| {
                let sum = self.row_sum(i) as f64;
                (0..self.num_class)
                    .map(|j| round_to(self.get(i, j) as f64 / sum, 4))
                    .collect()
            })
            .collect()
    }

    /// Fraction of samples on the diagonal.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let hits: u64 = (0..self.num_class).map(|i| self.get(i, i)).sum();
        hits as f64 / total as f64
    }
}
