use rand::seq::SliceRandom;
use rand::Rng;

use super::Dataset;
use crate::error::{Error, Result};

/// Train and test partitions of a [`Dataset`].
#[derive(Clone, Debug)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

/// Randomly partition `data` into train and test sets.
///
/// The test set receives `ceil(test_size * n)` samples and the train set the
/// rest. Samples and labels are permuted together. If either partition would
/// be empty the split fails with [`Error::EmptySplit`].
pub fn train_test_split<R: Rng + ?Sized>(
    data: &Dataset,
    test_size: f64,
    rng: &mut R,
) -> Result<Split> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(Error::Config(format!(
            "test size {test_size} must be within (0, 1)"
        )));
    }
    let n = data.len();
    let n_test = (test_size * n as f64).ceil() as usize;
    let n_train = n - n_test.min(n);
    if n_test == 0 || n_train == 0 {
        return Err(Error::EmptySplit {
            n_samples: n,
            n_train,
            n_test,
        });
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    let (test_idx, train_idx) = order.split_at(n_test);
    Ok(Split {
        train: data.select(train_idx),
        test: data.select(test_idx),
    })
}
