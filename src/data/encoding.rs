use crate::error::{Error, Result};
use crate::math::Matrix;

/// One-hot encode `labels` into a `labels.len() x num_class` matrix.
pub fn to_categorical(labels: &[usize], num_class: usize) -> Result<Matrix> {
    let mut m = Matrix::zeros(labels.len(), num_class);
    for (row, &label) in labels.iter().enumerate() {
        if label >= num_class {
            return Err(Error::Label { label, num_class });
        }
        m.set(row, label, 1.0);
    }
    Ok(m)
}

/// Recover class indices from one-hot or probability rows.
pub fn from_categorical(m: &Matrix) -> Vec<usize> {
    m.argmax_rows()
}
