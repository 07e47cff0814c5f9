use crate::error::{Error, Result};
use crate::math::Matrix;

/// N-dimensional tensor backed by a flat `Vec<f32>`.
///
/// Sample batches are stored as `[n, 2, window]` tensors; the leading axis
/// always indexes samples so batches can be gathered and split by row.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    /// Tensor elements in row-major order.
    pub data: Vec<f32>,
    /// Sizes for each dimension.
    pub shape: Vec<usize>,
}

impl Tensor {
    /// Create a new tensor from raw parts.  The number of elements in `data`
    /// must match the product of the requested `shape`.
    pub fn new(data: Vec<f32>, shape: Vec<usize>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(Error::Shape(format!(
                "{} elements cannot fill shape {:?}",
                data.len(),
                shape
            )));
        }
        Ok(Tensor { data, shape })
    }

    /// Create a tensor of zeros with the given shape.
    pub fn zeros(shape: Vec<usize>) -> Self {
        let len: usize = shape.iter().product();
        Tensor {
            data: vec![0.0; len],
            shape,
        }
    }

    /// Compute the flat index for a multi-dimensional coordinate.
    fn offset(&self, idx: &[usize]) -> usize {
        assert_eq!(idx.len(), self.shape.len());
        let mut stride = 1;
        let mut off = 0usize;
        for (i, &dim) in self.shape.iter().rev().enumerate() {
            let id = idx[self.shape.len() - 1 - i];
            assert!(id < dim, "index out of bounds");
            off += id * stride;
            stride *= dim;
        }
        off
    }

    /// Basic immutable indexing.
    pub fn get(&self, idx: &[usize]) -> f32 {
        let off = self.offset(idx);
        self.data[off]
    }

    /// Append a trailing axis of size one, e.g. `[n, 2, w]` -> `[n, 2, w, 1]`.
    pub fn expand_dims(mut self) -> Self {
        self.shape.push(1);
        self
    }

    /// Number of entries along the leading axis.
    pub fn len(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shape of one entry along the leading axis.
    pub fn item_shape(&self) -> &[usize] {
        self.shape.get(1..).unwrap_or(&[])
    }

    /// Number of elements in one entry along the leading axis.
    pub fn item_len(&self) -> usize {
        self.item_shape().iter().product()
    }

    /// Borrow the flat elements of entry `i`.
    pub fn item(&self, i: usize) -> &[f32] {
        let n = self.item_len();
        &self.data[i * n..(i + 1) * n]
    }

    /// Gather the given entries into a new tensor.
    pub fn select(&self, indices: &[usize]) -> Tensor {
        let mut data = Vec::with_capacity(indices.len() * self.item_len());
        for &i in indices {
            data.extend_from_slice(self.item(i));
        }
        let mut shape = self.shape.clone();
        if let Some(first) = shape.first_mut() {
            *first = indices.len();
        }
        Tensor { data, shape }
    }

    /// Stack `a` and `b` along the leading axis.
    pub fn concat(a: &Tensor, b: &Tensor) -> Result<Tensor> {
        if a.item_shape() != b.item_shape() {
            return Err(Error::Shape(format!(
                "cannot concatenate {:?} with {:?}",
                a.shape, b.shape
            )));
        }
        let mut data = Vec::with_capacity(a.data.len() + b.data.len());
        data.extend_from_slice(&a.data);
        data.extend_from_slice(&b.data);
        let mut shape = a.shape.clone();
        shape[0] = a.len() + b.len();
        Ok(Tensor { data, shape })
    }

    /// Flatten every entry into a matrix row.
    pub fn to_matrix(&self) -> Matrix {
        Matrix::from_vec(self.len(), self.item_len(), self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_dims_keeps_data_order() {
        let t = Tensor::new((0..8).map(|v| v as f32).collect(), vec![2, 2, 2]).unwrap();
        let e = t.clone().expand_dims();
        assert_eq!(e.shape, vec![2, 2, 2, 1]);
        assert_eq!(e.data, t.data);
        assert_eq!(e.get(&[1, 0, 1, 0]), 5.0);
    }

    #[test]
    fn select_and_concat_follow_leading_axis() {
        let a = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap();
        let b = Tensor::new(vec![5.0, 6.0], vec![1, 2]).unwrap();
        let c = Tensor::concat(&a, &b).unwrap();
        assert_eq!(c.shape, vec![3, 2]);
        assert_eq!(c.select(&[2, 0]).data, vec![5.0, 6.0, 1.0, 2.0]);
    }

    #[test]
    fn concat_rejects_different_items() {
        let a = Tensor::zeros(vec![1, 4]);
        let b = Tensor::zeros(vec![1, 3]);
        assert!(Tensor::concat(&a, &b).is_err());
    }

    #[test]
    fn new_rejects_wrong_length() {
        assert!(Tensor::new(vec![0.0; 3], vec![2, 2]).is_err());
    }
}
