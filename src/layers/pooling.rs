use super::layer::{check_features, Layer, Shape};
use crate::error::Result;
use crate::math::Matrix;

/// 2D max pooling over one feature map.
///
/// `input` is a single map stored row-major with dimensions `rows x cols`.
/// Returns the pooled values and, for each pooling window, the flat index of
/// its maximum within `input`. Windows that do not fit are dropped.
pub fn max_pool2d(
    input: &[f32],
    rows: usize,
    cols: usize,
    kernel: usize,
    stride: usize,
) -> (Vec<f32>, Vec<usize>) {
    let out_rows = pooled_len(rows, kernel, stride);
    let out_cols = pooled_len(cols, kernel, stride);
    let mut out = vec![0.0; out_rows * out_cols];
    let mut indices = vec![0usize; out_rows * out_cols];
    let mut idx = 0;
    for r in 0..out_rows {
        for c in 0..out_cols {
            let mut best = f32::NEG_INFINITY;
            let mut best_idx = r * stride * cols + c * stride;
            for kr in 0..kernel {
                for kc in 0..kernel {
                    let ir = r * stride + kr;
                    let ic = c * stride + kc;
                    let val = input[ir * cols + ic];
                    if val > best {
                        best = val;
                        best_idx = ir * cols + ic;
                    }
                }
            }
            out[idx] = best;
            indices[idx] = best_idx;
            idx += 1;
        }
    }
    (out, indices)
}

fn pooled_len(len: usize, kernel: usize, stride: usize) -> usize {
    if len < kernel {
        0
    } else {
        (len - kernel) / stride + 1
    }
}

/// Max pooling layer applied to every channel of every sample.
pub struct MaxPool2d {
    kernel: usize,
    stride: usize,
    input: Shape,
    // Flat argmax positions (per batch row) from the last training pass.
    indices: Vec<usize>,
    batch: usize,
}

impl MaxPool2d {
    /// Create a new max pooling layer for samples of shape `input`.
    pub fn new(input: Shape, kernel: usize, stride: usize) -> Self {
        Self {
            kernel,
            stride,
            input,
            indices: Vec::new(),
            batch: 0,
        }
    }

    fn out_shape(&self) -> Shape {
        Shape::new(
            self.input.channels,
            pooled_len(self.input.height, self.kernel, self.stride),
            pooled_len(self.input.width, self.kernel, self.stride),
        )
    }

    fn pool(&self, x: &Matrix) -> Result<(Matrix, Vec<usize>)> {
        check_features("max_pool2d", x, self.input.len())?;
        let out_shape = self.out_shape();
        let in_plane = self.input.height * self.input.width;
        let out_plane = out_shape.height * out_shape.width;
        let mut out = Matrix::zeros(x.rows, out_shape.len());
        let mut indices = Vec::with_capacity(x.rows * out_shape.len());
        for b in 0..x.rows {
            let row = x.row(b);
            for c in 0..self.input.channels {
                let map = &row[c * in_plane..(c + 1) * in_plane];
                let (vals, idx) = max_pool2d(
                    map,
                    self.input.height,
                    self.input.width,
                    self.kernel,
                    self.stride,
                );
                let start = b * out.cols + c * out_plane;
                out.data[start..start + out_plane].copy_from_slice(&vals);
                indices.extend(idx.into_iter().map(|i| c * in_plane + i));
            }
        }
        Ok((out, indices))
    }
}

impl Layer for MaxPool2d {
    fn name(&self) -> &'static str {
        "max_pool2d"
    }

    fn output_shape(&self, _input: Shape) -> Shape {
        self.out_shape()
    }

    fn forward(&self, x: &Matrix) -> Result<Matrix> {
        Ok(self.pool(x)?.0)
    }

    fn forward_train(&mut self, x: &Matrix) -> Result<Matrix> {
        let (out, indices) = self.pool(x)?;
        self.indices = indices;
        self.batch = x.rows;
        Ok(out)
    }

    /// Route each output gradient back to the input position that won the
    /// max in the forward pass.
    fn backward(&mut self, grad_out: &Matrix) -> Matrix {
        let mut grad_input = Matrix::zeros(self.batch, self.input.len());
        let per_row = grad_out.cols;
        for b in 0..self.batch {
            for j in 0..per_row {
                let src = self.indices[b * per_row + j];
                grad_input.data[b * grad_input.cols + src] += grad_out.get(b, j);
            }
        }
        grad_input
    }
}
