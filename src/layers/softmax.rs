use super::layer::{Layer, Shape};
use crate::error::Result;
use crate::math::Matrix;

/// Softmax activation layer without parameters.
pub struct Softmax {
    out: Matrix,
}

impl Default for Softmax {
    fn default() -> Self {
        Self::new()
    }
}

impl Softmax {
    pub fn new() -> Self {
        Self {
            out: Matrix::zeros(0, 0),
        }
    }
}

impl Layer for Softmax {
    fn name(&self) -> &'static str {
        "softmax"
    }

    fn output_shape(&self, input: Shape) -> Shape {
        input
    }

    fn forward(&self, x: &Matrix) -> Result<Matrix> {
        Ok(x.softmax())
    }

    fn forward_train(&mut self, x: &Matrix) -> Result<Matrix> {
        let out = x.softmax();
        self.out = out.clone();
        Ok(out)
    }

    /// Jacobian-vector product `s * (g - <g, s>)` per row.
    fn backward(&mut self, grad_out: &Matrix) -> Matrix {
        let mut grad = Matrix::zeros(grad_out.rows, grad_out.cols);
        for r in 0..grad_out.rows {
            let row_start = r * grad_out.cols;
            let row_grad = &grad_out.data[row_start..row_start + grad_out.cols];
            let row_out = &self.out.data[row_start..row_start + grad_out.cols];
            let mut dot = 0.0;
            for c in 0..grad_out.cols {
                dot += row_grad[c] * row_out[c];
            }
            for c in 0..grad_out.cols {
                grad.data[row_start + c] = row_out[c] * (row_grad[c] - dot);
            }
        }
        grad
    }
}
