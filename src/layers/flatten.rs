use super::layer::{Layer, Shape};
use crate::error::Result;
use crate::math::Matrix;

/// Collapse `(channels, height, width)` into a flat feature vector.
///
/// Batches are already stored one flattened sample per row, so only the
/// reported shape changes.
#[derive(Default)]
pub struct Flatten;

impl Flatten {
    pub fn new() -> Self {
        Self
    }
}

impl Layer for Flatten {
    fn name(&self) -> &'static str {
        "flatten"
    }

    fn output_shape(&self, input: Shape) -> Shape {
        Shape::flat(input.len())
    }

    fn forward(&self, x: &Matrix) -> Result<Matrix> {
        Ok(x.clone())
    }

    fn forward_train(&mut self, x: &Matrix) -> Result<Matrix> {
        Ok(x.clone())
    }

    fn backward(&mut self, grad_out: &Matrix) -> Matrix {
        grad_out.clone()
    }
}
