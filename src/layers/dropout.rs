use super::layer::{Layer, Shape};
use crate::error::Result;
use crate::math::Matrix;
use rand::rngs::StdRng;
use rand::Rng;

/// Dropout layer that randomly zeros elements during training.
///
/// During the training pass each element is kept with probability `1 - p`.
/// Kept values are scaled by `1/(1 - p)` to preserve the expected activation
/// ("inverted" dropout), so inference is the identity. The mask is stored
/// for the backward pass.
pub struct Dropout {
    p: f32,
    mask: Vec<f32>,
    rng: StdRng,
}

impl Dropout {
    /// Create a new dropout layer dropping a fraction `p` of its inputs.
    pub fn new(p: f32, rng: StdRng) -> Self {
        Self {
            p: p.clamp(0.0, 1.0),
            mask: Vec::new(),
            rng,
        }
    }
}

impl Layer for Dropout {
    fn name(&self) -> &'static str {
        "dropout"
    }

    fn output_shape(&self, input: Shape) -> Shape {
        input
    }

    fn forward(&self, x: &Matrix) -> Result<Matrix> {
        Ok(x.clone())
    }

    fn forward_train(&mut self, x: &Matrix) -> Result<Matrix> {
        let mut out = Matrix::zeros(x.rows, x.cols);
        self.mask = vec![0.0; x.data.len()];
        let scale = if self.p < 1.0 { 1.0 / (1.0 - self.p) } else { 0.0 };
        for i in 0..x.data.len() {
            if self.rng.gen::<f32>() >= self.p {
                self.mask[i] = scale;
                out.data[i] = x.data[i] * scale;
            }
        }
        Ok(out)
    }

    fn backward(&mut self, grad: &Matrix) -> Matrix {
        let mut grad_input = Matrix::zeros(grad.rows, grad.cols);
        for i in 0..grad.data.len() {
            grad_input.data[i] = grad.data[i] * self.mask[i];
        }
        grad_input
    }
}
