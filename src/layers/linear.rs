use super::layer::{check_features, Layer, Param, Shape};
use crate::error::Result;
use crate::math::Matrix;
use rand::Rng;
use rand_distr::{Distribution, Uniform};

// Fully connected layer `y = x W + b`. The training pass keeps the last
// input so the backward pass can form the weight gradient `x^T dy`.
pub struct Linear {
    pub w: Param,
    pub b: Param,
    last_x: Matrix,
}

impl Linear {
    /// Glorot-uniform weights, `U(-a, a)` with `a = sqrt(6 / (in + out))`,
    /// and zero bias.
    pub fn new<R: Rng>(in_dim: usize, out_dim: usize, rng: &mut R) -> Self {
        let limit = (6.0 / (in_dim + out_dim).max(1) as f32).sqrt();
        let dist = Uniform::new_inclusive(-limit, limit);
        let data = Matrix::from_vec(
            in_dim,
            out_dim,
            (0..in_dim * out_dim).map(|_| dist.sample(rng)).collect(),
        );
        Self {
            w: Param::new(data),
            b: Param::new(Matrix::zeros(1, out_dim)),
            last_x: Matrix::zeros(0, 0),
        }
    }

    pub fn in_dim(&self) -> usize {
        self.w.value.rows
    }

    pub fn out_dim(&self) -> usize {
        self.w.value.cols
    }

    fn affine(&self, x: &Matrix) -> Result<Matrix> {
        check_features("linear", x, self.in_dim())?;
        let mut out = Matrix::matmul(x, &self.w.value);
        out.add_row_broadcast(&self.b.value.data);
        Ok(out)
    }
}

impl Layer for Linear {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn output_shape(&self, _input: Shape) -> Shape {
        Shape::flat(self.out_dim())
    }

    fn forward(&self, x: &Matrix) -> Result<Matrix> {
        self.affine(x)
    }

    fn forward_train(&mut self, x: &Matrix) -> Result<Matrix> {
        let out = self.affine(x)?;
        self.last_x = x.clone();
        Ok(out)
    }

    fn backward(&mut self, grad_out: &Matrix) -> Matrix {
        let grad_w = Matrix::matmul(&self.last_x.transpose(), grad_out);
        self.w.grad = self.w.grad.add(&grad_w);
        for (g, d) in self.b.grad.data.iter_mut().zip(grad_out.sum_rows()) {
            *g += d;
        }
        Matrix::matmul(grad_out, &self.w.value.transpose())
    }

    fn parameters(&mut self) -> Vec<&mut Param> {
        vec![&mut self.w, &mut self.b]
    }
}
