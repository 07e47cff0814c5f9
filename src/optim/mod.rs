pub mod rmsprop;

pub use rmsprop::RMSprop;

use crate::layers::Param;
use crate::math::Matrix;

/// Common interface for optimizers operating on layer parameters.
pub trait Optimizer {
    /// Update the provided parameters in-place from their accumulated
    /// gradients. `params` must be passed in the same order on every call.
    fn step(&mut self, params: &mut [&mut Param]);

    /// Current learning rate.
    fn lr(&self) -> f32;
}

/// Loss interface used during training. Predictions and targets are
/// batches with one sample per row.
pub trait Loss {
    /// Mean loss over the batch.
    fn loss(&self, pred: &Matrix, target: &Matrix) -> f32;

    /// Gradient of the mean loss with respect to `pred`.
    fn grad(&self, pred: &Matrix, target: &Matrix) -> Matrix;
}

/// Categorical cross-entropy over probability rows and one-hot targets.
pub struct CategoricalCrossEntropy {
    eps: f32,
}

impl Default for CategoricalCrossEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoricalCrossEntropy {
    pub fn new() -> Self {
        Self { eps: 1e-7 }
    }
}

impl Loss for CategoricalCrossEntropy {
    fn loss(&self, pred: &Matrix, target: &Matrix) -> f32 {
        assert_eq!(pred.data.len(), target.data.len());
        if pred.rows == 0 {
            return 0.0;
        }
        let mut sum = 0.0f32;
        for (p, t) in pred.data.iter().zip(target.data.iter()) {
            if *t != 0.0 {
                sum -= t * p.clamp(self.eps, 1.0).ln();
            }
        }
        sum / pred.rows as f32
    }

    fn grad(&self, pred: &Matrix, target: &Matrix) -> Matrix {
        assert_eq!(pred.data.len(), target.data.len());
        let n = pred.rows.max(1) as f32;
        let data = pred
            .data
            .iter()
            .zip(target.data.iter())
            .map(|(p, t)| -t / (p.clamp(self.eps, 1.0) * n))
            .collect();
        Matrix::from_vec(pred.rows, pred.cols, data)
    }
}
