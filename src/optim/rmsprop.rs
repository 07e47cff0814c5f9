use super::Optimizer;
use crate::layers::Param;

/// `RMSprop` optimizer.
///
/// Maintains a moving average of squared gradients for adaptive learning rates.
///
/// ```text
/// v_t   = rho * v_{t-1} + (1 - rho) * grad^2
/// param = param - lr * grad / (sqrt(v_t) + eps)
/// ```
#[derive(Debug, Clone)]
pub struct RMSprop {
    pub lr: f32,
    pub rho: f32,
    pub eps: f32,
    /// Running average of squared gradients, one buffer per parameter.
    v: Vec<Vec<f32>>,
}

impl Default for RMSprop {
    /// `lr = 0.001`, `rho = 0.9`, `eps = 1e-7`.
    fn default() -> Self {
        Self::new(0.001, 0.9, 1e-7)
    }
}

impl RMSprop {
    pub fn new(lr: f32, rho: f32, eps: f32) -> Self {
        Self {
            lr,
            rho,
            eps,
            v: Vec::new(),
        }
    }
}

impl Optimizer for RMSprop {
    fn step(&mut self, params: &mut [&mut Param]) {
        if self.v.len() < params.len() {
            self.v.resize(params.len(), Vec::new());
        }
        for (idx, p) in params.iter_mut().enumerate() {
            let v = &mut self.v[idx];
            if v.len() != p.len() {
                *v = vec![0.0; p.len()];
            }
            for i in 0..p.len() {
                let g = p.grad.data[i];
                v[i] = self.rho * v[i] + (1.0 - self.rho) * g * g;
                p.value.data[i] -= self.lr * g / (v[i].sqrt() + self.eps);
            }
        }
    }

    fn lr(&self) -> f32 {
        self.lr
    }
}
