use crate::error::Result;
use crate::math::Matrix;

/// Trainable weights together with the gradient accumulated for them.
#[derive(Clone, Debug)]
pub struct Param {
    pub value: Matrix,
    pub grad: Matrix,
}

impl Param {
    pub fn new(value: Matrix) -> Self {
        let grad = Matrix::zeros(value.rows, value.cols);
        Self { value, grad }
    }

    pub fn zero_grad(&mut self) {
        self.grad.data.iter_mut().for_each(|g| *g = 0.0);
    }

    pub fn len(&self) -> usize {
        self.value.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.data.is_empty()
    }
}

/// Common interface for network layers.
///
/// Inputs and outputs are batches with one sample per row. `Shape` values
/// describe a single sample as `(channels, height, width)`.
pub trait Layer {
    /// Short layer name used in model summaries.
    fn name(&self) -> &'static str;

    /// Per-sample output shape for the given per-sample input shape.
    fn output_shape(&self, input: Shape) -> Shape;

    /// Forward pass used during inference.
    fn forward(&self, x: &Matrix) -> Result<Matrix>;

    /// Forward pass used during training, allowing the layer to cache values
    /// required for the backward pass.
    fn forward_train(&mut self, x: &Matrix) -> Result<Matrix>;

    /// Backward pass returning gradient with respect to the layer input.
    /// Parameter gradients are accumulated into the layer's [`Param`]s.
    fn backward(&mut self, grad_out: &Matrix) -> Matrix;

    /// Zero any accumulated gradients.
    fn zero_grad(&mut self) {
        for p in self.parameters() {
            p.zero_grad();
        }
    }

    /// Mutable references to trainable parameters, in a stable order.
    fn parameters(&mut self) -> Vec<&mut Param> {
        Vec::new()
    }
}

/// Per-sample tensor shape in channel-major order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl Shape {
    pub fn new(channels: usize, height: usize, width: usize) -> Self {
        Self {
            channels,
            height,
            width,
        }
    }

    /// A flat vector of `len` features.
    pub fn flat(len: usize) -> Self {
        Self::new(1, 1, len)
    }

    pub fn len(&self) -> usize {
        self.channels * self.height * self.width
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.channels == 1 && self.height == 1 {
            write!(f, "[{}]", self.width)
        } else {
            write!(f, "[{}, {}, {}]", self.channels, self.height, self.width)
        }
    }
}

/// Check that a batch carries `expected` features per row.
pub(crate) fn check_features(layer: &str, x: &Matrix, expected: usize) -> Result<()> {
    if x.cols != expected {
        return Err(crate::error::Error::Shape(format!(
            "{layer} expects {expected} features per sample, got {}",
            x.cols
        )));
    }
    Ok(())
}
