use crate::error::Result;
use crate::layers::{Layer, Param, Shape};
use crate::math::Matrix;

/// A simple container that applies layers sequentially.
pub struct Sequential {
    /// Ordered list of layers.
    pub layers: Vec<Box<dyn Layer>>,
    input: Shape,
}

impl Sequential {
    /// Create an empty sequential model taking samples of shape `input`.
    pub fn new(input: Shape) -> Self {
        Self {
            layers: Vec::new(),
            input,
        }
    }

    /// Append a layer to the sequence.
    pub fn add_layer(&mut self, layer: Box<dyn Layer>) {
        self.layers.push(layer);
    }

    pub fn input_shape(&self) -> Shape {
        self.input
    }

    /// Per-sample shape produced by the last layer.
    pub fn output_shape(&self) -> Shape {
        self.layers
            .iter()
            .fold(self.input, |shape, layer| layer.output_shape(shape))
    }

    /// Name of the last layer, if any.
    pub fn last_layer_name(&self) -> Option<&'static str> {
        self.layers.last().map(|l| l.name())
    }

    /// One `name -> output shape` line per layer.
    pub fn summary(&self) -> Vec<String> {
        let mut shape = self.input;
        self.layers
            .iter()
            .map(|layer| {
                shape = layer.output_shape(shape);
                format!("{:<12} {}", layer.name(), shape)
            })
            .collect()
    }

    /// Forward pass used during inference.
    pub fn forward(&self, x: &Matrix) -> Result<Matrix> {
        let mut out = x.clone();
        for layer in &self.layers {
            out = layer.forward(&out)?;
        }
        Ok(out)
    }

    /// Forward pass used during training.
    pub fn forward_train(&mut self, x: &Matrix) -> Result<Matrix> {
        let mut out = x.clone();
        for layer in self.layers.iter_mut() {
            out = layer.forward_train(&out)?;
        }
        Ok(out)
    }

    /// Backward pass returning gradient with respect to the input.
    pub fn backward(&mut self, grad_out: &Matrix) -> Matrix {
        let mut grad = grad_out.clone();
        for layer in self.layers.iter_mut().rev() {
            grad = layer.backward(&grad);
        }
        grad
    }

    /// Zero any accumulated gradients in all layers.
    pub fn zero_grad(&mut self) {
        for layer in self.layers.iter_mut() {
            layer.zero_grad();
        }
    }

    /// Every trainable parameter, layer by layer.
    pub fn parameters(&mut self) -> Vec<&mut Param> {
        self.layers
            .iter_mut()
            .flat_map(|layer| layer.parameters())
            .collect()
    }
}
