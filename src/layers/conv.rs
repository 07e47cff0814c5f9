use super::layer::{Layer, Param, Shape};
use crate::error::Result;
use crate::math::Matrix;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use std::fmt;

/// Padding mode for [`Conv2d`], following the usual "valid"/"same" rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Padding {
    /// No padding; the kernel only visits full windows.
    Valid,
    /// Zero padding so that `out = ceil(in / stride)`. Odd totals put the
    /// extra row/column after the input.
    Same,
}

/// 2D convolution layer using im2col and a dense weight matrix.
///
/// Each input row holds one sample laid out as `(in_channels, height, width)`.
/// The output row is `(filters, out_h, out_w)` in the same channel-major
/// order. Weights are stored as an `(in_channels * k * k) x filters` matrix
/// so the convolution reduces to one matmul over the im2col buffer.
pub struct Conv2d {
    pub w: Param,
    pub b: Param,
    input: Shape,
    filters: usize,
    kernel_size: usize,
    stride: usize,
    out_h: usize,
    out_w: usize,
    pad_top: usize,
    pad_left: usize,
    // Cached im2col buffer and batch size from the last training pass.
    last_cols: Matrix,
    last_batch: usize,
}

#[derive(Debug, PartialEq)]
pub enum ConvError {
    InputSize { features: usize, expected: usize },
    KernelTooLarge { kernel: usize, height: usize, width: usize },
    ZeroStride,
}

impl fmt::Display for ConvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvError::InputSize { features, expected } => write!(
                f,
                "Input feature count {} does not match the expected {}",
                features, expected
            ),
            ConvError::KernelTooLarge {
                kernel,
                height,
                width,
            } => write!(
                f,
                "Kernel size {} does not fit a {}x{} input without padding",
                kernel, height, width
            ),
            ConvError::ZeroStride => write!(f, "Stride must be at least 1"),
        }
    }
}

impl std::error::Error for ConvError {}

fn same_padding(input: usize, kernel: usize, stride: usize) -> (usize, usize) {
    let out = (input + stride - 1) / stride;
    if out == 0 {
        return (0, 0);
    }
    let total = ((out - 1) * stride + kernel).saturating_sub(input);
    (out, total / 2)
}

impl Conv2d {
    /// Create a new convolution layer for samples of shape `input`.
    ///
    /// Weights are drawn from `U(-0.05, 0.05)` and biases start at zero.
    pub fn new<R: Rng>(
        input: Shape,
        filters: usize,
        kernel_size: usize,
        stride: usize,
        padding: Padding,
        rng: &mut R,
    ) -> std::result::Result<Self, ConvError> {
        if stride == 0 {
            return Err(ConvError::ZeroStride);
        }
        let (out_h, pad_top, out_w, pad_left) = match padding {
            Padding::Same => {
                let (oh, pt) = same_padding(input.height, kernel_size, stride);
                let (ow, pl) = same_padding(input.width, kernel_size, stride);
                (oh, pt, ow, pl)
            }
            Padding::Valid => {
                if kernel_size > input.height || kernel_size > input.width {
                    return Err(ConvError::KernelTooLarge {
                        kernel: kernel_size,
                        height: input.height,
                        width: input.width,
                    });
                }
                (
                    (input.height - kernel_size) / stride + 1,
                    0,
                    (input.width - kernel_size) / stride + 1,
                    0,
                )
            }
        };

        let in_dim = input.channels * kernel_size * kernel_size;
        let dist = Uniform::new_inclusive(-0.05f32, 0.05f32);
        let w = Matrix::from_vec(
            in_dim,
            filters,
            (0..in_dim * filters).map(|_| dist.sample(rng)).collect(),
        );
        Ok(Self {
            w: Param::new(w),
            b: Param::new(Matrix::zeros(1, filters)),
            input,
            filters,
            kernel_size,
            stride,
            out_h,
            out_w,
            pad_top,
            pad_left,
            last_cols: Matrix::zeros(0, 0),
            last_batch: 0,
        })
    }

    fn check_input(&self, x: &Matrix) -> std::result::Result<(), ConvError> {
        if x.cols != self.input.len() {
            return Err(ConvError::InputSize {
                features: x.cols,
                expected: self.input.len(),
            });
        }
        Ok(())
    }

    /// Map an output position and kernel offset to an input coordinate, or
    /// `None` when it falls into the zero padding.
    fn source(&self, oh: usize, ow: usize, kh: usize, kw: usize) -> Option<(usize, usize)> {
        let ih = (oh * self.stride + kh) as isize - self.pad_top as isize;
        let iw = (ow * self.stride + kw) as isize - self.pad_left as isize;
        if ih >= 0 && ih < self.input.height as isize && iw >= 0 && iw < self.input.width as isize
        {
            Some((ih as usize, iw as usize))
        } else {
            None
        }
    }

    fn im2col(&self, x: &Matrix) -> Matrix {
        let batch = x.rows;
        let (in_h, in_w) = (self.input.height, self.input.width);
        let mut cols = Matrix::zeros(
            batch * self.out_h * self.out_w,
            self.input.channels * self.kernel_size * self.kernel_size,
        );
        let mut row = 0;
        for b in 0..batch {
            for oh in 0..self.out_h {
                for ow in 0..self.out_w {
                    let mut col_idx = 0;
                    for ic in 0..self.input.channels {
                        for kh in 0..self.kernel_size {
                            for kw in 0..self.kernel_size {
                                if let Some((ih, iw)) = self.source(oh, ow, kh, kw) {
                                    let idx = b * x.cols + ic * in_h * in_w + ih * in_w + iw;
                                    cols.set(row, col_idx, x.data[idx]);
                                }
                                col_idx += 1;
                            }
                        }
                    }
                    row += 1;
                }
            }
        }
        cols
    }

    fn col2im(&self, cols: &Matrix, batch: usize) -> Matrix {
        let (in_h, in_w) = (self.input.height, self.input.width);
        let mut img = Matrix::zeros(batch, self.input.len());
        let mut row = 0;
        for b in 0..batch {
            for oh in 0..self.out_h {
                for ow in 0..self.out_w {
                    let mut col_idx = 0;
                    for ic in 0..self.input.channels {
                        for kh in 0..self.kernel_size {
                            for kw in 0..self.kernel_size {
                                if let Some((ih, iw)) = self.source(oh, ow, kh, kw) {
                                    let idx = b * img.cols + ic * in_h * in_w + ih * in_w + iw;
                                    img.data[idx] += cols.get(row, col_idx);
                                }
                                col_idx += 1;
                            }
                        }
                    }
                    row += 1;
                }
            }
        }
        img
    }

    fn reshape_output(&self, out_cols: &Matrix, batch: usize) -> Matrix {
        let plane = self.out_h * self.out_w;
        let mut out = Matrix::zeros(batch, self.filters * plane);
        let mut row = 0;
        for b in 0..batch {
            for oh in 0..self.out_h {
                for ow in 0..self.out_w {
                    for oc in 0..self.filters {
                        let idx = oc * plane + oh * self.out_w + ow;
                        out.set(b, idx, out_cols.get(row, oc));
                    }
                    row += 1;
                }
            }
        }
        out
    }

    fn convolve(&self, cols: &Matrix, batch: usize) -> Matrix {
        let mut out_cols = Matrix::matmul(cols, &self.w.value);
        out_cols.add_row_broadcast(&self.b.value.data);
        self.reshape_output(&out_cols, batch)
    }

    pub fn forward_local(&mut self, x: &Matrix) -> std::result::Result<Matrix, ConvError> {
        self.check_input(x)?;
        let cols = self.im2col(x);
        let out = self.convolve(&cols, x.rows);
        self.last_cols = cols;
        self.last_batch = x.rows;
        Ok(out)
    }

    pub fn forward_inference(&self, x: &Matrix) -> std::result::Result<Matrix, ConvError> {
        self.check_input(x)?;
        let cols = self.im2col(x);
        Ok(self.convolve(&cols, x.rows))
    }

    pub fn backward_local(&mut self, grad_out: &Matrix) -> Matrix {
        let batch = self.last_batch;
        let plane = self.out_h * self.out_w;
        let mut grad_cols = Matrix::zeros(batch * plane, self.filters);
        let mut row = 0;
        for b in 0..batch {
            for oh in 0..self.out_h {
                for ow in 0..self.out_w {
                    for oc in 0..self.filters {
                        let idx = oc * plane + oh * self.out_w + ow;
                        grad_cols.set(row, oc, grad_out.get(b, idx));
                    }
                    row += 1;
                }
            }
        }
        let grad_w = Matrix::matmul(&self.last_cols.transpose(), &grad_cols);
        self.w.grad = self.w.grad.add(&grad_w);
        for (g, d) in self.b.grad.data.iter_mut().zip(grad_cols.sum_rows()) {
            *g += d;
        }
        let grad_in_cols = Matrix::matmul(&grad_cols, &self.w.value.transpose());
        self.col2im(&grad_in_cols, batch)
    }
}

impl Layer for Conv2d {
    fn name(&self) -> &'static str {
        "conv2d"
    }

    fn output_shape(&self, _input: Shape) -> Shape {
        Shape::new(self.filters, self.out_h, self.out_w)
    }

    fn forward(&self, x: &Matrix) -> Result<Matrix> {
        Ok(self.forward_inference(x)?)
    }

    fn forward_train(&mut self, x: &Matrix) -> Result<Matrix> {
        Ok(self.forward_local(x)?)
    }

    fn backward(&mut self, grad_out: &Matrix) -> Matrix {
        self.backward_local(grad_out)
    }

    fn parameters(&mut self) -> Vec<&mut Param> {
        vec![&mut self.w, &mut self.b]
    }
}
