use indicatif::ProgressBar;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::data::dataloader::batch_indices;
use crate::error::{Error, Result};
use crate::logging::Callback;
use crate::math::Matrix;
use crate::models::Sequential;
use crate::optim::{Loss, Optimizer};
use crate::tensor::Tensor;
use crate::util::logging::log_epoch;

/// Loss and accuracy recorded at the end of one epoch.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EpochMetrics {
    /// 1-based epoch number.
    pub epoch: usize,
    pub loss: f32,
    pub accuracy: f32,
    pub val_loss: Option<f32>,
    pub val_accuracy: Option<f32>,
}

/// Per-epoch metrics collected by [`Model::fit`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct History {
    pub epochs: Vec<EpochMetrics>,
}

impl History {
    pub fn last(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }

    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }
}

/// Options for a [`Model::fit`] run.
#[derive(Clone, Copy, Debug)]
pub struct FitOptions {
    pub batch_size: usize,
    pub epochs: usize,
    /// Reshuffle the training indices before every epoch.
    pub shuffle: bool,
}

/// A layer stack together with the optimizer and loss used to train it.
///
/// Samples are accepted as tensors of shape `[n, height, width, channels]`
/// and fed to the network in channel-major order.
pub struct Model {
    net: Sequential,
    input_shape: Vec<usize>,
    optimizer: Option<Box<dyn Optimizer>>,
    loss: Option<Box<dyn Loss>>,
    rng: StdRng,
}

impl Model {
    /// Wrap `net`, which consumes samples shaped `input_shape`
    /// (`[height, width, channels]`). `rng` drives batch shuffling.
    pub fn new(net: Sequential, input_shape: Vec<usize>, rng: StdRng) -> Self {
        Self {
            net,
            input_shape,
            optimizer: None,
            loss: None,
            rng,
        }
    }

    /// Configure the model for training by providing an optimizer and loss
    /// function.
    pub fn compile<O, L>(&mut self, optimizer: O, loss: L)
    where
        O: Optimizer + 'static,
        L: Loss + 'static,
    {
        self.optimizer = Some(Box::new(optimizer));
        self.loss = Some(Box::new(loss));
    }

    pub fn is_compiled(&self) -> bool {
        self.optimizer.is_some() && self.loss.is_some()
    }

    pub fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    /// Width of the last layer's output.
    pub fn output_units(&self) -> usize {
        self.net.output_shape().len()
    }

    /// Name of the final layer, e.g. `softmax`.
    pub fn output_activation(&self) -> Option<&'static str> {
        self.net.last_layer_name()
    }

    /// One line per layer with its output shape.
    pub fn summary(&self) -> Vec<String> {
        self.net.summary()
    }

    /// Train for `opts.epochs` epochs on `x` with one-hot targets `y`.
    ///
    /// When `validation` is given the model is evaluated on it after every
    /// epoch. Each epoch is logged, advances the progress bar and is
    /// reported to every callback.
    pub fn fit(
        &mut self,
        x: &Tensor,
        y: &Matrix,
        opts: FitOptions,
        validation: Option<(&Tensor, &Matrix)>,
        callbacks: &mut [&mut dyn Callback],
    ) -> Result<History> {
        if opts.batch_size == 0 {
            return Err(Error::Config("batch size must be at least 1".into()));
        }
        self.check_targets(x, y)?;
        if let Some((vx, vy)) = validation {
            self.check_targets(vx, vy)?;
        }
        let inputs = self.to_batch(x)?;

        for cb in callbacks.iter_mut() {
            cb.on_train_begin();
        }
        let pb = ProgressBar::new(opts.epochs as u64);
        let mut history = History::default();

        for epoch in 1..=opts.epochs {
            let mut loss_sum = 0.0f32;
            let mut correct = 0usize;
            let batches = batch_indices(inputs.rows, opts.batch_size, opts.shuffle, &mut self.rng);
            for idx in &batches {
                let xb = inputs.select_rows(idx);
                let yb = y.select_rows(idx);
                let (loss, hits) = self.train_batch(&xb, &yb)?;
                loss_sum += loss * idx.len() as f32;
                correct += hits;
            }
            let n = inputs.rows.max(1) as f32;
            let mut metrics = EpochMetrics {
                epoch,
                loss: loss_sum / n,
                accuracy: correct as f32 / n,
                val_loss: None,
                val_accuracy: None,
            };
            if let Some((vx, vy)) = validation {
                let (vl, va) = self.evaluate(vx, vy, opts.batch_size)?;
                metrics.val_loss = Some(vl);
                metrics.val_accuracy = Some(va);
            }

            log_epoch(epoch, opts.epochs, &metrics);
            pb.set_message(format!("loss {:.4} acc {:.4}", metrics.loss, metrics.accuracy));
            pb.inc(1);
            for cb in callbacks.iter_mut() {
                cb.on_epoch_end(&metrics);
            }
            history.epochs.push(metrics);
        }
        pb.finish_and_clear();
        for cb in callbacks.iter_mut() {
            cb.on_train_end();
        }
        Ok(history)
    }

    /// Mean loss and accuracy of the model on `x` against one-hot `y`.
    pub fn evaluate(&self, x: &Tensor, y: &Matrix, batch_size: usize) -> Result<(f32, f32)> {
        self.check_targets(x, y)?;
        let loss_fn = self
            .loss
            .as_ref()
            .ok_or_else(|| Error::Config("model is not compiled".into()))?;
        let pred = self.predict(x, batch_size)?;
        if pred.rows == 0 {
            return Ok((0.0, 0.0));
        }
        let loss = loss_fn.loss(&pred, y);
        let hits = count_hits(&pred, y);
        Ok((loss, hits as f32 / pred.rows as f32))
    }

    /// Class probabilities, one row per sample.
    pub fn predict(&self, x: &Tensor, batch_size: usize) -> Result<Matrix> {
        if batch_size == 0 {
            return Err(Error::Config("batch size must be at least 1".into()));
        }
        let inputs = self.to_batch(x)?;
        let units = self.output_units();
        let mut out = Matrix::zeros(inputs.rows, units);
        let mut start = 0;
        while start < inputs.rows {
            let end = (start + batch_size).min(inputs.rows);
            let idx: Vec<usize> = (start..end).collect();
            let probs = self.net.forward(&inputs.select_rows(&idx))?;
            out.data[start * units..end * units].copy_from_slice(&probs.data);
            start = end;
        }
        Ok(out)
    }

    /// Most likely class index for every sample.
    pub fn predict_classes(&self, x: &Tensor, batch_size: usize) -> Result<Vec<usize>> {
        Ok(self.predict(x, batch_size)?.argmax_rows())
    }

    fn train_batch(&mut self, xb: &Matrix, yb: &Matrix) -> Result<(f32, usize)> {
        let (optimizer, loss_fn) = match (self.optimizer.as_mut(), self.loss.as_ref()) {
            (Some(o), Some(l)) => (o, l),
            _ => return Err(Error::Config("model is not compiled".into())),
        };
        self.net.zero_grad();
        let out = self.net.forward_train(xb)?;
        let loss = loss_fn.loss(&out, yb);
        let grad = loss_fn.grad(&out, yb);
        self.net.backward(&grad);
        let mut params = self.net.parameters();
        optimizer.step(&mut params);
        Ok((loss, count_hits(&out, yb)))
    }

    fn check_targets(&self, x: &Tensor, y: &Matrix) -> Result<()> {
        if x.len() != y.rows {
            return Err(Error::LengthMismatch {
                samples: x.len(),
                labels: y.rows,
            });
        }
        if y.cols != self.output_units() {
            return Err(Error::Shape(format!(
                "targets have {} columns, model outputs {}",
                y.cols,
                self.output_units()
            )));
        }
        Ok(())
    }

    /// Convert `[n, h, w, c]` samples into channel-major matrix rows.
    fn to_batch(&self, x: &Tensor) -> Result<Matrix> {
        if x.item_shape() != self.input_shape.as_slice() {
            return Err(Error::Shape(format!(
                "model expects samples shaped {:?}, got {:?}",
                self.input_shape,
                x.item_shape()
            )));
        }
        let (h, w, c) = match self.input_shape.as_slice() {
            [h, w, c] => (*h, *w, *c),
            _ => return Ok(x.to_matrix()),
        };
        if c == 1 {
            return Ok(x.to_matrix());
        }
        let mut m = Matrix::zeros(x.len(), h * w * c);
        for n in 0..x.len() {
            let item = x.item(n);
            let row = &mut m.data[n * h * w * c..(n + 1) * h * w * c];
            for i in 0..h {
                for j in 0..w {
                    for k in 0..c {
                        row[k * h * w + i * w + j] = item[(i * w + j) * c + k];
                    }
                }
            }
        }
        Ok(m)
    }
}

fn count_hits(pred: &Matrix, target: &Matrix) -> usize {
    pred.argmax_rows()
        .into_iter()
        .zip(target.argmax_rows())
        .filter(|(p, t)| p == t)
        .count()
}
