use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::Writer;
use log::warn;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::EpochMetrics;

/// Appends per-epoch metrics to `metrics.jsonl` and `metrics.csv` inside
/// `log_dir/experiment/`.
pub struct Logger {
    dir: PathBuf,
    scenario: String,
    json: File,
    csv: Writer<File>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricRecord {
    pub scenario: String,
    pub epoch: usize,
    pub loss: f32,
    pub accuracy: f32,
    pub val_loss: Option<f32>,
    pub val_accuracy: Option<f32>,
}

impl MetricRecord {
    pub fn new(scenario: &str, m: &EpochMetrics) -> Self {
        Self {
            scenario: scenario.to_string(),
            epoch: m.epoch,
            loss: m.loss,
            accuracy: m.accuracy,
            val_loss: m.val_loss,
            val_accuracy: m.val_accuracy,
        }
    }
}

impl Logger {
    pub fn new<P: AsRef<Path>>(log_dir: P, experiment: &str) -> Result<Self> {
        let dir = log_dir.as_ref().join(experiment);
        std::fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        let json_path = dir.join("metrics.jsonl");
        let csv_path = dir.join("metrics.csv");
        let json = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&json_path)
            .map_err(|e| Error::io(&json_path, e))?;
        let csv_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&csv_path)
            .map_err(|e| Error::io(&csv_path, e))?;
        let csv = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(csv_file);
        Ok(Logger {
            dir,
            scenario: experiment.to_string(),
            json,
            csv,
        })
    }

    pub fn log<T: Serialize>(&mut self, metrics: &T) {
        match serde_json::to_string(metrics) {
            Ok(line) => {
                if let Err(e) = writeln!(self.json, "{}", line) {
                    warn!("failed to append to {}: {e}", self.dir.display());
                }
            }
            Err(e) => warn!("failed to serialize metrics: {e}"),
        }
        if let Err(e) = self.csv.serialize(metrics) {
            warn!("failed to append csv metrics: {e}");
        }
        if let Err(e) = self.csv.flush() {
            warn!("failed to flush csv metrics: {e}");
        }
    }
}

/// Hooks into the stages of [`Model::fit`](crate::model::Model::fit).
pub trait Callback {
    /// Called once before training starts.
    fn on_train_begin(&mut self) {}

    /// Called after each epoch with its metrics.
    fn on_epoch_end(&mut self, _metrics: &EpochMetrics) {}

    /// Called once after training ends.
    fn on_train_end(&mut self) {}
}

impl Callback for Logger {
    fn on_epoch_end(&mut self, metrics: &EpochMetrics) {
        let record = MetricRecord::new(&self.scenario, metrics);
        self.log(&record);
    }
}
