use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Mini-batch size used by `fit`.
pub const BATCH_SIZE: usize = 32;
/// Number of training epochs per scenario.
pub const EPOCHS: usize = 128;
/// Number of output classes: `0 = real`, `1 = fake`.
pub const NUM_CLASS: usize = 2;
/// Values per feature channel in one sample.
pub const WINDOW_SIZE: usize = 64;
/// Fraction of samples held out for testing.
pub const TEST_SIZE: f64 = 0.3;

/// Run configuration loaded from a TOML or JSON file.
///
/// Missing keys fall back to the defaults above.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of training epochs.
    pub epochs: usize,
    /// Mini-batch size.
    pub batch_size: usize,
    pub window_size: usize,
    pub test_size: f64,
    /// Base seed for every random stream. `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub gan_path: PathBuf,
    pub real_path: PathBuf,
    pub straw_path: PathBuf,
    /// Directory receiving the confusion matrix heatmaps.
    pub output_dir: PathBuf,
    /// When set, per-epoch metrics are written below this directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            epochs: EPOCHS,
            batch_size: BATCH_SIZE,
            window_size: WINDOW_SIZE,
            test_size: TEST_SIZE,
            seed: None,
            gan_path: PathBuf::from("data/gan_01.0hr.csv"),
            real_path: PathBuf::from("data/real_01.5hr.csv"),
            straw_path: PathBuf::from("data/straw_01.0hr.csv"),
            output_dir: PathBuf::from("runs"),
            log_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from the given path.  Supports TOML or JSON based on
    /// the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Config = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else {
            toml::from_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot drive a training run.
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::Config("epochs must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".into()));
        }
        if self.window_size < 2 {
            return Err(Error::Config(format!(
                "window_size must be at least 2, got {}",
                self.window_size
            )));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(Error::Config(format!(
                "test_size must be within (0, 1), got {}",
                self.test_size
            )));
        }
        Ok(())
    }
}
