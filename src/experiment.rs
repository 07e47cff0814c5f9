use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use log::info;

use crate::config::{Config, NUM_CLASS};
use crate::data::{load_csv, to_categorical, train_test_split, Dataset};
use crate::error::{Error, Result};
use crate::logging::{Callback, Logger};
use crate::metrics::ConfusionMatrix;
use crate::model::{FitOptions, History};
use crate::models::cnn::build_classifier;
use crate::plot::show_confusion_matrix;
use crate::rng::rng_from_seed;
use crate::util::logging::{log_scenario_done, log_split};

/// Which synthetic source is pitted against the real recordings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    Strawman,
    Voiceover,
}

impl Scenario {
    pub const ALL: [Scenario; 2] = [Scenario::Strawman, Scenario::Voiceover];
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Strawman => write!(f, "Strawman"),
            Scenario::Voiceover => write!(f, "Voiceover"),
        }
    }
}

impl FromStr for Scenario {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "strawman" | "straw" => Ok(Scenario::Strawman),
            "voiceover" | "gan" => Ok(Scenario::Voiceover),
            other => Err(Error::Config(format!("unknown scenario {other:?}"))),
        }
    }
}

/// Outcome of one train/evaluate run.
#[derive(Clone, Debug)]
pub struct ScenarioReport {
    pub name: String,
    pub history: History,
    pub confusion: ConfusionMatrix,
    pub heatmap_path: PathBuf,
}

/// The three loaded datasets plus the run configuration.
///
/// Datasets are read once and shared read-only by every scenario.
pub struct Experiment {
    config: Config,
    gan: Dataset,
    real: Dataset,
    straw: Dataset,
}

impl Experiment {
    /// Validate `config` and load the GAN, real and strawman CSV files.
    pub fn load(config: Config) -> Result<Self> {
        config.validate()?;
        let w = config.window_size;
        let gan = load_csv(&config.gan_path, true, w)?;
        let real = load_csv(&config.real_path, false, w)?;
        let straw = load_csv(&config.straw_path, true, w)?;
        Ok(Self::from_datasets(config, gan, real, straw))
    }

    /// Build an experiment from datasets that are already in memory.
    pub fn from_datasets(config: Config, gan: Dataset, real: Dataset, straw: Dataset) -> Self {
        Self {
            config,
            gan,
            real,
            straw,
        }
    }

    /// Train a fresh classifier on a random 70/30 split of `data`, evaluate
    /// it on the held-out part and render its confusion matrix.
    ///
    /// Non-empty `data` must contain every class; a scenario whose fake or
    /// real source is empty fails with [`Error::MissingClass`].
    pub fn train_and_test(&self, name: &str, data: &Dataset) -> Result<ScenarioReport> {
        let cfg = &self.config;
        if !data.is_empty() {
            if let Some(label) = (0..NUM_CLASS).find(|c| !data.labels().contains(c)) {
                return Err(Error::MissingClass {
                    scenario: name.to_string(),
                    label,
                });
            }
        }
        let mut model = build_classifier(cfg.window_size, cfg.seed)?;

        let mut rng = rng_from_seed(cfg.seed, 4);
        let split = train_test_split(data, cfg.test_size, &mut rng)?;
        log_split(name, split.train.len(), split.test.len());

        let test_labels = split.test.labels().to_vec();
        let y_train = to_categorical(split.train.labels(), NUM_CLASS)?;
        let y_test = to_categorical(&test_labels, NUM_CLASS)?;
        let (x_train, _) = split.train.into_parts();
        let (x_test, _) = split.test.into_parts();
        let x_train = x_train.expand_dims();
        let x_test = x_test.expand_dims();

        let mut logger = match &cfg.log_dir {
            Some(dir) => Some(Logger::new(dir, name)?),
            None => None,
        };
        let mut callbacks: Vec<&mut dyn Callback> = Vec::new();
        if let Some(l) = logger.as_mut() {
            callbacks.push(l);
        }

        let opts = FitOptions {
            batch_size: cfg.batch_size,
            epochs: cfg.epochs,
            shuffle: true,
        };
        let history = model.fit(
            &x_train,
            &y_train,
            opts,
            Some((&x_test, &y_test)),
            &mut callbacks,
        )?;

        let predictions = model.predict_classes(&x_test, cfg.batch_size)?;
        let (confusion, heatmap_path) =
            show_confusion_matrix(name, &predictions, &test_labels, &cfg.output_dir)?;
        log_scenario_done(name, confusion.accuracy());

        Ok(ScenarioReport {
            name: name.to_string(),
            history,
            confusion,
            heatmap_path,
        })
    }

    /// Strawman windows against the real recordings.
    pub fn train_straw(&self) -> Result<ScenarioReport> {
        let data = Dataset::concat(&self.straw, &self.real)?;
        self.train_and_test("Strawman", &data)
    }

    /// GAN generated windows against the real recordings.
    pub fn train_voiceover(&self) -> Result<ScenarioReport> {
        let data = Dataset::concat(&self.gan, &self.real)?;
        self.train_and_test("Voiceover", &data)
    }

    pub fn run(&self, scenario: Scenario) -> Result<ScenarioReport> {
        info!("running {scenario} scenario");
        match scenario {
            Scenario::Strawman => self.train_straw(),
            Scenario::Voiceover => self.train_voiceover(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_names_round_trip() {
        for s in Scenario::ALL {
            assert_eq!(s.to_string().parse::<Scenario>().unwrap(), s);
        }
        assert!("piano".parse::<Scenario>().is_err());
    }
}
