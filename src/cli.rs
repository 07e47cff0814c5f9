use std::path::PathBuf;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::experiment::Scenario;

pub const USAGE: &str = "Usage: evalclassifier <mode> [--config PATH] [--seed N] \
[--out-dir DIR] [--epochs N] [--log-dir DIR]\nModes: strawman | voiceover | all";

/// Scenarios selected on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    One(Scenario),
    All,
}

impl Mode {
    pub fn scenarios(&self) -> Vec<Scenario> {
        match self {
            Mode::One(s) => vec![*s],
            Mode::All => Scenario::ALL.to_vec(),
        }
    }
}

/// Parsed command line arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct CliArgs {
    pub mode: Mode,
    pub config: Option<PathBuf>,
    pub seed: Option<u64>,
    pub out_dir: Option<PathBuf>,
    pub epochs: Option<usize>,
    pub log_dir: Option<PathBuf>,
}

impl CliArgs {
    /// Overlay the flags given on the command line onto `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(dir) = &self.out_dir {
            config.output_dir = dir.clone();
        }
        if let Some(epochs) = self.epochs {
            config.epochs = epochs;
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = Some(dir.clone());
        }
    }
}

/// Parse `args` without the program name.
pub fn parse_cli<I, S>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut args = args.into_iter().map(|s| s.as_ref().to_string());
    let mode = match args.next() {
        Some(m) if m == "all" => Mode::All,
        Some(m) => Mode::One(m.parse()?),
        None => return Err(Error::Config(format!("missing mode\n{USAGE}"))),
    };
    let mut cli = CliArgs {
        mode,
        config: None,
        seed: None,
        out_dir: None,
        epochs: None,
        log_dir: None,
    };
    while let Some(flag) = args.next() {
        let mut value = || {
            args.next()
                .ok_or_else(|| Error::Config(format!("{flag} expects a value")))
        };
        match flag.as_str() {
            "--config" => cli.config = Some(PathBuf::from(value()?)),
            "--seed" => cli.seed = Some(parse_number(&flag, &value()?)?),
            "--out-dir" => cli.out_dir = Some(PathBuf::from(value()?)),
            "--epochs" => cli.epochs = Some(parse_number(&flag, &value()?)?),
            "--log-dir" => cli.log_dir = Some(PathBuf::from(value()?)),
            other => return Err(Error::Config(format!("unknown flag {other}\n{USAGE}"))),
        }
    }
    Ok(cli)
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("{flag} expects a number, got {value:?}")))
}
