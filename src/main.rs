use std::env;
use std::process::ExitCode;

use log::{error, info};

use evalclassifier::cli::{parse_cli, CliArgs, USAGE};
use evalclassifier::config::Config;
use evalclassifier::error::Result;
use evalclassifier::experiment::Experiment;
use evalclassifier::rng::seed_from_env;

fn run(cli: &CliArgs) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    if config.seed.is_none() {
        config.seed = seed_from_env();
    }
    cli.apply(&mut config);
    config.validate()?;

    let experiment = Experiment::load(config)?;
    for scenario in cli.mode.scenarios() {
        let report = experiment.run(scenario)?;
        info!(
            "{} finished: heatmap at {}",
            report.name,
            report.heatmap_path.display()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match parse_cli(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
