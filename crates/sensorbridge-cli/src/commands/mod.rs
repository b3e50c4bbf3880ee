mod networks;
mod poll;
mod vendors;

use std::process::ExitCode;

use sensorbridge_core::Config;

use crate::cli::{Cli, Command, ConfigArgs};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<ExitCode, CliError> {
    match &cli.command {
        Command::Run(args) => poll::run(args).await,
        Command::Networks(args) => networks::run(args).await,
        Command::SampleConfig => vendors::sample_config(),
        Command::Vendors => vendors::list(),
    }
}

fn load_config(args: &ConfigArgs) -> Result<Config, CliError> {
    let config = Config::load(&args.config)?;
    tracing::debug!(
        path = %args.config.display(),
        inputs = config.inputs.len(),
        interval = ?config.interval,
        "configuration loaded"
    );
    Ok(config)
}
