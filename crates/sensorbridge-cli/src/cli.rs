//! CLI argument definitions for sensorbridge.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `run` | Poll every configured input and print metric points |
//! | `networks` | List the sensor networks of each iMonnit account |
//! | `sample-config` | Print an annotated configuration file |
//! | `vendors` | List supported vendors |
//!
//! # Examples
//!
//! ```bash
//! # Single poll cycle, InfluxDB line protocol on stdout
//! sensorbridge run --config sensorbridge.yaml --once
//!
//! # Poll forever, one JSON object per point
//! sensorbridge run --config sensorbridge.yaml --format json
//!
//! # More logging
//! SENSORBRIDGE_LOG=sensorbridge_core=debug sensorbridge run --config sensorbridge.yaml
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Sensorbridge - IoT vendor API poller
///
/// Polls HOBOlink and iMonnit accounts and prints the readings as tagged
/// metric points. Logs go to stderr; stdout carries only metrics.
#[derive(Debug, Parser)]
#[command(name = "sensorbridge", author, version, about = "IoT vendor API poller")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Output format for metric points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// InfluxDB line protocol.
    Line,
    /// One JSON object per line.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll the configured inputs.
    ///
    /// # Examples
    ///
    ///   sensorbridge run --config sensorbridge.yaml
    ///   sensorbridge run --config sensorbridge.yaml --once --format json
    Run(RunArgs),

    /// List iMonnit sensor networks for every configured iMonnit input.
    Networks(ConfigArgs),

    /// Print an annotated sample configuration.
    SampleConfig,

    /// List supported vendors with their default servers.
    Vendors,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Path of the YAML configuration file.
    #[arg(long, short, env = "SENSORBRIDGE_CONFIG")]
    pub config: PathBuf,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Run a single poll cycle and exit.
    #[arg(long, default_value_t = false)]
    pub once: bool,

    /// Output format for metric points.
    #[arg(long, value_enum, default_value_t = OutputFormat::Line)]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_defaults() {
        let cli = Cli::try_parse_from(["sensorbridge", "run", "--config", "sb.yaml"]).expect("valid args");

        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.config.config, PathBuf::from("sb.yaml"));
        assert!(!args.once);
        assert_eq!(args.format, OutputFormat::Line);
    }

    #[test]
    fn parses_once_and_json_format() {
        let cli = Cli::try_parse_from(["sensorbridge", "run", "-c", "sb.yaml", "--once", "--format", "json"])
            .expect("valid args");

        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert!(args.once);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn sample_config_takes_no_arguments() {
        let cli = Cli::try_parse_from(["sensorbridge", "sample-config"]).expect("valid args");
        assert!(matches!(cli.command, Command::SampleConfig));
    }

    #[test]
    fn rejects_unknown_format() {
        let result = Cli::try_parse_from(["sensorbridge", "run", "-c", "sb.yaml", "--format", "csv"]);
        assert!(result.is_err());
    }
}
