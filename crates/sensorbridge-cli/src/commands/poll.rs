use std::future::Future;
use std::io;
use std::process::ExitCode;
use std::time::Duration;

use sensorbridge_core::{CollectError, Collector};
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::cli::{OutputFormat, RunArgs};
use crate::error::CliError;
use crate::output::{write_points, PointBuffer};

use super::load_config;

pub async fn run(args: &RunArgs) -> Result<ExitCode, CliError> {
    let config = load_config(&args.config)?;
    let collectors = config
        .inputs
        .iter()
        .map(Collector::from_input)
        .collect::<Result<Vec<_>, _>>()?;

    if args.once {
        return match cycle(&collectors, args.format).await? {
            Some(failure) => Err(failure.into()),
            None => Ok(ExitCode::SUCCESS),
        };
    }

    info!(inputs = collectors.len(), interval = ?config.interval, "polling started");
    poll_until(&collectors, config.interval, args.format, shutdown_signal()).await
}

/// Polls on every tick until `shutdown` resolves. The shutdown future is
/// created once, so a signal that arrives during a cycle ends the loop right
/// after that cycle.
async fn poll_until(
    collectors: &[Collector],
    interval: Duration,
    format: OutputFormat,
    shutdown: impl Future<Output = ()>,
) -> Result<ExitCode, CliError> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut shutdown = std::pin::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("shutdown requested");
                return Ok(ExitCode::SUCCESS);
            }
            _ = ticker.tick() => {
                if let Some(failure) = cycle(collectors, format).await? {
                    error!(error = %failure, "poll cycle produced no data for an input");
                }
            }
        }
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(%error, "cannot listen for ctrl-c; polling until killed");
        std::future::pending::<()>().await;
    }
}

/// Gathers every input once and writes the points. Returns the first input
/// whose targets all failed; points from the other inputs are still written.
async fn cycle(collectors: &[Collector], format: OutputFormat) -> Result<Option<CollectError>, CliError> {
    let buffer = PointBuffer::new();
    let mut first_failure = None;

    for collector in collectors {
        if let Err(failure) = collector.gather(&buffer).await {
            first_failure.get_or_insert(failure);
        }
    }

    let stdout = io::stdout();
    write_points(&mut stdout.lock(), &buffer.take(), format)?;

    Ok(first_failure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_requested_between_ticks_stops_the_loop() {
        let shutdown = tokio::time::sleep(Duration::from_millis(50));

        let stopped = tokio::time::timeout(
            Duration::from_secs(5),
            poll_until(&[], Duration::from_millis(5), OutputFormat::Line, shutdown),
        )
        .await
        .expect("loop must stop once the shutdown future resolves");

        assert!(stopped.is_ok());
    }

    #[tokio::test]
    async fn pending_shutdown_is_seen_before_the_next_tick() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        tx.send(()).expect("receiver alive");
        let shutdown = async move {
            let _ = rx.await;
        };

        let stopped = tokio::time::timeout(
            Duration::from_secs(5),
            poll_until(&[], Duration::from_secs(3600), OutputFormat::Json, shutdown),
        )
        .await
        .expect("an already requested shutdown ends the loop");

        assert!(stopped.is_ok());
    }
}
