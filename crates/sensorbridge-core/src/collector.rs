//! One configured vendor input and its poll cycle.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

use crate::adapters::{HobolinkAdapter, ImonnitAdapter};
use crate::config::InputConfig;
use crate::emitter::{Accumulator, MetricEmitter};
use crate::fanout::{fan_out, targets_for};
use crate::http_client::HttpError;
use crate::tags::TagExtractor;
use crate::vendor::{QueryMode, QueryTarget, VendorError, VendorSource};
use crate::{DeviceId, RawObservation, UtcDateTime, VendorId};

/// A target whose query failed during a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFailure {
    pub target: QueryTarget,
    pub error: VendorError,
}

/// Summary of one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatherReport {
    pub vendor: VendorId,
    pub targets: usize,
    pub observations: usize,
    pub points: usize,
    pub collected_at: UtcDateTime,
    pub failures: Vec<TargetFailure>,
}

impl GatherReport {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollectError {
    #[error("{vendor}: all {} query targets failed; first error: {}", .failures.len(), first_error(.failures))]
    AllTargetsFailed {
        vendor: VendorId,
        failures: Vec<TargetFailure>,
    },
}

fn first_error(failures: &[TargetFailure]) -> String {
    failures
        .first()
        .map(|failure| failure.error.to_string())
        .unwrap_or_default()
}

/// Polls one vendor for its configured devices and emits the results.
///
/// The adapter, and the HTTP client inside it, are built once and reused for
/// every cycle.
#[derive(Clone)]
pub struct Collector {
    source: Arc<dyn VendorSource>,
    devices: Vec<DeviceId>,
    emitter: MetricEmitter,
}

impl Collector {
    pub fn new(source: Arc<dyn VendorSource>, devices: Vec<DeviceId>) -> Self {
        let emitter = MetricEmitter::new(source.id().as_str());
        Self {
            source,
            devices,
            emitter,
        }
    }

    /// Builds the vendor adapter described by `input`.
    pub fn from_input(input: &InputConfig) -> Result<Self, HttpError> {
        let source: Arc<dyn VendorSource> = match input.vendor {
            VendorId::Hobolink => Arc::new(HobolinkAdapter::new(
                input.server(),
                input.user.as_str(),
                input.password.as_str(),
                input.token.as_str(),
                input.http_timeout,
            )?),
            VendorId::Imonnit => Arc::new(
                ImonnitAdapter::new(input.server(), input.token.as_str(), input.http_timeout)?
                    .with_extractor(TagExtractor::new(input.name_delimiter.as_str())),
            ),
        };

        Ok(Self::new(source, input.devices()))
    }

    pub fn vendor(&self) -> VendorId {
        self.source.id()
    }

    pub fn devices(&self) -> &[DeviceId] {
        &self.devices
    }

    /// Queries issued per cycle.
    pub fn targets(&self) -> Vec<QueryTarget> {
        match self.source.query_mode() {
            QueryMode::PerDevice => targets_for(&self.devices),
            QueryMode::ListAll => vec![QueryTarget::All],
        }
    }

    /// Runs one poll cycle.
    ///
    /// Every observation that arrived is emitted even when some targets
    /// failed; only a cycle in which nothing succeeded is an error.
    pub async fn gather(&self, accumulator: &dyn Accumulator) -> Result<GatherReport, CollectError> {
        let vendor = self.vendor();
        let started = Instant::now();
        let targets = self.targets();
        let target_count = targets.len();

        let source = Arc::clone(&self.source);
        let report = fan_out(vendor, targets, move |target| {
            let source = Arc::clone(&source);
            async move { source.fetch(target).await }
        })
        .await;

        let collected_at = UtcDateTime::now();
        let mut failures = Vec::new();
        let mut observations = 0;
        let mut points = 0;

        for outcome in report.into_outcomes() {
            match outcome.result {
                Ok(raw) => {
                    for observation in raw.iter().filter(|raw| self.wanted(raw)) {
                        let normalized = self.source.normalize(observation);
                        points += self.emitter.emit(&normalized, collected_at, accumulator);
                        observations += 1;
                    }
                }
                Err(error) => failures.push(TargetFailure {
                    target: outcome.target,
                    error,
                }),
            }
        }

        if !failures.is_empty() && failures.len() == target_count {
            warn!(vendor = %vendor, failures = failures.len(), "every query target failed");
            return Err(CollectError::AllTargetsFailed { vendor, failures });
        }

        info!(
            vendor = %vendor,
            targets = target_count,
            observations,
            points,
            failed = failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "poll cycle complete"
        );

        Ok(GatherReport {
            vendor,
            targets: target_count,
            observations,
            points,
            collected_at,
            failures,
        })
    }

    /// Listing vendors return every device of the account; keep the configured ones.
    fn wanted(&self, observation: &RawObservation) -> bool {
        self.source.query_mode() == QueryMode::PerDevice
            || self.devices.is_empty()
            || self.devices.contains(&observation.device_id)
    }
}
