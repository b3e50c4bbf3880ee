//! Concurrent per-device querying with a join barrier.
//!
//! Every target gets its own tokio task. All tasks are spawned before the
//! first one is awaited, and [`fan_out`] only returns once each of them has
//! finished. Each task's result is kept with its target, so a partial failure
//! is visible to the caller instead of being dropped.

use std::future::Future;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::vendor::{QueryTarget, VendorError};
use crate::{DeviceId, VendorId};

/// Outcome of the query for one target.
#[derive(Debug, Clone)]
pub struct TargetOutcome<T> {
    pub target: QueryTarget,
    pub result: Result<T, VendorError>,
}

/// Per-target outcomes of a fan-out, in the order the targets were given.
#[derive(Debug, Clone)]
pub struct FanOutReport<T> {
    outcomes: Vec<TargetOutcome<T>>,
}

impl<T> FanOutReport<T> {
    pub fn outcomes(&self) -> &[TargetOutcome<T>] {
        &self.outcomes
    }

    pub fn into_outcomes(self) -> Vec<TargetOutcome<T>> {
        self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.result.is_ok()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&QueryTarget, &VendorError)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|error| (&outcome.target, error)))
    }

    pub fn failure_count(&self) -> usize {
        self.len() - self.success_count()
    }

    pub fn all_failed(&self) -> bool {
        !self.is_empty() && self.success_count() == 0
    }
}

/// Targets for a set of configured devices; no devices means one query for all.
pub fn targets_for(devices: &[DeviceId]) -> Vec<QueryTarget> {
    if devices.is_empty() {
        return vec![QueryTarget::All];
    }

    devices.iter().cloned().map(QueryTarget::Device).collect()
}

/// Runs `query` once per target concurrently and waits for every task.
pub async fn fan_out<T, F, Fut>(vendor: VendorId, targets: Vec<QueryTarget>, query: F) -> FanOutReport<T>
where
    T: Send + 'static,
    F: Fn(QueryTarget) -> Fut,
    Fut: Future<Output = Result<T, VendorError>> + Send + 'static,
{
    let handles: Vec<(QueryTarget, JoinHandle<Result<T, VendorError>>)> = targets
        .into_iter()
        .map(|target| {
            let handle = tokio::spawn(query(target.clone()));
            (target, handle)
        })
        .collect();

    debug!(vendor = %vendor, tasks = handles.len(), "fan-out started");

    let mut outcomes = Vec::with_capacity(handles.len());
    for (target, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(join_error) => Err(VendorError::internal(
                vendor,
                format!("query task for '{target}' did not complete: {join_error}"),
            )),
        };

        if let Err(error) = &result {
            warn!(vendor = %vendor, query = %target, error = %error, "query failed");
        }

        outcomes.push(TargetOutcome { target, result });
    }

    FanOutReport { outcomes }
}
