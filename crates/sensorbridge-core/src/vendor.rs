//! Vendor adapter contract and request/response types.
//!
//! Every vendor integration implements [`VendorSource`]: it fetches one
//! response envelope per call, turns it into [`RawObservation`]s and knows how
//! to normalize its own records into tags and reading groups.
//!
//! # Failure taxonomy
//!
//! | Kind | Raised when | Fatal to |
//! |------|-------------|----------|
//! | `Transport` | network failure or timeout | that request |
//! | `Status` | non-2xx response | that request |
//! | `Decode` | malformed or incomplete envelope JSON | that request |
//! | `InvalidRequest` | adapter misconfiguration detected before sending | that request |
//! | `Internal` | a query task died before reporting | that target |
//!
//! Nothing here retries; the scheduler decides whether to poll again.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::http_client::HttpError;
use crate::{DeviceId, NormalizedObservation, RawObservation, VendorId};

/// What a single vendor query asks for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryTarget {
    All,
    Device(DeviceId),
}

impl Display for QueryTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("<all>"),
            Self::Device(device) => f.write_str(device.as_str()),
        }
    }
}

/// How a vendor API expects devices to be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// One request per configured device identifier.
    PerDevice,
    /// One listing request; device filtering happens locally.
    ListAll,
}

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorErrorKind {
    Transport { timeout: bool },
    Status { received: u16, expected: u16 },
    Decode,
    InvalidRequest,
    Internal,
}

/// Structured vendor error reported per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorError {
    vendor: VendorId,
    kind: VendorErrorKind,
    message: String,
}

impl VendorError {
    pub fn transport(vendor: VendorId, error: &HttpError) -> Self {
        Self {
            vendor,
            kind: VendorErrorKind::Transport {
                timeout: error.is_timeout(),
            },
            message: format!("transport error: {}", error.message()),
        }
    }

    pub fn status(vendor: VendorId, received: u16, expected: u16) -> Self {
        Self {
            vendor,
            kind: VendorErrorKind::Status { received, expected },
            message: format!(
                "API responded with status-code {received}, expected {expected}"
            ),
        }
    }

    pub fn decode(vendor: VendorId, message: impl Into<String>) -> Self {
        Self {
            vendor,
            kind: VendorErrorKind::Decode,
            message: format!("failed to decode response: {}", message.into()),
        }
    }

    pub fn invalid_request(vendor: VendorId, message: impl Into<String>) -> Self {
        Self {
            vendor,
            kind: VendorErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn internal(vendor: VendorId, message: impl Into<String>) -> Self {
        Self {
            vendor,
            kind: VendorErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn vendor(&self) -> VendorId {
        self.vendor
    }

    pub const fn kind(&self) -> VendorErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            VendorErrorKind::Transport { .. } => "vendor.transport",
            VendorErrorKind::Status { .. } => "vendor.status",
            VendorErrorKind::Decode => "vendor.decode",
            VendorErrorKind::InvalidRequest => "vendor.invalid_request",
            VendorErrorKind::Internal => "vendor.internal",
        }
    }
}

impl Display for VendorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} ({})", self.vendor, self.message, self.code())
    }
}

impl std::error::Error for VendorError {}

/// Vendor adapter contract.
///
/// Implementations are shared between concurrently running query tasks, so
/// they must be `Send + Sync` and must not mutate state while fetching.
pub trait VendorSource: Send + Sync {
    /// Vendor identifier, also used as the measurement name.
    fn id(&self) -> VendorId;

    /// Whether devices are queried one by one or listed in bulk.
    fn query_mode(&self) -> QueryMode;

    /// Performs exactly one request for `target`.
    ///
    /// # Errors
    ///
    /// Returns [`VendorError`] for transport failures, non-success statuses
    /// and envelopes that do not decode.
    fn fetch<'a>(
        &'a self,
        target: QueryTarget,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawObservation>, VendorError>> + Send + 'a>>;

    /// Turns one raw record into base tags and reading groups. Total: never fails.
    fn normalize(&self, observation: &RawObservation) -> NormalizedObservation;
}
