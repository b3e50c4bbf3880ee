//! # Sensorbridge Core
//!
//! Vendor adapters and reading normalization for the sensorbridge telemetry
//! poller.
//!
//! ## Overview
//!
//! Two IoT sensor vendors report the same physical quantities in very
//! different shapes. This crate polls both and turns every record into tagged
//! metric points:
//!
//! - **Vendor adapters** for HOBOlink (POST, one request per logger) and
//!   iMonnit (GET, one listing per account)
//! - **Reading decoder** for free-form reading strings such as
//!   `"12.3 kWh, Avg 1.1 A, Max 2.4 A, Min 0.2 A"` or `"-4.2°C"`
//! - **Tag hierarchy extraction** from 9-part delimited sensor names
//! - **Concurrent fan-out** over configured devices with per-device results
//! - **Metric emission** into any [`Accumulator`]
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | HOBOlink and iMonnit adapters |
//! | [`collector`] | One configured input and its poll cycle |
//! | [`config`] | YAML configuration |
//! | [`decode`] | Reading decoder |
//! | [`domain`] | Device ids, observations, metric points, timestamps |
//! | [`emitter`] | Accumulator contract and metric emitter |
//! | [`error`] | Validation and configuration errors |
//! | [`fanout`] | Concurrent per-target querying |
//! | [`http_client`] | HTTP client abstraction |
//! | [`source`] | Vendor identifiers |
//! | [`tags`] | Tag hierarchy extractor |
//! | [`vendor`] | Vendor adapter trait and error taxonomy |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sensorbridge_core::{Collector, Config, MemoryAccumulator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("sensorbridge.yaml".as_ref())?;
//!     let accumulator = MemoryAccumulator::new();
//!
//!     for input in &config.inputs {
//!         let collector = Collector::from_input(input)?;
//!         let report = collector.gather(&accumulator).await?;
//!         println!("{}: {} points", report.vendor, report.points);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Collector      │  gather(&dyn Accumulator)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Fan-out        │────▶│ Vendor Adapter   │
//! │  (join barrier) │     │ + HTTP Client    │
//! └────────┬────────┘     └──────────────────┘
//!          │ RawObservation
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Reading Decoder │     │ Tag Extractor    │
//! └────────┬────────┘     └────────┬─────────┘
//!          └──────────┬────────────┘
//!                     ▼ NormalizedObservation
//!          ┌──────────────────┐
//!          │  Metric Emitter  │──▶ Accumulator
//!          └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Request failures are structured [`VendorError`]s; a value that does not
//! parse is never an error and becomes [`FieldValue::Unavailable`]:
//!
//! ```rust
//! use sensorbridge_core::{VendorError, VendorErrorKind};
//!
//! fn describe(error: &VendorError) -> &'static str {
//!     match error.kind() {
//!         VendorErrorKind::Transport { timeout: true } => "timed out",
//!         VendorErrorKind::Transport { .. } => "unreachable",
//!         VendorErrorKind::Status { .. } => "rejected",
//!         VendorErrorKind::Decode => "unexpected payload",
//!         VendorErrorKind::InvalidRequest => "misconfigured",
//!         VendorErrorKind::Internal => "crashed",
//!     }
//! }
//! ```

pub mod adapters;
pub mod collector;
pub mod config;
pub mod decode;
pub mod domain;
pub mod emitter;
pub mod error;
pub mod fanout;
pub mod http_client;
pub mod source;
pub mod tags;
pub mod vendor;

// Adapter implementations
pub use adapters::{HobolinkAdapter, ImonnitAdapter};

// Poll cycle
pub use collector::{CollectError, Collector, GatherReport, TargetFailure};

// Configuration
pub use config::{Config, InputConfig};

// Reading decoder
pub use decode::{decode_reading, ReadingKind};

// Domain models
pub use domain::{
    DecodedReading, DeviceId, FieldSet, FieldValue, MetricPoint, NormalizedObservation,
    RawObservation, RawReading, ReadingGroup, TagSet, UtcDateTime,
};

// Emission
pub use emitter::{Accumulator, MemoryAccumulator, MetricEmitter};

// Error types
pub use error::{ConfigError, ValidationError};

// Fan-out
pub use fanout::{fan_out, targets_for, FanOutReport, TargetOutcome};

// HTTP client types
pub use http_client::{
    CannedHttpClient, HttpClient, HttpError, HttpErrorKind, HttpMethod, HttpRequest, HttpResponse,
    ReqwestHttpClient,
};

// Vendor identifiers
pub use source::VendorId;

// Tag hierarchy
pub use tags::{TagExtractor, TagHierarchy};

// Vendor contract
pub use vendor::{QueryMode, QueryTarget, VendorError, VendorErrorKind, VendorSource};
