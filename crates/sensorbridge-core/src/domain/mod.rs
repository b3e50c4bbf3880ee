//! # Domain Models
//!
//! Vendor-neutral types shared by the adapters, the reading decoder and the
//! metric emitter.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`DeviceId`] | Validated sensor/logger identifier |
//! | [`RawObservation`] | One vendor record before normalization |
//! | [`NormalizedObservation`] | Base tags plus reading groups |
//! | [`DecodedReading`] | Named value + unit extracted from a reading |
//! | [`FieldValue`] | Measured number or explicit `Unavailable` |
//! | [`MetricPoint`] | Tagged, timestamped field set handed to an accumulator |
//! | [`UtcDateTime`] | UTC timestamp |

mod device;
mod metric;
mod observation;
mod timestamp;

pub use device::DeviceId;
pub use metric::{DecodedReading, FieldSet, FieldValue, MetricPoint, ReadingGroup, TagSet};
pub use observation::{NormalizedObservation, RawObservation, RawReading};
pub use timestamp::UtcDateTime;
