use std::collections::BTreeMap;

use crate::{DecodedReading, DeviceId, ReadingGroup, TagSet};

/// Reading payload as delivered by a vendor.
#[derive(Debug, Clone, PartialEq)]
pub enum RawReading {
    /// Free-form text that must be classified by the reading decoder.
    Text(String),
    /// Values the vendor already reports as numbers with units.
    Numeric(Vec<DecodedReading>),
}

/// One vendor record, decoded from a response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub device_id: DeviceId,
    pub name: String,
    pub reading: RawReading,
    pub metadata: BTreeMap<String, String>,
}

impl RawObservation {
    pub fn new(device_id: DeviceId, name: impl Into<String>, reading: RawReading) -> Self {
        Self {
            device_id,
            name: name.into(),
            reading,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

/// Vendor-neutral shape of an observation: base tags plus reading groups.
///
/// Each group becomes one metric point sharing the base tags.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedObservation {
    pub tags: TagSet,
    pub groups: Vec<ReadingGroup>,
}
