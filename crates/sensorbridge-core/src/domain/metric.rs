use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::UtcDateTime;

/// Tag key/value pairs. Keys are unique; iteration order is sorted.
pub type TagSet = BTreeMap<String, String>;

/// Field key/value pairs of a metric point.
pub type FieldSet = BTreeMap<String, FieldValue>;

/// Numeric field value with an explicit marker for readings that could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "value")]
pub enum FieldValue {
    Measured(f64),
    Unavailable,
}

impl FieldValue {
    /// Parse a numeric token; anything that is not a finite number is unavailable.
    pub fn parse(token: &str) -> Self {
        match token.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Self::Measured(value),
            _ => Self::Unavailable,
        }
    }

    pub const fn as_f64(self) -> Option<f64> {
        match self {
            Self::Measured(value) => Some(value),
            Self::Unavailable => None,
        }
    }

    pub const fn is_unavailable(self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Self::Measured(value)
        } else {
            Self::Unavailable
        }
    }
}

/// One named value extracted from a vendor reading, with its unit symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedReading {
    pub field: String,
    pub value: FieldValue,
    pub unit: String,
}

impl DecodedReading {
    pub fn new(field: impl Into<String>, value: FieldValue, unit: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value,
            unit: unit.into(),
        }
    }
}

/// Readings that end up in the same metric point.
///
/// `unit_tag` is added as a `unit` tag on top of the observation's base tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingGroup {
    pub unit_tag: Option<String>,
    pub readings: Vec<DecodedReading>,
}

impl ReadingGroup {
    pub fn tagged(unit_tag: impl Into<String>, readings: Vec<DecodedReading>) -> Self {
        Self {
            unit_tag: Some(unit_tag.into()),
            readings,
        }
    }

    pub fn untagged(readings: Vec<DecodedReading>) -> Self {
        Self {
            unit_tag: None,
            readings,
        }
    }

    pub fn fields(&self) -> FieldSet {
        self.readings
            .iter()
            .map(|reading| (reading.field.clone(), reading.value))
            .collect()
    }
}

/// Generic tagged, timestamped set of numeric fields handed to an accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub measurement: String,
    pub tags: TagSet,
    pub fields: FieldSet,
    pub timestamp: UtcDateTime,
}

impl MetricPoint {
    pub fn new(
        measurement: impl Into<String>,
        fields: FieldSet,
        tags: TagSet,
        timestamp: UtcDateTime,
    ) -> Self {
        Self {
            measurement: measurement.into(),
            tags,
            fields,
            timestamp,
        }
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn field(&self, key: &str) -> Option<FieldValue> {
        self.fields.get(key).copied()
    }

    /// Fields with a measured value, skipping unavailable ones.
    pub fn measured_fields(&self) -> impl Iterator<Item = (&str, f64)> {
        self.fields
            .iter()
            .filter_map(|(key, value)| value.as_f64().map(|number| (key.as_str(), number)))
    }
}
