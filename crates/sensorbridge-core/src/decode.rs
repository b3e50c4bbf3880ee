//! Classification and splitting of free-form reading strings.
//!
//! Two shapes are recognised, both taken from the iMonnit `CurrentReading`
//! field:
//!
//! - composite energy readings: `"12.3 kWh, Avg 1.1 A, Max 2.4 A, Min 0.2 A"`
//! - simple temperatures: `"-4.2°C"` (often double-encoded as `"-4.2Â°C"`)
//!
//! Every numeric token is parsed on its own. A token that does not parse, or a
//! segment that is missing, yields [`FieldValue::Unavailable`] for that field
//! and decoding carries on.

use tracing::debug;

use crate::{DecodedReading, FieldValue, ReadingGroup};

pub const ENERGY_MARKER: &str = "kWh";
pub const DEGREE_MARKER: char = '°';

const ENERGY_UNIT: &str = "kWh";
const CURRENT_UNIT: &str = "A";
const AMPS_TAG: &str = "amps";
const TEMPERATURE_UNIT: &str = "C";

/// Field names of the three current sub-readings, by segment position.
const CURRENT_FIELDS: [&str; 3] = ["average", "maximum", "minimum"];

/// Reading shape detected from the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingKind {
    Composite,
    Temperature,
}

pub fn classify(raw: &str) -> ReadingKind {
    if raw.contains(ENERGY_MARKER) {
        ReadingKind::Composite
    } else {
        ReadingKind::Temperature
    }
}

/// Decode a raw reading into one or more groups. Never returns an empty list.
pub fn decode_reading(raw: &str) -> Vec<ReadingGroup> {
    match classify(raw) {
        ReadingKind::Composite => decode_composite(raw),
        ReadingKind::Temperature => vec![decode_temperature(raw)],
    }
}

fn decode_composite(raw: &str) -> Vec<ReadingGroup> {
    let mut segments = raw.split(',');

    let primary = segments
        .next()
        .and_then(|segment| segment.trim_start().split(' ').next())
        .map(FieldValue::parse)
        .unwrap_or(FieldValue::Unavailable);
    log_unavailable(raw, "current", primary);

    let energy = ReadingGroup::tagged(
        ENERGY_UNIT,
        vec![DecodedReading::new("current", primary, ENERGY_UNIT)],
    );

    let currents = CURRENT_FIELDS
        .iter()
        .map(|field| {
            let value = segments
                .next()
                .map(labelled_value)
                .unwrap_or(FieldValue::Unavailable);
            log_unavailable(raw, field, value);
            DecodedReading::new(*field, value, CURRENT_UNIT)
        })
        .collect::<Vec<_>>();

    vec![energy, ReadingGroup::tagged(AMPS_TAG, currents)]
}

/// Value of a `"<label...> <number> <unit>"` segment: the first numeric token
/// after the label.
fn labelled_value(segment: &str) -> FieldValue {
    segment
        .split_whitespace()
        .skip(1)
        .map(FieldValue::parse)
        .find(|value| !value.is_unavailable())
        .unwrap_or(FieldValue::Unavailable)
}

fn decode_temperature(raw: &str) -> ReadingGroup {
    let head = raw.split(DEGREE_MARKER).next().unwrap_or_default();
    let value = FieldValue::parse(head.trim_end_matches('Â'));
    log_unavailable(raw, "current", value);

    ReadingGroup::tagged(
        TEMPERATURE_UNIT,
        vec![DecodedReading::new("current", value, TEMPERATURE_UNIT)],
    )
}

fn log_unavailable(raw: &str, field: &str, value: FieldValue) {
    if value.is_unavailable() {
        debug!(reading = raw, field, "reading field could not be parsed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(group: &ReadingGroup, field: &str) -> FieldValue {
        group
            .readings
            .iter()
            .find(|reading| reading.field == field)
            .map(|reading| reading.value)
            .unwrap_or_else(|| panic!("field '{field}' missing"))
    }

    #[test]
    fn composite_reading_splits_energy_and_current() {
        let groups = decode_reading("12.3 kWh, Avg 1.1 A, Max 2.4 A, Min 0.2 A");

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].unit_tag.as_deref(), Some("kWh"));
        assert_eq!(value_of(&groups[0], "current"), FieldValue::Measured(12.3));

        assert_eq!(groups[1].unit_tag.as_deref(), Some("amps"));
        assert_eq!(value_of(&groups[1], "average"), FieldValue::Measured(1.1));
        assert_eq!(value_of(&groups[1], "maximum"), FieldValue::Measured(2.4));
        assert_eq!(value_of(&groups[1], "minimum"), FieldValue::Measured(0.2));
        assert!(groups[1].readings.iter().all(|reading| reading.unit == "A"));
    }

    #[test]
    fn multi_word_labels_are_skipped() {
        let groups = decode_reading("0.5 kWh, Avg Current 3.0 A, Max Current 4.5 A, Min Current 1 A");
        assert_eq!(value_of(&groups[1], "average"), FieldValue::Measured(3.0));
        assert_eq!(value_of(&groups[1], "maximum"), FieldValue::Measured(4.5));
        assert_eq!(value_of(&groups[1], "minimum"), FieldValue::Measured(1.0));
    }

    #[test]
    fn broken_sub_reading_degrades_only_that_field() {
        let groups = decode_reading("7 kWh, Avg ?? A, Max 2 A");

        assert_eq!(value_of(&groups[0], "current"), FieldValue::Measured(7.0));
        assert_eq!(value_of(&groups[1], "average"), FieldValue::Unavailable);
        assert_eq!(value_of(&groups[1], "maximum"), FieldValue::Measured(2.0));
        assert_eq!(value_of(&groups[1], "minimum"), FieldValue::Unavailable);
    }

    #[test]
    fn temperature_reading_uses_value_before_degree_sign() {
        let groups = decode_reading("-4.2°C");

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].unit_tag.as_deref(), Some("C"));
        assert_eq!(value_of(&groups[0], "current"), FieldValue::Measured(-4.2));
    }

    #[test]
    fn double_encoded_degree_sign_is_tolerated() {
        let groups = decode_reading("21.75Â°C");
        assert_eq!(value_of(&groups[0], "current"), FieldValue::Measured(21.75));
    }

    #[test]
    fn unknown_text_still_yields_one_unavailable_field() {
        let groups = decode_reading("Door Open");

        assert_eq!(classify("Door Open"), ReadingKind::Temperature);
        assert_eq!(groups.len(), 1);
        assert_eq!(value_of(&groups[0], "current"), FieldValue::Unavailable);
    }
}
