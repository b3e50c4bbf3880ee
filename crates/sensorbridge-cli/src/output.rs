use std::collections::BTreeMap;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

use sensorbridge_core::{Accumulator, FieldSet, MetricPoint, TagSet, UtcDateTime};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Accumulator that holds the points of one poll cycle until they are written.
#[derive(Debug, Default)]
pub struct PointBuffer {
    points: Mutex<Vec<MetricPoint>>,
}

impl PointBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything buffered so far.
    pub fn take(&self) -> Vec<MetricPoint> {
        let mut points = self.points.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *points)
    }
}

impl Accumulator for PointBuffer {
    fn add_fields(&self, measurement: &str, fields: FieldSet, tags: TagSet, timestamp: UtcDateTime) {
        self.points
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(MetricPoint::new(measurement, fields, tags, timestamp));
    }
}

#[derive(Debug, Serialize)]
struct JsonPoint<'a> {
    measurement: &'a str,
    tags: &'a TagSet,
    fields: BTreeMap<&'a str, f64>,
    timestamp: UtcDateTime,
}

/// Writes one line per point. Points without a measured field are skipped.
pub fn write_points<W: Write>(
    writer: &mut W,
    points: &[MetricPoint],
    format: OutputFormat,
) -> Result<usize, CliError> {
    let mut written = 0;
    for point in points {
        let line = match format {
            OutputFormat::Line => line_protocol(point),
            OutputFormat::Json => json_line(point)?,
        };
        if let Some(line) = line {
            writeln!(writer, "{line}")?;
            written += 1;
        }
    }
    writer.flush()?;
    Ok(written)
}

/// InfluxDB line protocol with nanosecond timestamps. Unavailable fields are omitted.
pub fn line_protocol(point: &MetricPoint) -> Option<String> {
    let fields = point
        .measured_fields()
        .map(|(key, value)| format!("{}={value}", escape_key(key)))
        .collect::<Vec<_>>();
    if fields.is_empty() {
        return None;
    }

    let mut line = escape_measurement(&point.measurement);
    for (key, value) in &point.tags {
        if value.is_empty() {
            continue;
        }
        line.push(',');
        line.push_str(&escape_key(key));
        line.push('=');
        line.push_str(&escape_key(value));
    }
    line.push(' ');
    line.push_str(&fields.join(","));
    line.push(' ');
    line.push_str(&point.timestamp.unix_nanos().to_string());

    Some(line)
}

fn json_line(point: &MetricPoint) -> Result<Option<String>, CliError> {
    let fields = point.measured_fields().collect::<BTreeMap<_, _>>();
    if fields.is_empty() {
        return Ok(None);
    }

    let json = serde_json::to_string(&JsonPoint {
        measurement: &point.measurement,
        tags: &point.tags,
        fields,
        timestamp: point.timestamp,
    })?;
    Ok(Some(json))
}

fn escape_measurement(value: &str) -> String {
    escape(value, &[',', ' '])
}

fn escape_key(value: &str) -> String {
    escape(value, &[',', '=', ' '])
}

/// Line breaks cannot be escaped in line protocol, so they become escaped spaces.
fn escape(value: &str, special: &[char]) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if ch == '\n' || ch == '\r' {
            escaped.push_str("\\ ");
            continue;
        }
        if ch == '\\' || special.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
