use std::sync::{Mutex, PoisonError};

use crate::{FieldSet, MetricPoint, NormalizedObservation, TagSet, UtcDateTime};

/// Sink for metric points, the boundary towards the metrics pipeline.
pub trait Accumulator: Send + Sync {
    fn add_fields(&self, measurement: &str, fields: FieldSet, tags: TagSet, timestamp: UtcDateTime);
}

/// Accumulator that keeps every point in memory.
#[derive(Debug, Default)]
pub struct MemoryAccumulator {
    points: Mutex<Vec<MetricPoint>>,
}

impl MemoryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> Vec<MetricPoint> {
        self.points.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn len(&self) -> usize {
        self.points.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Accumulator for MemoryAccumulator {
    fn add_fields(&self, measurement: &str, fields: FieldSet, tags: TagSet, timestamp: UtcDateTime) {
        self.points
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(MetricPoint::new(measurement, fields, tags, timestamp));
    }
}

/// Turns normalized observations into metric points for one measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricEmitter {
    measurement: String,
}

impl MetricEmitter {
    pub fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
        }
    }

    /// One point per reading group; every point carries the base tags plus the
    /// group's `unit` tag and the shared collection timestamp.
    pub fn points(&self, observation: &NormalizedObservation, collected_at: UtcDateTime) -> Vec<MetricPoint> {
        observation
            .groups
            .iter()
            .map(|group| {
                let mut tags = observation.tags.clone();
                if let Some(unit) = &group.unit_tag {
                    tags.insert(String::from("unit"), unit.clone());
                }
                MetricPoint::new(self.measurement.as_str(), group.fields(), tags, collected_at)
            })
            .collect()
    }

    /// Delivers every point to `accumulator` and returns how many were sent.
    pub fn emit(
        &self,
        observation: &NormalizedObservation,
        collected_at: UtcDateTime,
        accumulator: &dyn Accumulator,
    ) -> usize {
        let points = self.points(observation, collected_at);
        let count = points.len();
        for point in points {
            accumulator.add_fields(&point.measurement, point.fields, point.tags, point.timestamp);
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DecodedReading, FieldValue, ReadingGroup};

    fn observation() -> NormalizedObservation {
        let mut tags = TagSet::new();
        tags.insert(String::from("customer"), String::from("Acme"));
        NormalizedObservation {
            tags,
            groups: vec![
                ReadingGroup::tagged(
                    "kWh",
                    vec![DecodedReading::new("current", FieldValue::Measured(3.0), "kWh")],
                ),
                ReadingGroup::tagged(
                    "amps",
                    vec![DecodedReading::new("average", FieldValue::Measured(1.0), "A")],
                ),
            ],
        }
    }

    #[test]
    fn each_group_becomes_a_point_sharing_base_tags_and_timestamp() {
        let accumulator = MemoryAccumulator::new();
        let collected_at = UtcDateTime::parse("2024-05-01T12:00:00Z").expect("valid timestamp");

        let sent = MetricEmitter::new("imonnit").emit(&observation(), collected_at, &accumulator);
        let points = accumulator.points();

        assert_eq!(sent, 2);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].tag("unit"), Some("kWh"));
        assert_eq!(points[1].tag("unit"), Some("amps"));
        for point in &points {
            assert_eq!(point.measurement, "imonnit");
            assert_eq!(point.tag("customer"), Some("Acme"));
            assert_eq!(point.timestamp, collected_at);
        }
    }

    #[test]
    fn points_survive_a_writer_that_panicked_mid_push() {
        let accumulator = MemoryAccumulator::new();
        let panicked = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _guard = accumulator.points.lock().expect("first lock");
                    panic!("writer panicked while holding the lock");
                })
                .join()
        });
        assert!(panicked.is_err());
        assert!(accumulator.points.is_poisoned());

        let collected_at = UtcDateTime::parse("2024-05-01T12:00:00Z").expect("valid timestamp");
        let sent = MetricEmitter::new("imonnit").emit(&observation(), collected_at, &accumulator);

        assert_eq!(sent, 2);
        assert_eq!(accumulator.len(), 2);
        assert_eq!(accumulator.points().len(), 2);
    }

    #[test]
    fn untagged_group_adds_no_unit_tag() {
        let observation = NormalizedObservation {
            tags: TagSet::new(),
            groups: vec![ReadingGroup::untagged(vec![DecodedReading::new(
                "si_value",
                FieldValue::Measured(1.0),
                "°C",
            )])],
        };

        let points = MetricEmitter::new("hobolink").points(&observation, UtcDateTime::now());
        assert_eq!(points.len(), 1);
        assert!(points[0].tags.is_empty());
    }
}
