//! Tag hierarchy extraction from delimited sensor names.
//!
//! Sensor names follow the convention
//! `customer|country|store|zone|equipment|equipmentType|cargo|sensor|sensorID`.
//! Names with any other segment count collapse to a single `customer` tag.

use crate::TagSet;

pub const DEFAULT_DELIMITER: &str = "|";

/// Tag keys of a full hierarchy, in segment order.
pub const HIERARCHY_KEYS: [&str; 9] = [
    "customer",
    "country",
    "store",
    "zone",
    "equipment",
    "equipmentType",
    "cargo",
    "sensor",
    "sensorID",
];

pub const FALLBACK_KEY: &str = "customer";

/// Tags derived from a sensor name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagHierarchy {
    Full([String; 9]),
    Fallback(String),
}

impl TagHierarchy {
    pub fn to_tags(&self) -> TagSet {
        match self {
            Self::Full(segments) => HIERARCHY_KEYS
                .iter()
                .zip(segments.iter())
                .map(|(key, value)| ((*key).to_owned(), value.clone()))
                .collect(),
            Self::Fallback(name) => {
                let mut tags = TagSet::new();
                tags.insert(FALLBACK_KEY.to_owned(), name.clone());
                tags
            }
        }
    }

    pub const fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }
}

/// Splits sensor names on a configured delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagExtractor {
    delimiter: String,
}

impl Default for TagExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl TagExtractor {
    /// An empty delimiter is replaced by the default one.
    pub fn new(delimiter: impl Into<String>) -> Self {
        let delimiter = delimiter.into();
        if delimiter.is_empty() {
            return Self {
                delimiter: DEFAULT_DELIMITER.to_owned(),
            };
        }
        Self { delimiter }
    }

    pub fn extract(&self, name: &str) -> TagHierarchy {
        let segments = name.split(self.delimiter.as_str()).collect::<Vec<_>>();

        match <[&str; 9]>::try_from(segments.as_slice()) {
            Ok(segments) => TagHierarchy::Full(segments.map(str::to_owned)),
            Err(_) => TagHierarchy::Fallback(name.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_segments_map_to_named_tags() {
        let hierarchy = TagExtractor::default()
            .extract("Acme|US|Store12|ZoneA|Freezer|Refrigeration|Dairy|TempProbe|SN001");
        let tags = hierarchy.to_tags();

        assert!(hierarchy.is_full());
        assert_eq!(tags.len(), 9);
        assert_eq!(tags.get("customer").map(String::as_str), Some("Acme"));
        assert_eq!(tags.get("equipmentType").map(String::as_str), Some("Refrigeration"));
        assert_eq!(tags.get("sensorID").map(String::as_str), Some("SN001"));
    }

    #[test]
    fn other_depths_fall_back_to_raw_name() {
        let extractor = TagExtractor::default();
        for name in ["", "Acme", "a|b|c|d|e|f|g|h", "a|b|c|d|e|f|g|h|i|j"] {
            let tags = extractor.extract(name).to_tags();
            assert_eq!(tags.len(), 1, "name '{name}'");
            assert_eq!(tags.get("customer").map(String::as_str), Some(name));
        }
    }

    #[test]
    fn empty_segments_still_count_towards_depth() {
        let tags = TagExtractor::default().extract("Acme||||||||").to_tags();
        assert_eq!(tags.len(), 9);
        assert_eq!(tags.get("sensorID").map(String::as_str), Some(""));
    }

    #[test]
    fn custom_delimiter_is_honoured() {
        let extractor = TagExtractor::new("/");
        assert!(extractor.extract("a/b/c/d/e/f/g/h/i").is_full());
        assert!(!extractor.extract("a|b|c|d|e|f|g|h|i").is_full());
    }

    #[test]
    fn empty_delimiter_behaves_like_the_default() {
        let name = "Acme|US|Store12|ZoneA|Freezer|Refrigeration|Dairy|TempProbe|SN001";
        assert_eq!(TagExtractor::new(""), TagExtractor::default());
        assert!(TagExtractor::new("").extract(name).is_full());
    }
}
