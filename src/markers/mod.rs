//! Lab markers: names, marker sets, and merging

mod extractor;

pub use extractor::{extract_markers, marker_pattern, MARKER_SYNONYMS};

use crate::profile::coerce;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// The eight clinical markers the engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Marker {
    Tsh,
    T3,
    T4,
    HbA1c,
    Insulin,
    Cortisol,
    Cholesterol,
    FastingGlucose,
}

impl Marker {
    pub const ALL: [Marker; 8] = [
        Marker::Tsh,
        Marker::T3,
        Marker::T4,
        Marker::HbA1c,
        Marker::Insulin,
        Marker::Cortisol,
        Marker::Cholesterol,
        Marker::FastingGlucose,
    ];

    /// Canonical key used in marker mappings
    pub fn name(self) -> &'static str {
        match self {
            Marker::Tsh => "TSH",
            Marker::T3 => "T3",
            Marker::T4 => "T4",
            Marker::HbA1c => "HbA1c",
            Marker::Insulin => "Insulin",
            Marker::Cortisol => "Cortisol",
            Marker::Cholesterol => "Cholesterol",
            Marker::FastingGlucose => "Fasting glucose",
        }
    }

    /// Look up a marker by its exact canonical key
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Optional value per marker. Absent means "not measured", never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarkerSet {
    values: [Option<f64>; 8],
}

impl MarkerSet {
    /// A set with every marker absent
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, marker: Marker) -> Option<f64> {
        self.values[marker.index()]
    }

    pub fn set(&mut self, marker: Marker, value: Option<f64>) {
        self.values[marker.index()] = value;
    }

    /// Builder-style `set` for a present value
    pub fn with(mut self, marker: Marker, value: f64) -> Self {
        self.set(marker, Some(value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Number of markers with a value
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Iterate all eight markers in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Marker, Option<f64>)> + '_ {
        Marker::ALL.into_iter().map(move |m| (m, self.get(m)))
    }

    /// Overlay explicitly supplied values. Present values in `explicit` win;
    /// absent ones leave the current value untouched.
    pub fn merge_explicit(&mut self, explicit: &MarkerSet) {
        for (marker, value) in explicit.iter() {
            if value.is_some() {
                self.set(marker, value);
            }
        }
    }

    /// Read a marker mapping from JSON. Accepts an `extracted_markers` wrapper,
    /// ignores unknown keys, and treats null or non-numeric values as absent.
    pub fn from_value(value: &Value) -> Self {
        let mut set = Self::new();
        let Some(obj) = value.as_object() else {
            return set;
        };
        let obj = match obj.get("extracted_markers").and_then(Value::as_object) {
            Some(inner) => inner,
            None => obj,
        };

        for (key, raw) in obj {
            match Marker::from_name(key) {
                Some(marker) => {
                    let parsed = coerce::optional_number(raw);
                    if parsed.is_none() && !raw.is_null() {
                        tracing::debug!("Ignoring non-numeric value for marker {}: {}", key, raw);
                    }
                    set.set(marker, parsed);
                }
                None => tracing::debug!("Ignoring unknown marker key: {}", key),
            }
        }
        set
    }
}

impl Serialize for MarkerSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Marker::ALL.len()))?;
        for (marker, value) in self.iter() {
            map.serialize_entry(marker.name(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MarkerSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn marker_names_round_trip() {
        for marker in Marker::ALL {
            assert_eq!(Marker::from_name(marker.name()), Some(marker));
        }
        assert_eq!(Marker::from_name("fasting glucose"), None);
        assert_eq!(Marker::from_name("Glucose"), None);
    }

    #[test]
    fn serializes_all_eight_keys_with_nulls() {
        let set = MarkerSet::new().with(Marker::Tsh, 0.2);
        let json = serde_json::to_value(set).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 8);
        assert_eq!(obj["TSH"], json!(0.2));
        assert!(obj["Fasting glucose"].is_null());
    }

    #[test]
    fn from_value_unwraps_extracted_markers() {
        let set = MarkerSet::from_value(&json!({"extracted_markers": {"Cortisol": 25.0}}));
        assert_eq!(set.get(Marker::Cortisol), Some(25.0));
        assert_eq!(set.present_count(), 1);
    }

    #[test]
    fn from_value_ignores_unknown_and_garbage() {
        let set = MarkerSet::from_value(&json!({
            "Vitamin D": 30,
            "Insulin": "elevated",
            "Cholesterol": "210"
        }));
        assert_eq!(set.get(Marker::Insulin), None);
        assert_eq!(set.get(Marker::Cholesterol), Some(210.0));
        assert_eq!(set.present_count(), 1);
    }

    #[test]
    fn from_value_of_non_object_is_empty() {
        assert!(MarkerSet::from_value(&json!("TSH 4")).is_empty());
        assert!(MarkerSet::from_value(&Value::Null).is_empty());
    }

    #[test]
    fn explicit_values_win_on_collision() {
        let mut merged = MarkerSet::new()
            .with(Marker::Tsh, 5.2)
            .with(Marker::HbA1c, 7.1);
        let explicit = MarkerSet::new()
            .with(Marker::Tsh, 2.0)
            .with(Marker::Insulin, 18.0);

        merged.merge_explicit(&explicit);

        assert_eq!(merged.get(Marker::Tsh), Some(2.0));
        assert_eq!(merged.get(Marker::HbA1c), Some(7.1));
        assert_eq!(merged.get(Marker::Insulin), Some(18.0));
    }

    #[test]
    fn explicit_absent_does_not_erase_extracted() {
        let mut merged = MarkerSet::new().with(Marker::Cortisol, 25.0);
        merged.merge_explicit(&MarkerSet::from_value(&json!({"Cortisol": null})));
        assert_eq!(merged.get(Marker::Cortisol), Some(25.0));
    }

    #[test]
    fn deserialize_goes_through_permissive_reader() {
        let set: MarkerSet = serde_json::from_str(r#"{"T4": "0.7", "T3": null}"#).unwrap();
        assert_eq!(set.get(Marker::T4), Some(0.7));
        assert_eq!(set.get(Marker::T3), None);
    }
}
