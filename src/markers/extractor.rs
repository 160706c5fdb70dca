//! Lab-report text extraction
//!
//! Each marker has a list of accepted names. A name matches on word boundaries,
//! case-insensitively, followed by an optional `:`, `=` or `-` separator and an
//! unsigned decimal number. Only the first occurrence of a marker is used.

use super::{Marker, MarkerSet};
use regex::Regex;
use std::sync::OnceLock;

/// Accepted names per marker. Whitespace inside a name matches any run of
/// whitespace, including none.
pub const MARKER_SYNONYMS: [(Marker, &[&str]); 8] = [
    (Marker::Tsh, &["TSH"]),
    (Marker::T3, &["Free T3", "T3"]),
    (Marker::T4, &["Free T4", "T4"]),
    (Marker::HbA1c, &["HbA1c", "A1c"]),
    (Marker::Insulin, &["Insulin"]),
    (Marker::Cortisol, &["Cortisol"]),
    (Marker::Cholesterol, &["Total Cholesterol", "Cholesterol"]),
    (
        Marker::FastingGlucose,
        &["Fasting Glucose", "Glucose (Fasting)"],
    ),
];

const VALUE_PATTERN: &str = r"\s*[:=-]?\s*([0-9]+(?:\.[0-9]+)?)";

fn build_pattern(synonyms: &[&str]) -> String {
    let alternatives: Vec<String> = synonyms
        .iter()
        .map(|name| {
            let body = name
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s*");
            // A trailing word boundary only makes sense after a word character;
            // "Glucose (Fasting)" ends in ')'.
            let ends_in_word = name
                .chars()
                .last()
                .map(|c| c.is_alphanumeric() || c == '_')
                .unwrap_or(false);
            if ends_in_word {
                format!(r"\b{}\b", body)
            } else {
                format!(r"\b{}", body)
            }
        })
        .collect();
    format!("(?i)(?:{}){}", alternatives.join("|"), VALUE_PATTERN)
}

fn compiled_patterns() -> &'static [(Marker, Regex)] {
    static PATTERNS: OnceLock<Vec<(Marker, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        MARKER_SYNONYMS
            .iter()
            .map(|(marker, synonyms)| {
                let re = Regex::new(&build_pattern(synonyms)).expect("marker pattern is valid");
                (*marker, re)
            })
            .collect()
    })
}

/// The compiled search pattern for one marker
pub fn marker_pattern(marker: Marker) -> &'static Regex {
    compiled_patterns()
        .iter()
        .find(|(m, _)| *m == marker)
        .map(|(_, re)| re)
        .expect("every marker has a pattern")
}

/// Scan report text for all eight markers. Misses are absent, never errors.
pub fn extract_markers(text: &str) -> MarkerSet {
    let mut set = MarkerSet::new();
    for (marker, re) in compiled_patterns() {
        let value = re
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok());
        if let Some(v) = value {
            tracing::trace!("Extracted {} = {}", marker, v);
        }
        set.set(*marker, value);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_all_absent() {
        let set = extract_markers("");
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 8);
    }

    #[test]
    fn extracts_tsh_and_hba1c_only() {
        let set = extract_markers("TSH: 5.2 and HbA1c 7.1");
        assert_eq!(set.get(Marker::Tsh), Some(5.2));
        assert_eq!(set.get(Marker::HbA1c), Some(7.1));
        assert_eq!(set.present_count(), 2);
    }

    #[test]
    fn accepts_equals_and_dash_separators() {
        let set = extract_markers("Patient TSH=0.2, Cortisol - 25");
        assert_eq!(set.get(Marker::Tsh), Some(0.2));
        assert_eq!(set.get(Marker::Cortisol), Some(25.0));
        assert_eq!(set.present_count(), 2);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let set = extract_markers("tsh 3.1\nINSULIN: 18\nhba1c=5.9");
        assert_eq!(set.get(Marker::Tsh), Some(3.1));
        assert_eq!(set.get(Marker::Insulin), Some(18.0));
        assert_eq!(set.get(Marker::HbA1c), Some(5.9));
    }

    #[test]
    fn synonyms_map_to_canonical_markers() {
        let set = extract_markers(
            "Free T3: 1.8\nFree T4: 0.7\nA1c 6.6\nTotal Cholesterol: 230\nGlucose (Fasting): 131",
        );
        assert_eq!(set.get(Marker::T3), Some(1.8));
        assert_eq!(set.get(Marker::T4), Some(0.7));
        assert_eq!(set.get(Marker::HbA1c), Some(6.6));
        assert_eq!(set.get(Marker::Cholesterol), Some(230.0));
        assert_eq!(set.get(Marker::FastingGlucose), Some(131.0));
    }

    #[test]
    fn fasting_glucose_primary_name() {
        let set = extract_markers("Fasting Glucose - 104");
        assert_eq!(set.get(Marker::FastingGlucose), Some(104.0));
    }

    #[test]
    fn multiword_names_tolerate_spacing() {
        let set = extract_markers("FreeT3 2.4, Fasting   glucose: 99");
        assert_eq!(set.get(Marker::T3), Some(2.4));
        assert_eq!(set.get(Marker::FastingGlucose), Some(99.0));
    }

    #[test]
    fn first_occurrence_wins() {
        let set = extract_markers("TSH 1.1 (repeat: TSH 6.0)");
        assert_eq!(set.get(Marker::Tsh), Some(1.1));
    }

    #[test]
    fn requires_word_boundary_before_name() {
        let set = extract_markers("FT3 2.2 ATSH 9");
        assert_eq!(set.get(Marker::T3), None);
        assert_eq!(set.get(Marker::Tsh), None);
    }

    #[test]
    fn name_without_number_is_absent() {
        let set = extract_markers("Insulin resistance suspected; cortisol pending");
        assert_eq!(set.get(Marker::Insulin), None);
        assert_eq!(set.get(Marker::Cortisol), None);
    }

    #[test]
    fn integer_values_parse_as_float() {
        let set = extract_markers("Cholesterol 200");
        assert_eq!(set.get(Marker::Cholesterol), Some(200.0));
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = "TSH: 5.2 Insulin 22 Cortisol=4";
        assert_eq!(extract_markers(text), extract_markers(text));
    }

    #[test]
    fn patterns_compile_for_every_marker() {
        for marker in Marker::ALL {
            assert!(marker_pattern(marker).as_str().contains("(?i)"));
        }
    }
}
