//! Endorisk: endocrine and metabolic risk scoring
//!
//! This library estimates relative risk across five conditions (thyroid,
//! diabetes, PCOS, adrenal, metabolic syndrome) from a lifestyle/demographic
//! profile and optional lab markers, and recovers those markers from free-form
//! lab-report text. Scoring is a deterministic, auditable rule pipeline; it is
//! not a diagnostic model.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod history;
pub mod markers;
pub mod profile;
pub mod reporter;
pub mod request;
pub mod watcher;

pub use analyzer::RiskEngine;
pub use error::InputError;
pub use markers::{extract_markers, Marker, MarkerSet};
pub use profile::{Profile, ProfileDefaults};

use serde::{Deserialize, Serialize};

/// Conditions scored by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Thyroid,
    Diabetes,
    Pcos,
    Adrenal,
    Metabolic,
}

impl Condition {
    /// All conditions in output order
    pub const ALL: [Condition; 5] = [
        Condition::Thyroid,
        Condition::Diabetes,
        Condition::Pcos,
        Condition::Adrenal,
        Condition::Metabolic,
    ];

    /// Human-readable name used by the console reporter
    pub fn display_name(self) -> &'static str {
        match self {
            Condition::Thyroid => "Thyroid",
            Condition::Diabetes => "Diabetes",
            Condition::Pcos => "PCOS",
            Condition::Adrenal => "Adrenal",
            Condition::Metabolic => "Metabolic syndrome",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self {
            Condition::Thyroid => "thyroid",
            Condition::Diabetes => "diabetes",
            Condition::Pcos => "pcos",
            Condition::Adrenal => "adrenal",
            Condition::Metabolic => "metabolic",
        };
        write!(f, "{}", key)
    }
}

/// One value per condition, serialized as a map keyed by condition name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionMap<T> {
    pub thyroid: T,
    pub diabetes: T,
    pub pcos: T,
    pub adrenal: T,
    pub metabolic: T,
}

impl<T> ConditionMap<T> {
    /// Build a map by evaluating `f` for every condition
    pub fn from_fn(mut f: impl FnMut(Condition) -> T) -> Self {
        Self {
            thyroid: f(Condition::Thyroid),
            diabetes: f(Condition::Diabetes),
            pcos: f(Condition::Pcos),
            adrenal: f(Condition::Adrenal),
            metabolic: f(Condition::Metabolic),
        }
    }

    pub fn get(&self, condition: Condition) -> &T {
        match condition {
            Condition::Thyroid => &self.thyroid,
            Condition::Diabetes => &self.diabetes,
            Condition::Pcos => &self.pcos,
            Condition::Adrenal => &self.adrenal,
            Condition::Metabolic => &self.metabolic,
        }
    }

    pub fn get_mut(&mut self, condition: Condition) -> &mut T {
        match condition {
            Condition::Thyroid => &mut self.thyroid,
            Condition::Diabetes => &mut self.diabetes,
            Condition::Pcos => &mut self.pcos,
            Condition::Adrenal => &mut self.adrenal,
            Condition::Metabolic => &mut self.metabolic,
        }
    }

    /// Transform every value, keeping the condition association
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> ConditionMap<U> {
        ConditionMap::from_fn(|c| f(self.get(c)))
    }

    /// Iterate `(condition, value)` pairs in output order
    pub fn iter(&self) -> impl Iterator<Item = (Condition, &T)> {
        Condition::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// Qualitative risk bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(alias = "low")]
    Low,
    #[serde(alias = "moderate")]
    Moderate,
    #[serde(alias = "high")]
    High,
}

impl RiskLevel {
    /// Classify a clamped score: Low below 35, Moderate below 65, High otherwise.
    pub fn from_score(score: f64) -> Self {
        if score < 35.0 {
            RiskLevel::Low
        } else if score < 65.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Moderate => write!(f, "Moderate"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "moderate" => Ok(RiskLevel::Moderate),
            "high" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk level: {}", other)),
        }
    }
}

/// Labels recorded when a rule condition fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    HighBmi,
    OverweightBmi,
    PoorSleep,
    HighStress,
    LowPhysicalActivity,
    UnhealthyDiet,
    FamilyHistoryDiabetes,
    FamilyHistoryThyroid,
    FamilyHistoryPcos,
    PcosSymptomPattern,
    AbnormalTsh,
    DiabeticHba1c,
    PrediabeticHba1c,
    HighFastingGlucose,
    ElevatedInsulin,
    AbnormalCortisol,
    HighCholesterol,
    SleepStressCorrelation,
    BmiFamilyHistoryCorrelation,
    CyclesInsulinCorrelation,
}

impl Trigger {
    /// Literal label as it appears in `key_triggers`
    pub fn label(self) -> &'static str {
        match self {
            Trigger::HighBmi => "High BMI",
            Trigger::OverweightBmi => "Overweight BMI",
            Trigger::PoorSleep => "Poor sleep",
            Trigger::HighStress => "High stress",
            Trigger::LowPhysicalActivity => "Low physical activity",
            Trigger::UnhealthyDiet => "Unhealthy diet pattern",
            Trigger::FamilyHistoryDiabetes => "Family history of diabetes",
            Trigger::FamilyHistoryThyroid => "Family history of thyroid disorder",
            Trigger::FamilyHistoryPcos => "Family history of PCOS",
            Trigger::PcosSymptomPattern => "PCOS symptom pattern",
            Trigger::AbnormalTsh => "Abnormal TSH",
            Trigger::DiabeticHba1c => "Diabetic-range HbA1c",
            Trigger::PrediabeticHba1c => "Prediabetic HbA1c",
            Trigger::HighFastingGlucose => "High fasting glucose",
            Trigger::ElevatedInsulin => "Elevated insulin",
            Trigger::AbnormalCortisol => "Abnormal cortisol",
            Trigger::HighCholesterol => "High cholesterol",
            Trigger::SleepStressCorrelation => "Poor sleep + high stress correlation",
            Trigger::BmiFamilyHistoryCorrelation => "High BMI + family history correlation",
            Trigger::CyclesInsulinCorrelation => "Irregular cycles + insulin issue correlation",
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single rule's effect, recorded when tracing is enabled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleContribution {
    /// Rule id (kebab-case)
    pub rule: String,
    /// Points added per condition (negative values lower the score)
    pub delta: ConditionMap<f64>,
    /// Trigger label, if the rule records one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
}

/// The result of assessing one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Rounded percentages, e.g. `"42%"`
    pub risk_scores: ConditionMap<String>,
    pub risk_level: ConditionMap<RiskLevel>,
    /// Unique labels, sorted ascending
    pub key_triggers: Vec<String>,
    pub explanation: String,
    pub recommended_actions: Vec<String>,
    pub suggested_tests: Vec<String>,
    /// Per-rule contributions in evaluation order (only when requested)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_trace: Option<Vec<RuleContribution>>,
    /// Clamped scores before rounding
    #[serde(skip)]
    pub scores: ConditionMap<f64>,
}

impl RiskAssessment {
    /// Rounded integer percentage for a condition
    pub fn percent(&self, condition: Condition) -> u8 {
        percent_value(*self.scores.get(condition))
    }

    /// Highest level reached by any condition
    pub fn max_level(&self) -> RiskLevel {
        self.risk_level
            .iter()
            .map(|(_, level)| *level)
            .max()
            .unwrap_or(RiskLevel::Low)
    }

    /// True when `label` is among the key triggers
    pub fn has_trigger(&self, label: &str) -> bool {
        self.key_triggers.iter().any(|t| t == label)
    }
}

/// Round a clamped score half-to-even and clamp into 0..=100
pub fn percent_value(score: f64) -> u8 {
    score.clamp(0.0, 100.0).round_ties_even() as u8
}

/// Render a score as `"NN%"`
pub fn format_percent(score: f64) -> String {
    format!("{}%", percent_value(score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_boundaries() {
        assert_eq!(RiskLevel::from_score(34.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(34.999), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(35.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(64.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(64.999), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(65.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(100.0), RiskLevel::High);
    }

    #[test]
    fn risk_level_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<RiskLevel>(), Ok(RiskLevel::High));
        assert_eq!(" moderate ".parse::<RiskLevel>(), Ok(RiskLevel::Moderate));
        assert!("severe".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn format_percent_rounds_half_to_even() {
        assert_eq!(format_percent(62.5), "62%");
        assert_eq!(format_percent(63.5), "64%");
        assert_eq!(format_percent(20.0), "20%");
        assert_eq!(format_percent(100.0), "100%");
    }

    #[test]
    fn condition_map_serializes_with_lowercase_keys() {
        let map = ConditionMap::from_fn(|c| c.to_string());
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["pcos"], "pcos");
        assert_eq!(json["metabolic"], "metabolic");
        assert_eq!(json.as_object().unwrap().len(), 5);
    }

    #[test]
    fn condition_map_get_mut_targets_one_condition() {
        let mut map: ConditionMap<f64> = ConditionMap::default();
        *map.get_mut(Condition::Adrenal) += 12.0;
        assert_eq!(map.adrenal, 12.0);
        assert_eq!(map.thyroid, 0.0);
    }

    #[test]
    fn trigger_labels_are_distinct() {
        let all = [
            Trigger::HighBmi,
            Trigger::OverweightBmi,
            Trigger::PoorSleep,
            Trigger::HighStress,
            Trigger::LowPhysicalActivity,
            Trigger::UnhealthyDiet,
            Trigger::FamilyHistoryDiabetes,
            Trigger::FamilyHistoryThyroid,
            Trigger::FamilyHistoryPcos,
            Trigger::PcosSymptomPattern,
            Trigger::AbnormalTsh,
            Trigger::DiabeticHba1c,
            Trigger::PrediabeticHba1c,
            Trigger::HighFastingGlucose,
            Trigger::ElevatedInsulin,
            Trigger::AbnormalCortisol,
            Trigger::HighCholesterol,
            Trigger::SleepStressCorrelation,
            Trigger::BmiFamilyHistoryCorrelation,
            Trigger::CyclesInsulinCorrelation,
        ];
        let labels: std::collections::HashSet<_> = all.iter().map(|t| t.label()).collect();
        assert_eq!(labels.len(), all.len());
    }
}
