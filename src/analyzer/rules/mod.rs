//! Scoring rules
//!
//! Every rule reads the normalized profile and markers and returns the points
//! it contributes plus at most one trigger. Rules never read each other's
//! output, so their order only affects the rule trace, not the final scores.

pub mod correlation;
pub mod demographics;
pub mod family_history;
pub mod lab_markers;
pub mod lifestyle;
pub mod symptoms;

pub use correlation::{
    BmiFamilyCorrelationRule, CyclesInsulinCorrelationRule, SleepStressCorrelationRule,
};
pub use demographics::{AgeRule, BmiTierRule};
pub use family_history::{FamilyDiabetesRule, FamilyPcosRule, FamilyThyroidRule};
pub use lab_markers::{
    CholesterolRule, CortisolRule, FastingGlucoseRule, Hba1cRule, InsulinRule, T3Rule, T4Rule,
    TshRule,
};
pub use lifestyle::{DietRule, ExerciseRule, SleepQualityRule, StressLevelRule};
pub use symptoms::{GlycemicSymptomRule, PcosSymptomRule, ThyroidSymptomRule};

use super::scoring::{ScoreDelta, ScoreSheet};
use crate::{Marker, MarkerSet, Profile, Trigger};

/// Family-history terms shared by the diabetes and correlation rules
pub(crate) const DIABETES_FAMILY_TERMS: &[&str] = &["diabetes", "insulin resistance"];

/// True if `haystack` contains any of `needles`
pub fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Everything a rule may look at
pub struct RuleInput<'a> {
    pub profile: &'a Profile,
    pub markers: &'a MarkerSet,
    symptom_text: String,
}

impl<'a> RuleInput<'a> {
    pub fn new(profile: &'a Profile, markers: &'a MarkerSet) -> Self {
        Self {
            profile,
            markers,
            symptom_text: profile.symptom_text(),
        }
    }

    pub fn is_female(&self) -> bool {
        self.profile.is_female()
    }

    /// Joined, lower-cased symptom tags
    pub fn symptoms(&self) -> &str {
        &self.symptom_text
    }

    pub fn marker(&self, marker: Marker) -> Option<f64> {
        self.markers.get(marker)
    }

    pub fn poor_sleep(&self) -> bool {
        contains_any(&self.profile.sleep_quality, &["poor", "low"])
    }

    pub fn high_stress(&self) -> bool {
        self.profile.stress_level.contains("high")
    }

    pub fn family_mentions_diabetes(&self) -> bool {
        contains_any(&self.profile.family_history, DIABETES_FAMILY_TERMS)
    }
}

/// What a rule contributes
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RuleOutcome {
    pub delta: ScoreDelta,
    pub trigger: Option<Trigger>,
}

impl RuleOutcome {
    /// The rule did not fire
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_delta(delta: ScoreDelta) -> Self {
        Self {
            delta,
            trigger: None,
        }
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// True if the rule changed a score or recorded a trigger
    pub fn fired(&self) -> bool {
        self.trigger.is_some() || !self.delta.is_zero()
    }
}

/// Trait for scoring rules
pub trait RiskRule: Send + Sync {
    /// Stable kebab-case id, used by config toggles and rule traces
    fn id(&self) -> &'static str;

    /// Evaluate the rule. `scores` holds the running totals so far.
    fn evaluate(&self, input: &RuleInput<'_>, scores: &ScoreSheet) -> RuleOutcome;
}

/// All rules in canonical evaluation order
pub fn default_rules() -> Vec<Box<dyn RiskRule>> {
    vec![
        Box::new(BmiTierRule),
        Box::new(SleepQualityRule),
        Box::new(StressLevelRule),
        Box::new(ExerciseRule),
        Box::new(DietRule),
        Box::new(FamilyDiabetesRule),
        Box::new(FamilyThyroidRule),
        Box::new(FamilyPcosRule),
        Box::new(ThyroidSymptomRule),
        Box::new(GlycemicSymptomRule),
        Box::new(PcosSymptomRule),
        Box::new(AgeRule),
        Box::new(TshRule),
        Box::new(T3Rule),
        Box::new(T4Rule),
        Box::new(Hba1cRule),
        Box::new(FastingGlucoseRule),
        Box::new(InsulinRule),
        Box::new(CortisolRule),
        Box::new(CholesterolRule),
        Box::new(SleepStressCorrelationRule),
        Box::new(BmiFamilyCorrelationRule),
        Box::new(CyclesInsulinCorrelationRule),
    ]
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rule_ids_are_unique_and_kebab_case() {
        let rules = default_rules();
        let ids: HashSet<_> = rules.iter().map(|r| r.id()).collect();
        assert_eq!(ids.len(), rules.len());
        for id in ids {
            assert!(id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }

    #[test]
    fn contains_any_matches_substrings() {
        assert!(contains_any("3 times a week", &["3", "4"]));
        assert!(!contains_any("weekly", &["daily", "regular"]));
        assert!(!contains_any("", &["x"]));
    }

    #[test]
    fn outcome_fired_requires_delta_or_trigger() {
        assert!(!RuleOutcome::none().fired());
        assert!(RuleOutcome::none().with_trigger(Trigger::HighStress).fired());
        let delta = ScoreDelta::none().add(crate::Condition::Adrenal, 8.0);
        assert!(RuleOutcome::from_delta(delta).fired());
    }

    #[test]
    fn input_helpers_read_normalized_fields() {
        let profile = Profile {
            sleep_quality: "low".to_string(),
            stress_level: "very high".to_string(),
            family_history: "insulin resistance (aunt)".to_string(),
            ..test_support::blank()
        };
        let markers = MarkerSet::new();
        let input = RuleInput::new(&profile, &markers);
        assert!(input.poor_sleep());
        assert!(input.high_stress());
        assert!(input.family_mentions_diabetes());
        assert!(!input.is_female());
    }
}
