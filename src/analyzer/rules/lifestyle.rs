//! Sleep, stress, exercise, and diet rules
//!
//! Each field has a risk tier and a milder (or protective) tier. The risk tier
//! is checked first and the two never both apply.

use super::{contains_any, RiskRule, RuleInput, RuleOutcome};
use crate::analyzer::scoring::{ScoreDelta, ScoreSheet};
use crate::{Condition, Trigger};

const LOW_ACTIVITY_TERMS: &[&str] = &["none", "rare", "sedentary", "low"];
const REGULAR_ACTIVITY_TERMS: &[&str] = &["3", "4", "5", "regular", "daily"];
const UNHEALTHY_DIET_TERMS: &[&str] = &["high sugar", "processed", "junk", "high-carb", "high carb"];
const HEALTHY_DIET_TERMS: &[&str] = &["balanced", "mediterranean", "whole foods", "high protein"];

#[derive(Debug, Default)]
pub struct SleepQualityRule;

impl RiskRule for SleepQualityRule {
    fn id(&self) -> &'static str {
        "sleep-quality"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        if input.poor_sleep() {
            RuleOutcome::from_delta(
                ScoreDelta::none()
                    .add(Condition::Adrenal, 18.0)
                    .add(Condition::Diabetes, 6.0),
            )
            .with_trigger(Trigger::PoorSleep)
        } else if input.profile.sleep_quality.contains("average") {
            RuleOutcome::from_delta(ScoreDelta::none().add(Condition::Adrenal, 8.0))
        } else {
            RuleOutcome::none()
        }
    }
}

#[derive(Debug, Default)]
pub struct StressLevelRule;

impl RiskRule for StressLevelRule {
    fn id(&self) -> &'static str {
        "stress-level"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        if input.high_stress() {
            RuleOutcome::from_delta(
                ScoreDelta::none()
                    .add(Condition::Adrenal, 20.0)
                    .add(Condition::Thyroid, 8.0)
                    .add(Condition::Diabetes, 5.0),
            )
            .with_trigger(Trigger::HighStress)
        } else if input.profile.stress_level.contains("moderate") {
            RuleOutcome::from_delta(ScoreDelta::none().add(Condition::Adrenal, 10.0))
        } else {
            RuleOutcome::none()
        }
    }
}

#[derive(Debug, Default)]
pub struct ExerciseRule;

impl RiskRule for ExerciseRule {
    fn id(&self) -> &'static str {
        "exercise-frequency"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        let exercise = input.profile.exercise_frequency.as_str();
        if contains_any(exercise, LOW_ACTIVITY_TERMS) {
            RuleOutcome::from_delta(
                ScoreDelta::none()
                    .add(Condition::Diabetes, 12.0)
                    .add(Condition::Metabolic, 12.0),
            )
            .with_trigger(Trigger::LowPhysicalActivity)
        } else if contains_any(exercise, REGULAR_ACTIVITY_TERMS) {
            RuleOutcome::from_delta(
                ScoreDelta::none()
                    .add(Condition::Diabetes, -6.0)
                    .add(Condition::Metabolic, -6.0),
            )
        } else {
            RuleOutcome::none()
        }
    }
}

#[derive(Debug, Default)]
pub struct DietRule;

impl RiskRule for DietRule {
    fn id(&self) -> &'static str {
        "diet-type"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        let diet = input.profile.diet_type.as_str();
        if contains_any(diet, UNHEALTHY_DIET_TERMS) {
            RuleOutcome::from_delta(
                ScoreDelta::none()
                    .add(Condition::Diabetes, 14.0)
                    .add(Condition::Metabolic, 10.0)
                    .add(Condition::Pcos, 6.0),
            )
            .with_trigger(Trigger::UnhealthyDiet)
        } else if contains_any(diet, HEALTHY_DIET_TERMS) {
            RuleOutcome::from_delta(
                ScoreDelta::none()
                    .add(Condition::Diabetes, -4.0)
                    .add(Condition::Metabolic, -4.0),
            )
        } else {
            RuleOutcome::none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::rules::test_support::{blank, run};
    use crate::{MarkerSet, Profile};

    #[test]
    fn poor_or_low_sleep_triggers() {
        for sleep in ["poor", "low quality", "very poor"] {
            let profile = Profile {
                sleep_quality: sleep.to_string(),
                ..blank()
            };
            let out = run(&SleepQualityRule, &profile, &MarkerSet::new());
            assert_eq!(out.trigger, Some(Trigger::PoorSleep), "sleep = {}", sleep);
            assert_eq!(out.delta.get(Condition::Adrenal), 18.0);
            assert_eq!(out.delta.get(Condition::Diabetes), 6.0);
        }
    }

    #[test]
    fn average_sleep_adds_adrenal_without_trigger() {
        let profile = Profile {
            sleep_quality: "average".to_string(),
            ..blank()
        };
        let out = run(&SleepQualityRule, &profile, &MarkerSet::new());
        assert_eq!(out.trigger, None);
        assert_eq!(out.delta.get(Condition::Adrenal), 8.0);
        assert_eq!(out.delta.get(Condition::Diabetes), 0.0);
    }

    #[test]
    fn good_sleep_contributes_nothing() {
        let profile = Profile {
            sleep_quality: "good".to_string(),
            ..blank()
        };
        assert!(!run(&SleepQualityRule, &profile, &MarkerSet::new()).fired());
    }

    #[test]
    fn high_stress_outranks_moderate() {
        let profile = Profile {
            stress_level: "moderate to high".to_string(),
            ..blank()
        };
        let out = run(&StressLevelRule, &profile, &MarkerSet::new());
        assert_eq!(out.trigger, Some(Trigger::HighStress));
        assert_eq!(out.delta.get(Condition::Adrenal), 20.0);
        assert_eq!(out.delta.get(Condition::Thyroid), 8.0);
        assert_eq!(out.delta.get(Condition::Diabetes), 5.0);
    }

    #[test]
    fn moderate_stress_adds_adrenal_only() {
        let profile = Profile {
            stress_level: "moderate".to_string(),
            ..blank()
        };
        let out = run(&StressLevelRule, &profile, &MarkerSet::new());
        assert_eq!(out.trigger, None);
        assert_eq!(out.delta.get(Condition::Adrenal), 10.0);
    }

    #[test]
    fn sedentary_exercise_triggers_low_activity() {
        let profile = Profile {
            exercise_frequency: "sedentary".to_string(),
            ..blank()
        };
        let out = run(&ExerciseRule, &profile, &MarkerSet::new());
        assert_eq!(out.trigger, Some(Trigger::LowPhysicalActivity));
        assert_eq!(out.delta.get(Condition::Diabetes), 12.0);
        assert_eq!(out.delta.get(Condition::Metabolic), 12.0);
    }

    #[test]
    fn regular_exercise_lowers_scores() {
        for exercise in ["3 times a week", "daily walks", "regular"] {
            let profile = Profile {
                exercise_frequency: exercise.to_string(),
                ..blank()
            };
            let out = run(&ExerciseRule, &profile, &MarkerSet::new());
            assert_eq!(out.trigger, None);
            assert_eq!(out.delta.get(Condition::Diabetes), -6.0, "{}", exercise);
            assert_eq!(out.delta.get(Condition::Metabolic), -6.0);
        }
    }

    #[test]
    fn low_activity_terms_checked_before_regular_ones() {
        // "rarely, maybe 3 times a month" hits both lists; the risk tier wins.
        let profile = Profile {
            exercise_frequency: "rarely, maybe 3 times a month".to_string(),
            ..blank()
        };
        let out = run(&ExerciseRule, &profile, &MarkerSet::new());
        assert_eq!(out.trigger, Some(Trigger::LowPhysicalActivity));
    }

    #[test]
    fn unhealthy_diet_triggers() {
        let profile = Profile {
            diet_type: "mostly processed food".to_string(),
            ..blank()
        };
        let out = run(&DietRule, &profile, &MarkerSet::new());
        assert_eq!(out.trigger, Some(Trigger::UnhealthyDiet));
        assert_eq!(out.delta.get(Condition::Diabetes), 14.0);
        assert_eq!(out.delta.get(Condition::Metabolic), 10.0);
        assert_eq!(out.delta.get(Condition::Pcos), 6.0);
    }

    #[test]
    fn healthy_diet_lowers_scores() {
        let profile = Profile {
            diet_type: "mediterranean".to_string(),
            ..blank()
        };
        let out = run(&DietRule, &profile, &MarkerSet::new());
        assert_eq!(out.trigger, None);
        assert_eq!(out.delta.get(Condition::Diabetes), -4.0);
        assert_eq!(out.delta.get(Condition::Metabolic), -4.0);
    }

    #[test]
    fn mixed_diet_contributes_nothing() {
        let profile = Profile {
            diet_type: "mixed".to_string(),
            ..blank()
        };
        assert!(!run(&DietRule, &profile, &MarkerSet::new()).fired());
    }
}
