//! Symptom clusters
//!
//! The thyroid and glycemic clusters adjust scores without recording a
//! trigger; only the PCOS cluster surfaces one.

use super::{contains_any, RiskRule, RuleInput, RuleOutcome};
use crate::analyzer::scoring::{ScoreDelta, ScoreSheet};
use crate::{Condition, Trigger};

const THYROID_SYMPTOMS: &[&str] = &[
    "fatigue",
    "weight gain",
    "cold intolerance",
    "hair loss",
    "dry skin",
];
const GLYCEMIC_SYMPTOMS: &[&str] = &[
    "acanthosis",
    "increased thirst",
    "frequent urination",
    "sugar cravings",
];
const PCOS_SYMPTOMS: &[&str] = &["irregular cycles", "acne", "hirsutism", "ovarian cyst"];

#[derive(Debug, Default)]
pub struct ThyroidSymptomRule;

impl RiskRule for ThyroidSymptomRule {
    fn id(&self) -> &'static str {
        "thyroid-symptoms"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        if !contains_any(input.symptoms(), THYROID_SYMPTOMS) {
            return RuleOutcome::none();
        }
        RuleOutcome::from_delta(
            ScoreDelta::none()
                .add(Condition::Thyroid, 12.0)
                .add(Condition::Adrenal, 8.0),
        )
    }
}

#[derive(Debug, Default)]
pub struct GlycemicSymptomRule;

impl RiskRule for GlycemicSymptomRule {
    fn id(&self) -> &'static str {
        "glycemic-symptoms"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        if !contains_any(input.symptoms(), GLYCEMIC_SYMPTOMS) {
            return RuleOutcome::none();
        }
        RuleOutcome::from_delta(ScoreDelta::none().add(Condition::Diabetes, 15.0))
    }
}

#[derive(Debug, Default)]
pub struct PcosSymptomRule;

impl RiskRule for PcosSymptomRule {
    fn id(&self) -> &'static str {
        "pcos-symptoms"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        if !(input.is_female() && contains_any(input.symptoms(), PCOS_SYMPTOMS)) {
            return RuleOutcome::none();
        }
        RuleOutcome::from_delta(ScoreDelta::none().add(Condition::Pcos, 20.0))
            .with_trigger(Trigger::PcosSymptomPattern)
    }
}
