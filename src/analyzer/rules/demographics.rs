//! BMI tier and age rules

use super::{RiskRule, RuleInput, RuleOutcome};
use crate::analyzer::scoring::{ScoreDelta, ScoreSheet};
use crate::{Condition, Trigger};

pub const OBESE_BMI: f64 = 30.0;
pub const OVERWEIGHT_BMI: f64 = 25.0;
pub const AGE_THRESHOLD: f64 = 40.0;

/// BMI ≥ 30 or BMI ≥ 25; the tiers are mutually exclusive
#[derive(Debug, Default)]
pub struct BmiTierRule;

impl RiskRule for BmiTierRule {
    fn id(&self) -> &'static str {
        "bmi-tier"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        let bmi = input.profile.bmi;
        if bmi >= OBESE_BMI {
            RuleOutcome::from_delta(
                ScoreDelta::none()
                    .add(Condition::Diabetes, 20.0)
                    .add(Condition::Metabolic, 25.0)
                    .add(Condition::Pcos, 10.0),
            )
            .with_trigger(Trigger::HighBmi)
        } else if bmi >= OVERWEIGHT_BMI {
            RuleOutcome::from_delta(
                ScoreDelta::none()
                    .add(Condition::Diabetes, 12.0)
                    .add(Condition::Metabolic, 15.0)
                    .add(Condition::Pcos, 6.0),
            )
            .with_trigger(Trigger::OverweightBmi)
        } else {
            RuleOutcome::none()
        }
    }
}

/// Age 40 and over raises diabetes and metabolic risk; no trigger
#[derive(Debug, Default)]
pub struct AgeRule;

impl RiskRule for AgeRule {
    fn id(&self) -> &'static str {
        "age"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        if input.profile.age >= AGE_THRESHOLD {
            RuleOutcome::from_delta(
                ScoreDelta::none()
                    .add(Condition::Diabetes, 8.0)
                    .add(Condition::Metabolic, 8.0),
            )
        } else {
            RuleOutcome::none()
        }
    }
}
