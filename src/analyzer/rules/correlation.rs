//! Cross-factor correlation rules
//!
//! These read the normalized inputs again rather than the running scores, so a
//! disabled upstream rule does not switch a correlation off.

use super::demographics::OVERWEIGHT_BMI;
use super::lab_markers::insulin_issue;
use super::{RiskRule, RuleInput, RuleOutcome};
use crate::analyzer::scoring::{ScoreDelta, ScoreSheet};
use crate::{Condition, Trigger};

#[derive(Debug, Default)]
pub struct SleepStressCorrelationRule;

impl RiskRule for SleepStressCorrelationRule {
    fn id(&self) -> &'static str {
        "sleep-stress-correlation"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        if !(input.poor_sleep() && input.high_stress()) {
            return RuleOutcome::none();
        }
        RuleOutcome::from_delta(ScoreDelta::none().add(Condition::Adrenal, 12.0))
            .with_trigger(Trigger::SleepStressCorrelation)
    }
}

#[derive(Debug, Default)]
pub struct BmiFamilyCorrelationRule;

impl RiskRule for BmiFamilyCorrelationRule {
    fn id(&self) -> &'static str {
        "bmi-family-correlation"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        if !(input.profile.bmi >= OVERWEIGHT_BMI && input.family_mentions_diabetes()) {
            return RuleOutcome::none();
        }
        RuleOutcome::from_delta(ScoreDelta::none().add(Condition::Diabetes, 12.0))
            .with_trigger(Trigger::BmiFamilyHistoryCorrelation)
    }
}

#[derive(Debug, Default)]
pub struct CyclesInsulinCorrelationRule;

impl RiskRule for CyclesInsulinCorrelationRule {
    fn id(&self) -> &'static str {
        "cycles-insulin-correlation"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        let irregular = input.symptoms().contains("irregular cycles");
        if !(input.is_female() && irregular && insulin_issue(input)) {
            return RuleOutcome::none();
        }
        RuleOutcome::from_delta(ScoreDelta::none().add(Condition::Pcos, 15.0))
            .with_trigger(Trigger::CyclesInsulinCorrelation)
    }
}
