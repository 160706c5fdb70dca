//! Family history lookups. The three checks are independent.

use super::{contains_any, RiskRule, RuleInput, RuleOutcome};
use crate::analyzer::scoring::{ScoreDelta, ScoreSheet};
use crate::{Condition, Trigger};

const THYROID_FAMILY_TERMS: &[&str] = &["thyroid", "hypothyroid", "hyperthyroid", "hashimoto"];

#[derive(Debug, Default)]
pub struct FamilyDiabetesRule;

impl RiskRule for FamilyDiabetesRule {
    fn id(&self) -> &'static str {
        "family-history-diabetes"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        if !input.family_mentions_diabetes() {
            return RuleOutcome::none();
        }
        RuleOutcome::from_delta(
            ScoreDelta::none()
                .add(Condition::Diabetes, 20.0)
                .add(Condition::Metabolic, 10.0),
        )
        .with_trigger(Trigger::FamilyHistoryDiabetes)
    }
}

#[derive(Debug, Default)]
pub struct FamilyThyroidRule;

impl RiskRule for FamilyThyroidRule {
    fn id(&self) -> &'static str {
        "family-history-thyroid"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        if !contains_any(&input.profile.family_history, THYROID_FAMILY_TERMS) {
            return RuleOutcome::none();
        }
        RuleOutcome::from_delta(ScoreDelta::none().add(Condition::Thyroid, 20.0))
            .with_trigger(Trigger::FamilyHistoryThyroid)
    }
}

/// Only counts for female profiles
#[derive(Debug, Default)]
pub struct FamilyPcosRule;

impl RiskRule for FamilyPcosRule {
    fn id(&self) -> &'static str {
        "family-history-pcos"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        if !(input.is_female() && input.profile.family_history.contains("pcos")) {
            return RuleOutcome::none();
        }
        RuleOutcome::from_delta(ScoreDelta::none().add(Condition::Pcos, 20.0))
            .with_trigger(Trigger::FamilyHistoryPcos)
    }
}
