//! Lab marker thresholds. A rule is skipped when its marker is absent.

use super::{RiskRule, RuleInput, RuleOutcome};
use crate::analyzer::scoring::{ScoreDelta, ScoreSheet};
use crate::{Condition, Marker, Trigger};

pub const TSH_HIGH: f64 = 4.5;
pub const TSH_LOW: f64 = 0.4;
pub const T3_LOW: f64 = 2.0;
pub const T4_LOW: f64 = 0.8;
pub const HBA1C_DIABETIC: f64 = 6.5;
pub const HBA1C_PREDIABETIC: f64 = 5.7;
pub const GLUCOSE_DIABETIC: f64 = 126.0;
pub const GLUCOSE_IMPAIRED: f64 = 100.0;
pub const INSULIN_HIGH: f64 = 15.0;
pub const CORTISOL_HIGH: f64 = 20.0;
pub const CORTISOL_LOW: f64 = 5.0;
pub const CHOLESTEROL_HIGH: f64 = 200.0;

/// Insulin above range or HbA1c in the prediabetic range or higher
pub(crate) fn insulin_issue(input: &RuleInput<'_>) -> bool {
    input.marker(Marker::Insulin).is_some_and(|v| v > INSULIN_HIGH)
        || input
            .marker(Marker::HbA1c)
            .is_some_and(|v| v >= HBA1C_PREDIABETIC)
}

#[derive(Debug, Default)]
pub struct TshRule;

impl RiskRule for TshRule {
    fn id(&self) -> &'static str {
        "tsh"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        match input.marker(Marker::Tsh) {
            Some(tsh) if tsh > TSH_HIGH || tsh < TSH_LOW => {
                RuleOutcome::from_delta(ScoreDelta::none().add(Condition::Thyroid, 25.0))
                    .with_trigger(Trigger::AbnormalTsh)
            }
            _ => RuleOutcome::none(),
        }
    }
}

#[derive(Debug, Default)]
pub struct T3Rule;

impl RiskRule for T3Rule {
    fn id(&self) -> &'static str {
        "t3"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        match input.marker(Marker::T3) {
            Some(t3) if t3 < T3_LOW => {
                RuleOutcome::from_delta(ScoreDelta::none().add(Condition::Thyroid, 10.0))
            }
            _ => RuleOutcome::none(),
        }
    }
}

#[derive(Debug, Default)]
pub struct T4Rule;

impl RiskRule for T4Rule {
    fn id(&self) -> &'static str {
        "t4"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        match input.marker(Marker::T4) {
            Some(t4) if t4 < T4_LOW => {
                RuleOutcome::from_delta(ScoreDelta::none().add(Condition::Thyroid, 10.0))
            }
            _ => RuleOutcome::none(),
        }
    }
}

/// Diabetic (≥ 6.5) and prediabetic (≥ 5.7) tiers; mutually exclusive
#[derive(Debug, Default)]
pub struct Hba1cRule;

impl RiskRule for Hba1cRule {
    fn id(&self) -> &'static str {
        "hba1c"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        match input.marker(Marker::HbA1c) {
            Some(v) if v >= HBA1C_DIABETIC => RuleOutcome::from_delta(
                ScoreDelta::none()
                    .add(Condition::Diabetes, 35.0)
                    .add(Condition::Metabolic, 20.0),
            )
            .with_trigger(Trigger::DiabeticHba1c),
            Some(v) if v >= HBA1C_PREDIABETIC => RuleOutcome::from_delta(
                ScoreDelta::none()
                    .add(Condition::Diabetes, 18.0)
                    .add(Condition::Metabolic, 10.0),
            )
            .with_trigger(Trigger::PrediabeticHba1c),
            _ => RuleOutcome::none(),
        }
    }
}

/// ≥ 126 records a trigger; the 100–125 tier only adds points
#[derive(Debug, Default)]
pub struct FastingGlucoseRule;

impl RiskRule for FastingGlucoseRule {
    fn id(&self) -> &'static str {
        "fasting-glucose"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        match input.marker(Marker::FastingGlucose) {
            Some(v) if v >= GLUCOSE_DIABETIC => RuleOutcome::from_delta(
                ScoreDelta::none()
                    .add(Condition::Diabetes, 30.0)
                    .add(Condition::Metabolic, 15.0),
            )
            .with_trigger(Trigger::HighFastingGlucose),
            Some(v) if v >= GLUCOSE_IMPAIRED => RuleOutcome::from_delta(
                ScoreDelta::none()
                    .add(Condition::Diabetes, 15.0)
                    .add(Condition::Metabolic, 8.0),
            ),
            _ => RuleOutcome::none(),
        }
    }
}

#[derive(Debug, Default)]
pub struct InsulinRule;

impl RiskRule for InsulinRule {
    fn id(&self) -> &'static str {
        "insulin"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        match input.marker(Marker::Insulin) {
            Some(v) if v > INSULIN_HIGH => RuleOutcome::from_delta(
                ScoreDelta::none()
                    .add(Condition::Diabetes, 15.0)
                    .add(Condition::Pcos, 12.0)
                    .add(Condition::Metabolic, 10.0),
            )
            .with_trigger(Trigger::ElevatedInsulin),
            _ => RuleOutcome::none(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CortisolRule;

impl RiskRule for CortisolRule {
    fn id(&self) -> &'static str {
        "cortisol"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        match input.marker(Marker::Cortisol) {
            Some(v) if v > CORTISOL_HIGH || v < CORTISOL_LOW => {
                RuleOutcome::from_delta(ScoreDelta::none().add(Condition::Adrenal, 20.0))
                    .with_trigger(Trigger::AbnormalCortisol)
            }
            _ => RuleOutcome::none(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CholesterolRule;

impl RiskRule for CholesterolRule {
    fn id(&self) -> &'static str {
        "cholesterol"
    }

    fn evaluate(&self, input: &RuleInput<'_>, _scores: &ScoreSheet) -> RuleOutcome {
        match input.marker(Marker::Cholesterol) {
            Some(v) if v >= CHOLESTEROL_HIGH => {
                RuleOutcome::from_delta(ScoreDelta::none().add(Condition::Metabolic, 15.0))
                    .with_trigger(Trigger::HighCholesterol)
            }
            _ => RuleOutcome::none(),
        }
    }
}
