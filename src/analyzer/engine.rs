//! Risk engine - folds every enabled rule over the baseline scores

use crate::config::Config;
use crate::{Condition, MarkerSet, Profile, RiskAssessment, RiskLevel, RuleContribution};
use std::collections::BTreeSet;

use super::rules::{default_rules, RiskRule, RuleInput};
use super::scoring::{ScoreSheet, EXPLANATION};
use super::ScoreCalculator;

/// Main engine that orchestrates all rules
pub struct RiskEngine {
    rules: Vec<Box<dyn RiskRule>>,
    /// Attach a per-rule trace to each assessment
    trace: bool,
}

impl RiskEngine {
    /// Create an engine with every rule enabled
    pub fn new() -> Self {
        Self {
            rules: default_rules(),
            trace: false,
        }
    }

    /// Create an engine without the rules the config switches off
    pub fn from_config(config: &Config) -> Self {
        let known: BTreeSet<&str> = default_rules().iter().map(|r| r.id()).collect();
        for id in config.rules.keys() {
            if !known.contains(id.as_str()) {
                tracing::warn!(rule = %id, "config names an unknown rule");
            }
        }

        let rules = default_rules()
            .into_iter()
            .filter(|rule| config.is_rule_enabled(rule.id()))
            .collect();
        Self {
            rules,
            trace: false,
        }
    }

    /// Record each rule's contribution in the assessment
    pub fn with_trace(mut self) -> Self {
        self.trace = true;
        self
    }

    /// Ids of the enabled rules in evaluation order
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Assess a normalized profile against a marker set
    pub fn assess(&self, profile: &Profile, markers: &MarkerSet) -> RiskAssessment {
        let female = profile.is_female();
        let input = RuleInput::new(profile, markers);
        let mut sheet = ScoreSheet::baseline(female);
        let mut triggers = BTreeSet::new();
        let mut trace = Vec::new();

        for rule in &self.rules {
            let outcome = rule.evaluate(&input, &sheet);
            if !outcome.fired() {
                continue;
            }
            tracing::trace!(rule = rule.id(), trigger = ?outcome.trigger, "rule fired");
            sheet.apply(&outcome.delta);
            if let Some(trigger) = outcome.trigger {
                triggers.insert(trigger.label());
            }
            if self.trace {
                trace.push(RuleContribution {
                    rule: rule.id().to_string(),
                    delta: *outcome.delta.as_map(),
                    trigger: outcome.trigger.map(|t| t.label().to_string()),
                });
            }
        }

        let scores = sheet.clamped();
        tracing::debug!(
            thyroid = scores.thyroid,
            diabetes = scores.diabetes,
            pcos = scores.pcos,
            adrenal = scores.adrenal,
            metabolic = scores.metabolic,
            "assessment scored"
        );

        RiskAssessment {
            risk_scores: ScoreCalculator::percentages(&scores),
            risk_level: ScoreCalculator::levels(&scores),
            key_triggers: triggers.into_iter().map(str::to_string).collect(),
            explanation: EXPLANATION.to_string(),
            recommended_actions: ScoreCalculator::recommended_actions(),
            suggested_tests: ScoreCalculator::suggested_tests(female),
            rule_trace: self.trace.then_some(trace),
            scores,
        }
    }

    /// Get aggregate stats from multiple assessments
    pub fn aggregate_stats(assessments: &[RiskAssessment]) -> AggregateStats {
        let mut stats = AggregateStats {
            assessed: assessments.len(),
            ..Default::default()
        };
        for assessment in assessments {
            for condition in Condition::ALL {
                if *assessment.risk_level.get(condition) == RiskLevel::High {
                    *stats.high_counts.get_mut(condition) += 1;
                }
            }
            if assessment.max_level() == RiskLevel::High {
                stats.with_any_high += 1;
            }
        }
        stats
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Assess with the built-in rule set
pub fn calculate_risk(profile: &Profile, markers: &MarkerSet) -> RiskAssessment {
    RiskEngine::new().assess(profile, markers)
}

/// Aggregate statistics from a batch of assessments
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AggregateStats {
    /// Number of requests assessed
    pub assessed: usize,
    /// Requests with at least one High condition
    pub with_any_high: usize,
    /// Per-condition count of High results
    pub high_counts: crate::ConditionMap<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleToggle;
    use crate::{Marker, ProfileDefaults, Trigger};

    fn blank() -> Profile {
        Profile::with_defaults(&ProfileDefaults::neutral())
    }

    #[test]
    fn blank_profile_scores_baseline() {
        let result = RiskEngine::new().assess(&blank(), &MarkerSet::new());
        assert_eq!(result.risk_scores.thyroid, "20%");
        assert_eq!(result.risk_scores.diabetes, "20%");
        assert_eq!(result.risk_scores.pcos, "0%");
        assert_eq!(result.risk_scores.adrenal, "20%");
        assert_eq!(result.risk_scores.metabolic, "20%");
        assert!(result.key_triggers.is_empty());
        assert_eq!(result.max_level(), RiskLevel::Low);
        assert_eq!(result.rule_trace, None);
    }

    #[test]
    fn documented_defaults_shift_empty_profile() {
        let result = RiskEngine::new().assess(&Profile::default(), &MarkerSet::new());
        assert_eq!(result.risk_scores.adrenal, "38%");
        assert_eq!(result.risk_scores.diabetes, "32%");
        assert_eq!(result.risk_scores.metabolic, "32%");
        assert_eq!(result.risk_level.adrenal, RiskLevel::Moderate);
        assert_eq!(result.key_triggers, vec![Trigger::LowPhysicalActivity.label()]);
    }

    #[test]
    fn female_baseline_for_pcos() {
        let profile = Profile {
            gender: "female".to_string(),
            ..blank()
        };
        let result = RiskEngine::new().assess(&profile, &MarkerSet::new());
        assert_eq!(result.risk_scores.pcos, "15%");
        assert_eq!(result.suggested_tests.len(), 6);
    }

    #[test]
    fn triggers_are_sorted_and_unique() {
        let profile = Profile {
            bmi: 31.0,
            sleep_quality: "poor".to_string(),
            stress_level: "high".to_string(),
            ..blank()
        };
        let markers = MarkerSet::new().with(Marker::Tsh, 6.0);
        let result = RiskEngine::new().assess(&profile, &markers);

        let mut sorted = result.key_triggers.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(result.key_triggers, sorted);
        assert!(result.has_trigger("Abnormal TSH"));
        assert!(result.has_trigger("Poor sleep + high stress correlation"));
    }

    #[test]
    fn scores_clamp_to_range() {
        let profile = Profile {
            bmi: 35.0,
            exercise_frequency: "none".to_string(),
            diet_type: "junk".to_string(),
            family_history: "diabetes".to_string(),
            symptoms: vec!["increased thirst".to_string()],
            ..blank()
        };
        let markers = MarkerSet::new()
            .with(Marker::HbA1c, 8.0)
            .with(Marker::FastingGlucose, 180.0);
        let result = RiskEngine::new().assess(&profile, &markers);
        assert_eq!(result.risk_scores.diabetes, "100%");
        assert_eq!(result.scores.diabetes, 100.0);

        let healthy = Profile {
            exercise_frequency: "daily".to_string(),
            diet_type: "balanced".to_string(),
            ..blank()
        };
        let result = RiskEngine::new().assess(&healthy, &MarkerSet::new());
        assert_eq!(result.risk_scores.diabetes, "10%");
        assert_eq!(result.risk_scores.pcos, "0%");
    }

    #[test]
    fn trace_lists_fired_rules_in_order() {
        let profile = Profile {
            bmi: 27.0,
            stress_level: "high".to_string(),
            ..blank()
        };
        let result = RiskEngine::new().with_trace().assess(&profile, &MarkerSet::new());
        let trace = result.rule_trace.expect("trace requested");
        let ids: Vec<_> = trace.iter().map(|c| c.rule.as_str()).collect();
        assert_eq!(ids, vec!["bmi-tier", "stress-level"]);
        assert_eq!(trace[0].trigger.as_deref(), Some("Overweight BMI"));
        assert_eq!(trace[1].delta.adrenal, 20.0);
    }

    #[test]
    fn config_can_disable_rules() {
        let mut config = Config::default();
        config.rules.insert("tsh".to_string(), RuleToggle::Off);
        config.rules.insert("not-a-rule".to_string(), RuleToggle::Off);
        let engine = RiskEngine::from_config(&config);

        assert!(!engine.rule_ids().contains(&"tsh"));
        assert_eq!(engine.rule_ids().len(), RiskEngine::new().rule_ids().len() - 1);

        let markers = MarkerSet::new().with(Marker::Tsh, 9.0);
        let result = engine.assess(&blank(), &markers);
        assert!(!result.has_trigger("Abnormal TSH"));
        assert_eq!(result.risk_scores.thyroid, "20%");
    }

    #[test]
    fn aggregate_counts_high_conditions() {
        let engine = RiskEngine::new();
        let low = engine.assess(&blank(), &MarkerSet::new());
        let high = engine.assess(
            &blank(),
            &MarkerSet::new()
                .with(Marker::HbA1c, 7.0)
                .with(Marker::FastingGlucose, 140.0),
        );
        let stats = RiskEngine::aggregate_stats(&[low, high]);
        assert_eq!(stats.assessed, 2);
        assert_eq!(stats.with_any_high, 1);
        assert_eq!(stats.high_counts.diabetes, 1);
        assert_eq!(stats.high_counts.thyroid, 0);
    }

    #[test]
    fn calculate_risk_matches_default_engine() {
        let profile = Profile {
            bmi: 30.0,
            ..blank()
        };
        let markers = MarkerSet::new();
        assert_eq!(
            calculate_risk(&profile, &markers),
            RiskEngine::new().assess(&profile, &markers)
        );
    }
}
