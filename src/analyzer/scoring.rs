//! Score accumulation, clamping, and the fixed report text

use crate::{format_percent, Condition, ConditionMap, RiskLevel};

/// Starting score for every condition except PCOS
pub const BASELINE: f64 = 20.0;
/// Starting PCOS score for female profiles (others start at 0)
pub const PCOS_FEMALE_BASELINE: f64 = 15.0;

pub const EXPLANATION: &str = "Risk scores were calculated using weighted lifestyle factors, \
symptom clustering, family history, available lab markers, and correlation logic for adrenal, \
diabetes, and PCOS pathways.";

pub const RECOMMENDED_ACTIONS: [&str; 5] = [
    "Improve sleep hygiene (7-8 hours with fixed timing)",
    "Exercise at least 150 minutes/week",
    "Lower processed sugar and refined carbohydrates",
    "Use daily stress reduction techniques",
    "Review findings with an endocrinologist",
];

pub const SUGGESTED_TESTS: [&str; 5] = [
    "TSH, Free T3, Free T4",
    "HbA1c and fasting glucose",
    "Fasting insulin and HOMA-IR",
    "Morning cortisol",
    "Lipid profile",
];

pub const FEMALE_SUGGESTED_TEST: &str =
    "LH, FSH, Testosterone, pelvic ultrasound (if PCOS suspected)";

/// Points a single rule adds to (or removes from) each condition
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreDelta(ConditionMap<f64>);

impl ScoreDelta {
    pub fn none() -> Self {
        Self::default()
    }

    /// Add `points` to one condition
    pub fn add(mut self, condition: Condition, points: f64) -> Self {
        *self.0.get_mut(condition) += points;
        self
    }

    pub fn get(&self, condition: Condition) -> f64 {
        *self.0.get(condition)
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|(_, v)| *v == 0.0)
    }

    pub fn as_map(&self) -> &ConditionMap<f64> {
        &self.0
    }
}

/// Running totals while rules are folded in. Unclamped until `clamped()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSheet {
    scores: ConditionMap<f64>,
}

impl ScoreSheet {
    pub fn baseline(female: bool) -> Self {
        let scores = ConditionMap::from_fn(|c| match c {
            Condition::Pcos if female => PCOS_FEMALE_BASELINE,
            Condition::Pcos => 0.0,
            _ => BASELINE,
        });
        Self { scores }
    }

    pub fn apply(&mut self, delta: &ScoreDelta) {
        for condition in Condition::ALL {
            *self.scores.get_mut(condition) += delta.get(condition);
        }
    }

    pub fn get(&self, condition: Condition) -> f64 {
        *self.scores.get(condition)
    }

    /// Every score restricted to [0, 100]
    pub fn clamped(&self) -> ConditionMap<f64> {
        self.scores.map(|v| v.clamp(0.0, 100.0))
    }
}

/// Turns clamped scores into the rendered parts of an assessment
pub struct ScoreCalculator;

impl ScoreCalculator {
    pub fn percentages(scores: &ConditionMap<f64>) -> ConditionMap<String> {
        scores.map(|v| format_percent(*v))
    }

    pub fn levels(scores: &ConditionMap<f64>) -> ConditionMap<RiskLevel> {
        scores.map(|v| RiskLevel::from_score(*v))
    }

    pub fn recommended_actions() -> Vec<String> {
        RECOMMENDED_ACTIONS.iter().map(|s| s.to_string()).collect()
    }

    /// Five fixed tests, plus the PCOS work-up line for female profiles
    pub fn suggested_tests(female: bool) -> Vec<String> {
        let mut tests: Vec<String> = SUGGESTED_TESTS.iter().map(|s| s.to_string()).collect();
        if female {
            tests.push(FEMALE_SUGGESTED_TEST.to_string());
        }
        tests
    }

    /// Short description of a level for console output
    pub fn level_description(level: RiskLevel) -> &'static str {
        match level {
            RiskLevel::Low => "No strong signal from the supplied inputs",
            RiskLevel::Moderate => "Several contributing factors; consider targeted tests",
            RiskLevel::High => "Multiple strong factors; review with a specialist",
        }
    }
}
