//! Config schema and deserialization

use crate::{ProfileDefaults, RiskLevel};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Rule toggle (on, off)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleToggle {
    On,
    /// Leave the rule out of the pipeline
    Off,
}

/// Overrides for the profile text defaults. Unset fields keep the built-in value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diet_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_history: Option<String>,
}

impl DefaultsConfig {
    /// Apply the set fields over `base`
    pub fn apply_to(&self, base: ProfileDefaults) -> ProfileDefaults {
        fn pick(value: &Option<String>, fallback: String) -> String {
            value.clone().unwrap_or(fallback)
        }
        ProfileDefaults {
            gender: pick(&self.gender, base.gender),
            sleep_quality: pick(&self.sleep_quality, base.sleep_quality),
            stress_level: pick(&self.stress_level, base.stress_level),
            exercise_frequency: pick(&self.exercise_frequency, base.exercise_frequency),
            diet_type: pick(&self.diet_type, base.diet_type),
            family_history: pick(&self.family_history, base.family_history),
        }
    }

    /// Fill fields this config leaves unset from `base`
    fn merge_from(&mut self, base: DefaultsConfig) {
        self.gender = self.gender.take().or(base.gender);
        self.sleep_quality = self.sleep_quality.take().or(base.sleep_quality);
        self.stress_level = self.stress_level.take().or(base.stress_level);
        self.exercise_frequency = self.exercise_frequency.take().or(base.exercise_frequency);
        self.diet_type = self.diet_type.take().or(base.diet_type);
        self.family_history = self.family_history.take().or(base.family_history);
    }
}

pub const DEFAULT_MAX_RECORDS: usize = 500;
pub const HISTORY_FILENAME: &str = ".endorisk-history.json";

/// Assessment history settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Record assessments (default: true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Oldest records are dropped past this count (default: 500)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_records: Option<usize>,

    /// History file, relative to the project root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl HistoryConfig {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn max_records(&self) -> usize {
        self.max_records.unwrap_or(DEFAULT_MAX_RECORDS)
    }

    pub fn file_name(&self) -> &str {
        self.file.as_deref().unwrap_or(HISTORY_FILENAME)
    }

    fn merge_from(&mut self, base: HistoryConfig) {
        self.enabled = self.enabled.or(base.enabled);
        self.max_records = self.max_records.or(base.max_records);
        self.file = self.file.take().or(base.file);
    }
}

/// Parse a `failOn` threshold. Every assessment is at least Low, so only
/// Moderate and High are accepted.
pub fn parse_fail_level(s: &str) -> Result<RiskLevel, String> {
    match s.parse::<RiskLevel>()? {
        RiskLevel::Low => Err("fail-on level must be moderate or high".to_string()),
        level => Ok(level),
    }
}

fn deserialize_fail_level<'de, D>(deserializer: D) -> Result<Option<RiskLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RiskLevel>::deserialize(deserializer)? {
        Some(RiskLevel::Low) => Err(serde::de::Error::custom(
            "failOn must be \"moderate\" or \"high\"",
        )),
        level => Ok(level),
    }
}

/// Root config structure for .endoriskrc.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Text defaults for missing profile fields
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Per-rule toggles. Key is the rule id in kebab-case.
    #[serde(default)]
    pub rules: HashMap<String, RuleToggle>,

    /// Glob patterns for request files to skip in batch mode
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Exit 1 when any condition reaches this level (moderate or high)
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_fail_level"
    )]
    pub fail_on: Option<RiskLevel>,

    #[serde(default)]
    pub history: HistoryConfig,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_fail_on: Option<RiskLevel>, no_history: bool) -> Self {
        if cli_fail_on.is_some() {
            self.fail_on = cli_fail_on;
        }
        if no_history {
            self.history.enabled = Some(false);
        }
        self
    }

    /// Toggle for a rule, or None if the config does not mention it
    pub fn rule_toggle(&self, rule_id: &str) -> Option<RuleToggle> {
        self.rules.get(rule_id).copied()
    }

    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        self.rule_toggle(rule_id) != Some(RuleToggle::Off)
    }

    /// Built-in profile defaults with this config's overrides applied
    pub fn profile_defaults(&self) -> ProfileDefaults {
        self.defaults.apply_to(ProfileDefaults::default())
    }

    /// True when `level` meets the configured failure level
    pub fn fails_at(&self, level: RiskLevel) -> bool {
        self.fail_on.is_some_and(|threshold| level >= threshold)
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.extends.is_none() {
            self.extends = base.extends;
        }
        if self.fail_on.is_none() {
            self.fail_on = base.fail_on;
        }

        self.defaults.merge_from(base.defaults);
        self.history.merge_from(base.history);

        for (rule, toggle) in base.rules {
            self.rules.entry(rule).or_insert(toggle);
        }

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;
    }
}
