//! Profile input: field names, defaults, and normalization

pub mod coerce;

use crate::{InputError, MarkerSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FIELD_AGE: &str = "Age";
pub const FIELD_GENDER: &str = "Gender";
pub const FIELD_BMI: &str = "BMI";
pub const FIELD_SLEEP_QUALITY: &str = "Sleep quality";
pub const FIELD_STRESS_LEVEL: &str = "Stress level";
pub const FIELD_EXERCISE_FREQUENCY: &str = "Exercise frequency";
pub const FIELD_DIET_TYPE: &str = "Diet type";
pub const FIELD_FAMILY_HISTORY: &str = "Family history";
pub const FIELD_SYMPTOMS: &str = "Symptoms";
pub const FIELD_LAB_RESULTS: &str = "Lab results (optional)";

/// Values used for text fields that are missing from a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDefaults {
    pub gender: String,
    pub sleep_quality: String,
    pub stress_level: String,
    pub exercise_frequency: String,
    pub diet_type: String,
    pub family_history: String,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            gender: String::new(),
            sleep_quality: "average".to_string(),
            stress_level: "moderate".to_string(),
            exercise_frequency: "low".to_string(),
            diet_type: "mixed".to_string(),
            family_history: String::new(),
        }
    }
}

impl ProfileDefaults {
    /// Defaults that trigger no lifestyle rule, so a missing field scores nothing
    pub fn neutral() -> Self {
        Self {
            gender: String::new(),
            sleep_quality: String::new(),
            stress_level: String::new(),
            exercise_frequency: String::new(),
            diet_type: String::new(),
            family_history: String::new(),
        }
    }
}

/// A normalized profile. Text fields are trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub age: f64,
    pub gender: String,
    pub bmi: f64,
    pub sleep_quality: String,
    pub stress_level: String,
    pub exercise_frequency: String,
    pub diet_type: String,
    pub family_history: String,
    pub symptoms: Vec<String>,
    /// Markers embedded under "Lab results (optional)"
    pub lab_results: MarkerSet,
}

impl Default for Profile {
    fn default() -> Self {
        Self::with_defaults(&ProfileDefaults::default())
    }
}

impl Profile {
    /// An empty profile with the given defaults applied
    pub fn with_defaults(defaults: &ProfileDefaults) -> Self {
        Self {
            age: 0.0,
            gender: coerce::normalize(&defaults.gender),
            bmi: 0.0,
            sleep_quality: coerce::normalize(&defaults.sleep_quality),
            stress_level: coerce::normalize(&defaults.stress_level),
            exercise_frequency: coerce::normalize(&defaults.exercise_frequency),
            diet_type: coerce::normalize(&defaults.diet_type),
            family_history: coerce::normalize(&defaults.family_history),
            symptoms: Vec::new(),
            lab_results: MarkerSet::new(),
        }
    }

    /// Build a profile from a JSON object keyed by the documented field names.
    ///
    /// Only a non-numeric `Age` or `BMI` is an error; every other field falls
    /// back to its default. Unknown keys are ignored.
    pub fn from_value(value: &Value, defaults: &ProfileDefaults) -> Result<Self, InputError> {
        let obj = value.as_object().ok_or(InputError::NotAnObject)?;

        let lab_results = match obj.get(FIELD_LAB_RESULTS) {
            Some(labs) => MarkerSet::from_value(labs),
            None => MarkerSet::new(),
        };

        Ok(Self {
            age: coerce::number(FIELD_AGE, obj.get(FIELD_AGE))?,
            gender: coerce::text(obj.get(FIELD_GENDER), &defaults.gender),
            bmi: coerce::number(FIELD_BMI, obj.get(FIELD_BMI))?,
            sleep_quality: coerce::text(obj.get(FIELD_SLEEP_QUALITY), &defaults.sleep_quality),
            stress_level: coerce::text(obj.get(FIELD_STRESS_LEVEL), &defaults.stress_level),
            exercise_frequency: coerce::text(
                obj.get(FIELD_EXERCISE_FREQUENCY),
                &defaults.exercise_frequency,
            ),
            diet_type: coerce::text(obj.get(FIELD_DIET_TYPE), &defaults.diet_type),
            family_history: coerce::text(obj.get(FIELD_FAMILY_HISTORY), &defaults.family_history),
            symptoms: coerce::text_list(obj.get(FIELD_SYMPTOMS)),
            lab_results,
        })
    }

    /// PCOS rules only apply to female profiles
    pub fn is_female(&self) -> bool {
        self.gender == "female"
    }

    /// Symptom tags joined with single spaces, for substring tests
    pub fn symptom_text(&self) -> String {
        self.symptoms.join(" ")
    }
}
