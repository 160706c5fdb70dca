//! Assessment requests: the unit of work the CLI processes
//!
//! A request document is either a bare profile object or
//! `{"profile": {...}, "lab_report_text": "...", "patient_name": "..."}`.

use crate::{
    extract_markers, InputError, MarkerSet, Profile, ProfileDefaults, RiskAssessment, RiskEngine,
};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

pub const DEFAULT_PATIENT_NAME: &str = "Anonymous";

const KEY_PROFILE: &str = "profile";
const KEY_LAB_TEXT: &str = "lab_report_text";
const KEY_PATIENT_NAME: &str = "patient_name";

#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentRequest {
    /// The profile document as supplied
    pub profile: Value,
    pub lab_report_text: Option<String>,
    pub patient_name: String,
}

impl AssessmentRequest {
    /// A request around a bare profile document
    pub fn for_profile(profile: Value) -> Self {
        Self {
            profile,
            lab_report_text: None,
            patient_name: DEFAULT_PATIENT_NAME.to_string(),
        }
    }

    /// Accept either request shape. Anything that is not an object is rejected,
    /// and so is a `profile` key holding anything but an object.
    pub fn from_value(value: Value) -> Result<Self, InputError> {
        let Value::Object(mut obj) = value else {
            return Err(InputError::NotAnObject);
        };

        match obj.get(KEY_PROFILE) {
            None => return Ok(Self::for_profile(Value::Object(obj))),
            Some(Value::Object(_)) => {}
            Some(_) => return Err(InputError::NotAnObject),
        }

        let profile = obj.remove(KEY_PROFILE).unwrap_or(Value::Null);
        let lab_report_text = obj
            .get(KEY_LAB_TEXT)
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string);
        let patient_name = obj
            .get(KEY_PATIENT_NAME)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_PATIENT_NAME)
            .to_string();

        Ok(Self {
            profile,
            lab_report_text,
            patient_name,
        })
    }

    /// Read a request document from disk
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read request: {}", path.display()))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in request: {}", path.display()))?;
        Self::from_value(value).with_context(|| format!("Invalid request: {}", path.display()))
    }

    pub fn with_lab_text(mut self, text: String) -> Self {
        self.lab_report_text = Some(text);
        self
    }

    pub fn with_patient_name(mut self, name: String) -> Self {
        self.patient_name = name;
        self
    }

    /// Run the full pipeline: normalize the profile, extract markers from the
    /// lab text, merge explicit values over them, and score.
    ///
    /// Precedence, lowest to highest: extracted text, `explicit` (a markers
    /// file), then the profile's embedded lab results.
    pub fn assess(
        &self,
        engine: &RiskEngine,
        defaults: &ProfileDefaults,
        explicit: Option<&MarkerSet>,
    ) -> Result<AssessedRequest, InputError> {
        let profile = Profile::from_value(&self.profile, defaults)?;

        let extracted = self
            .lab_report_text
            .as_deref()
            .map(extract_markers)
            .unwrap_or_default();

        let mut merged = extracted;
        if let Some(explicit) = explicit {
            merged.merge_explicit(explicit);
        }
        merged.merge_explicit(&profile.lab_results);
        tracing::debug!(
            extracted = extracted.present_count(),
            merged = merged.present_count(),
            "markers merged"
        );

        let assessment = engine.assess(&profile, &merged);
        Ok(AssessedRequest {
            profile,
            markers: merged,
            response: AssessmentResponse::success(extracted, assessment),
        })
    }
}

/// A request after scoring
#[derive(Debug, Clone)]
pub struct AssessedRequest {
    pub profile: Profile,
    /// Markers the engine saw
    pub markers: MarkerSet,
    pub response: AssessmentResponse,
}

/// JSON body printed by `assess --json`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentResponse {
    pub status: &'static str,
    pub extracted_markers: MarkerSet,
    pub assessment: RiskAssessment,
}

impl AssessmentResponse {
    pub fn success(extracted_markers: MarkerSet, assessment: RiskAssessment) -> Self {
        Self {
            status: "success",
            extracted_markers,
            assessment,
        }
    }
}

/// JSON body printed by `extract`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResponse {
    pub extracted_markers: MarkerSet,
}
