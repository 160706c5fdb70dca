//! Assessment history - persist records to .endorisk-history.json

use crate::request::AssessedRequest;
use crate::{Condition, ConditionMap, RiskAssessment};
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct HistoryFile {
    /// Oldest first, as appended
    pub records: Vec<AssessmentRecord>,
}

/// One stored assessment. Records are never modified after they are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: u64,
    /// RFC 3339, UTC, seconds precision
    pub created_at: String,
    pub patient_name: String,
    pub age: f64,
    pub gender: String,
    pub bmi: f64,
    pub risk_scores: ConditionMap<String>,
    /// The profile document as submitted
    pub profile: Value,
    pub result: RiskAssessment,
}

impl AssessmentRecord {
    /// Integer percentage stored for a condition, if it parses
    pub fn percent(&self, condition: Condition) -> Option<u8> {
        self.risk_scores
            .get(condition)
            .trim_end_matches('%')
            .parse()
            .ok()
    }
}

/// Load history from a file (or create empty). A corrupt file loads as empty.
pub fn load_history(path: &Path) -> HistoryFile {
    let Ok(content) = fs::read_to_string(path) else {
        return HistoryFile::default();
    };
    match serde_json::from_str::<HistoryFile>(&content) {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable history file");
            HistoryFile::default()
        }
    }
}

/// Save history to a file
pub fn save_history(path: &Path, history: &HistoryFile) -> Result<()> {
    let content = serde_json::to_string_pretty(history).context("Failed to serialize history")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write history: {}", path.display()))
}

/// Build a record for an assessed request and append it, dropping the oldest
/// records beyond `max_records`. Returns the new record's id.
pub fn append_record(
    history: &mut HistoryFile,
    patient_name: &str,
    profile_doc: &Value,
    assessed: &AssessedRequest,
    max_records: usize,
) -> u64 {
    let id = history.records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
    let assessment = &assessed.response.assessment;
    history.records.push(AssessmentRecord {
        id,
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        patient_name: patient_name.to_string(),
        age: assessed.profile.age,
        gender: assessed.profile.gender.clone(),
        bmi: assessed.profile.bmi,
        risk_scores: assessment.risk_scores.clone(),
        profile: profile_doc.clone(),
        result: assessment.clone(),
    });
    if history.records.len() > max_records {
        let excess = history.records.len() - max_records;
        history.records.drain(0..excess);
    }
    id
}

/// Records newest first, at most `limit` of them
pub fn newest_first(history: &HistoryFile, limit: Option<usize>) -> Vec<&AssessmentRecord> {
    history
        .records
        .iter()
        .rev()
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}

/// Latest stored record for a patient
pub fn previous_for<'a>(history: &'a HistoryFile, patient_name: &str) -> Option<&'a AssessmentRecord> {
    history
        .records
        .iter()
        .rev()
        .find(|r| r.patient_name == patient_name)
}

/// Format delta for console: "[was 42, down 4]" or "[was 42, up 2]" or ""
pub fn format_delta(previous: Option<u8>, current: u8) -> String {
    let Some(prev) = previous else {
        return String::new();
    };
    if prev == current {
        return format!(" [unchanged at {}]", current);
    }
    let diff = current as i16 - prev as i16;
    if diff > 0 {
        format!(" [was {}, up {}]", prev, diff)
    } else {
        format!(" [was {}, down {}]", prev, -diff)
    }
}
