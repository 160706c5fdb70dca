//! JSON reporter for machine-readable output

use crate::analyzer::engine::AggregateStats;
use crate::history::AssessmentRecord;
use crate::request::AssessmentResponse;
use crate::ConditionMap;
use serde::Serialize;
use std::path::PathBuf;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Serialize any output document
    pub fn report<T: Serialize + ?Sized>(&self, value: &T) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|_| "{}".to_string())
    }

    /// Report a batch with summary
    pub fn report_batch(
        &self,
        entries: &[(PathBuf, AssessmentResponse)],
        stats: &AggregateStats,
    ) -> String {
        let output = JsonBatch {
            results: entries
                .iter()
                .map(|(file, response)| JsonBatchEntry {
                    file: file.display().to_string(),
                    response,
                })
                .collect(),
            summary: JsonSummary {
                assessed: stats.assessed,
                with_any_high: stats.with_any_high,
                high_counts: stats.high_counts,
            },
        };
        self.report(&output)
    }

    /// Report stored records as a JSON array
    pub fn report_history(&self, records: &[&AssessmentRecord]) -> String {
        self.report(records)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonBatch<'a> {
    results: Vec<JsonBatchEntry<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonBatchEntry<'a> {
    file: String,
    #[serde(flatten)]
    response: &'a AssessmentResponse,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    assessed: usize,
    with_any_high: usize,
    high_counts: ConditionMap<usize>,
}
