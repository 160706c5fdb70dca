//! Console reporter with colored output

use crate::analyzer::engine::AggregateStats;
use crate::analyzer::scoring::ScoreCalculator;
use crate::history::{format_delta, AssessmentRecord};
use crate::request::AssessmentResponse;
use crate::{Condition, MarkerSet, RiskAssessment, RiskLevel};
use colored::{ColoredString, Colorize};
use std::fmt::Write;
use std::path::PathBuf;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single assessment
    pub fn report(
        &self,
        patient_name: &str,
        response: &AssessmentResponse,
        previous: Option<&AssessmentRecord>,
    ) {
        print!("{}", self.render(patient_name, response, previous));
    }

    /// Report in quiet mode (one line)
    pub fn report_quiet(&self, patient_name: &str, assessment: &RiskAssessment) {
        println!("{}", self.render_quiet(patient_name, assessment));
    }

    /// Report a batch with summary
    pub fn report_batch(&self, entries: &[(PathBuf, AssessmentResponse)], stats: &AggregateStats) {
        for (path, response) in entries {
            if self.verbose {
                print!("{}", self.render(&path.display().to_string(), response, None));
                println!("{}", "─".repeat(60));
            } else {
                println!(
                    "{}",
                    self.render_quiet(&path.display().to_string(), &response.assessment)
                );
            }
        }
        print!("{}", self.render_summary(stats));
    }

    pub fn render(
        &self,
        patient_name: &str,
        response: &AssessmentResponse,
        previous: Option<&AssessmentRecord>,
    ) -> String {
        let assessment = &response.assessment;
        let mut out = String::new();

        let title = format!("🩺 Endocrine Risk Assessment: {}", patient_name);
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.paint(&title, |s| s.bold()));
        let _ = writeln!(
            out,
            "   Lab markers extracted: {} of 8",
            response.extracted_markers.present_count()
        );
        let _ = writeln!(out);

        self.write_scores(&mut out, assessment, previous);
        self.write_triggers(&mut out, assessment);

        let _ = writeln!(out, "   {}", self.paint(&assessment.explanation, |s| s.dimmed()));
        let _ = writeln!(out);

        let _ = writeln!(out, "   {}", self.paint("Recommended actions:", |s| s.bold()));
        for action in &assessment.recommended_actions {
            let _ = writeln!(out, "   {} {}", self.paint("→", |s| s.cyan()), action);
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "   {}", self.paint("Suggested tests:", |s| s.bold()));
        for test in &assessment.suggested_tests {
            let _ = writeln!(out, "   • {}", test);
        }

        if let Some(ref trace) = assessment.rule_trace {
            let _ = writeln!(out);
            let _ = writeln!(out, "   {}", self.paint("Rule trace:", |s| s.bold()));
            for entry in trace {
                let deltas: Vec<String> = entry
                    .delta
                    .iter()
                    .filter(|(_, v)| **v != 0.0)
                    .map(|(c, v)| format!("{} {:+}", c, v))
                    .collect();
                let trigger = entry
                    .trigger
                    .as_ref()
                    .map(|t| format!(" [{}]", t))
                    .unwrap_or_default();
                let _ = writeln!(
                    out,
                    "   {} {}{}",
                    self.paint(&format!("{:<28}", entry.rule), |s| s.dimmed()),
                    deltas.join(", "),
                    trigger
                );
            }
        }
        let _ = writeln!(out);
        out
    }

    fn write_scores(
        &self,
        out: &mut String,
        assessment: &RiskAssessment,
        previous: Option<&AssessmentRecord>,
    ) {
        for condition in Condition::ALL {
            let percent = assessment.percent(condition);
            let level = *assessment.risk_level.get(condition);
            let delta = format_delta(previous.and_then(|p| p.percent(condition)), percent);
            let _ = writeln!(
                out,
                "   {:<20} {} {}{}",
                condition.display_name(),
                self.create_score_bar(percent, level),
                self.colorize_level(level),
                self.paint(&delta, |s| s.dimmed())
            );
        }
        let _ = writeln!(out);

        if self.verbose {
            let worst = assessment.max_level();
            let _ = writeln!(
                out,
                "   {}",
                self.paint(ScoreCalculator::level_description(worst), |s| s.dimmed())
            );
            let _ = writeln!(out);
        }
    }

    fn write_triggers(&self, out: &mut String, assessment: &RiskAssessment) {
        let _ = writeln!(out, "   {}", self.paint("Key triggers:", |s| s.bold()));
        if assessment.key_triggers.is_empty() {
            let _ = writeln!(out, "   {} none", self.paint("✓", |s| s.green()));
        }
        for trigger in &assessment.key_triggers {
            let _ = writeln!(out, "   {} {}", self.paint("⚠", |s| s.yellow()), trigger);
        }
        let _ = writeln!(out);
    }

    pub fn render_quiet(&self, label: &str, assessment: &RiskAssessment) -> String {
        let parts: Vec<String> = Condition::ALL
            .iter()
            .map(|&c| {
                format!(
                    "{} {} ({})",
                    c,
                    assessment.risk_scores.get(c),
                    self.colorize_level(*assessment.risk_level.get(c))
                )
            })
            .collect();
        format!("{}: {}", label, parts.join(" | "))
    }

    pub fn render_summary(&self, stats: &AggregateStats) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(out, "{}", self.paint("Summary", |s| s.bold()));
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(out, "   Requests assessed: {}", stats.assessed);
        let _ = writeln!(out, "   With any High:     {}", stats.with_any_high);
        for (condition, count) in stats.high_counts.iter() {
            if *count > 0 {
                let _ = writeln!(out, "   High {:<14} {}", condition.display_name(), count);
            }
        }
        let _ = writeln!(out);
        out
    }

    /// Extracted markers, one per line, absent ones dimmed
    pub fn render_markers(&self, markers: &MarkerSet) -> String {
        let mut out = String::new();
        for (marker, value) in markers.iter() {
            let value = match value {
                Some(v) => v.to_string(),
                None => self.paint("not found", |s| s.dimmed()),
            };
            let _ = writeln!(out, "{:<16} {}", marker.name(), value);
        }
        out
    }

    /// Stored records, as passed in (newest first)
    pub fn render_history(&self, records: &[&AssessmentRecord]) -> String {
        let mut out = String::new();
        if records.is_empty() {
            let _ = writeln!(out, "No assessments recorded yet");
            return out;
        }
        for record in records {
            let worst = record.result.max_level();
            let scores: Vec<String> = record
                .risk_scores
                .iter()
                .map(|(c, s)| format!("{} {}", c, s))
                .collect();
            let _ = writeln!(
                out,
                "#{:<4} {}  {:<20} {}  {}",
                record.id,
                self.paint(&record.created_at, |s| s.dimmed()),
                record.patient_name,
                self.colorize_level(worst),
                scores.join(", ")
            );
        }
        out
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.use_colors {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn colorize_level(&self, level: RiskLevel) -> String {
        let s = level.to_string();
        match level {
            RiskLevel::Low => self.paint(&s, |t| t.green()),
            RiskLevel::Moderate => self.paint(&s, |t| t.yellow()),
            RiskLevel::High => self.paint(&s, |t| t.red().bold()),
        }
    }

    fn create_score_bar(&self, percent: u8, level: RiskLevel) -> String {
        let filled = (percent as usize * 20) / 100;
        let empty = 20 - filled;

        let bar = format!("[{}{}] {:>3}%", "█".repeat(filled), "░".repeat(empty), percent);

        match level {
            RiskLevel::Low => self.paint(&bar, |s| s.green()),
            RiskLevel::Moderate => self.paint(&bar, |s| s.yellow()),
            RiskLevel::High => self.paint(&bar, |s| s.red()),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
