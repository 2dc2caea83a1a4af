//! Diagnostics collection for an import run
//!
//! Two independent append-only lists: warnings (recoverable, processing
//! continued with a substitute value) and errors (a unit of work was lost).
//! A run with any error is reported as fatal, even though the orchestrator
//! may still have produced partial output.

use crate::error::StoreError;
use crate::store::TargetContext;
use chrono::{DateTime, Utc};
use scrawl_common::human_time::format_duration;
use serde::{Deserialize, Serialize};

/// Number of entries shown in report previews
const PREVIEW_LEN: usize = 5;

/// One recorded warning or error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The record that caused the entry (project/text/version name)
    pub context: String,
    /// Stable machine code (e.g. "MISSING_BODY", "FETCH_FAILED")
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// When the entry was recorded
    pub occurred_at: DateTime<Utc>,
}

impl Diagnostic {
    fn new(context: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            code: code.into(),
            message: message.into(),
            occurred_at: Utc::now(),
        }
    }

    fn render(&self) -> String {
        format!("[{}] {}: {}", self.code, self.context, self.message)
    }
}

/// Summary of a completed (or failed) import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub total_projects: usize,
    pub processed_projects: usize,
    pub warning_count: usize,
    pub error_count: usize,
    pub fatal: bool,
    pub duration_seconds: u64,
    /// First entries of each list, for at-a-glance display
    pub warning_preview: Vec<String>,
    pub error_preview: Vec<String>,
    /// Processed units that produced no error entry, as a fraction
    pub success_rate: f64,
    pub projects_per_second: f64,
}

impl ImportReport {
    /// Human-readable rendering for logs and the post-run summary screen
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Imported {}/{} projects in {} ({} warnings, {} errors)\n",
            self.processed_projects,
            self.total_projects,
            format_duration(self.duration_seconds),
            self.warning_count,
            self.error_count,
        ));
        out.push_str(&format!(
            "Success rate {:.0}%, {:.2} projects/s\n",
            self.success_rate * 100.0,
            self.projects_per_second
        ));
        if !self.error_preview.is_empty() {
            out.push_str("Errors:\n");
            for line in &self.error_preview {
                out.push_str(&format!("  {}\n", line));
            }
            if self.error_count > self.error_preview.len() {
                out.push_str(&format!(
                    "  ... and {} more\n",
                    self.error_count - self.error_preview.len()
                ));
            }
        }
        if !self.warning_preview.is_empty() {
            out.push_str("Warnings:\n");
            for line in &self.warning_preview {
                out.push_str(&format!("  {}\n", line));
            }
            if self.warning_count > self.warning_preview.len() {
                out.push_str(&format!(
                    "  ... and {} more\n",
                    self.warning_count - self.warning_preview.len()
                ));
            }
        }
        out
    }
}

/// Accumulates warnings and errors over one import run
#[derive(Debug)]
pub struct DiagnosticsCollector {
    warnings: Vec<Diagnostic>,
    errors: Vec<Diagnostic>,
    started_at: DateTime<Utc>,
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticsCollector {
    pub fn new() -> Self {
        Self {
            warnings: Vec::new(),
            errors: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Drop all entries and restart the clock
    pub fn reset(&mut self) {
        self.warnings.clear();
        self.errors.clear();
        self.started_at = Utc::now();
    }

    /// Record a recoverable anomaly; processing continued
    pub fn warn(
        &mut self,
        context: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) {
        let diag = Diagnostic::new(context, code, message);
        tracing::warn!(
            context = %diag.context,
            code = %diag.code,
            "{}", diag.message
        );
        self.warnings.push(diag);
    }

    /// Record a lost unit of work; the run is reported as fatal
    pub fn error(
        &mut self,
        context: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) {
        let diag = Diagnostic::new(context, code, message);
        tracing::error!(
            context = %diag.context,
            code = %diag.code,
            "{}", diag.message
        );
        self.errors.push(diag);
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// A run with any error entry is fatal for reporting purposes
    pub fn is_fatal(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Build the run summary
    pub fn report(&self, total_projects: usize, processed_projects: usize) -> ImportReport {
        let duration_seconds = (Utc::now() - self.started_at).num_seconds().max(0) as u64;
        let success_rate = if processed_projects > 0 {
            let failed = self.errors.len().min(processed_projects);
            (processed_projects - failed) as f64 / processed_projects as f64
        } else if self.errors.is_empty() {
            1.0
        } else {
            0.0
        };
        let projects_per_second = if duration_seconds > 0 {
            processed_projects as f64 / duration_seconds as f64
        } else {
            processed_projects as f64
        };

        ImportReport {
            total_projects,
            processed_projects,
            warning_count: self.warnings.len(),
            error_count: self.errors.len(),
            fatal: self.is_fatal(),
            duration_seconds,
            warning_preview: self
                .warnings
                .iter()
                .take(PREVIEW_LEN)
                .map(Diagnostic::render)
                .collect(),
            error_preview: self
                .errors
                .iter()
                .take(PREVIEW_LEN)
                .map(Diagnostic::render)
                .collect(),
            success_rate,
            projects_per_second,
        }
    }

    /// Discard staged-but-uncommitted work in the target context.
    ///
    /// Invoked only from the orchestrator's fatal final-commit path. Work
    /// committed by earlier batches is NOT undone here; the import is
    /// committed-so-far by design (memory bounding requires early partial
    /// commits).
    pub fn rollback_uncommitted<C: TargetContext + ?Sized>(
        &mut self,
        ctx: &mut C,
        cause: &StoreError,
    ) {
        tracing::error!(
            warnings = self.warnings.len(),
            errors = self.errors.len(),
            error = %cause,
            "Rolling back uncommitted import work"
        );
        ctx.rollback();
        self.errors
            .push(Diagnostic::new("final commit", "COMMIT_FAILED", cause.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_alone_are_not_fatal() {
        let mut diag = DiagnosticsCollector::new();
        diag.warn("text A", "MISSING_BODY", "no body blob");
        assert!(!diag.is_fatal());
        diag.error("project B", "FETCH_FAILED", "query died");
        assert!(diag.is_fatal());
    }

    #[test]
    fn report_previews_are_truncated_to_five() {
        let mut diag = DiagnosticsCollector::new();
        for i in 0..8 {
            diag.warn(format!("text {}", i), "MISSING_BODY", "no body");
        }
        let report = diag.report(10, 10);
        assert_eq!(report.warning_count, 8);
        assert_eq!(report.warning_preview.len(), 5);
        assert!(!report.fatal);
    }

    #[test]
    fn success_rate_accounts_for_errors() {
        let mut diag = DiagnosticsCollector::new();
        diag.error("p1", "FETCH_FAILED", "boom");
        let report = diag.report(4, 4);
        assert!((report.success_rate - 0.75).abs() < f64::EPSILON);
        assert!(report.fatal);
    }

    #[test]
    fn reset_clears_entries() {
        let mut diag = DiagnosticsCollector::new();
        diag.warn("a", "X", "y");
        diag.reset();
        assert_eq!(diag.warning_count(), 0);
        assert_eq!(diag.error_count(), 0);
    }

    #[test]
    fn render_mentions_counts() {
        let mut diag = DiagnosticsCollector::new();
        diag.warn("text", "MISSING_BODY", "no body");
        let rendered = diag.report(2, 2).render();
        assert!(rendered.contains("1 warnings"));
        assert!(rendered.contains("MISSING_BODY"));
    }
}
