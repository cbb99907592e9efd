//! Batch outcome reporting.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, ErrorKind, Result};

/// One topic that did not produce an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicFailure {
    pub topic: String,
    pub kind: ErrorKind,
    pub message: String,
}

/// Summary of a batch run.
///
/// Failures are kept in the order topics were encountered.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub succeeded: usize,
    pub skipped: usize,
    pub failures: Vec<TopicFailure>,
}

impl Default for ErrorReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorReport {
    /// Start an empty report stamped with the current time.
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            succeeded: 0,
            skipped: 0,
            failures: Vec::new(),
        }
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    pub fn record_failure(&mut self, topic: impl Into<String>, error: &Error) {
        self.failures.push(TopicFailure {
            topic: topic.into(),
            kind: error.kind(),
            message: error.to_string(),
        });
    }

    /// Stamp the finish time.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Topics that failed, in encounter order.
    pub fn failed_topics(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.topic.as_str()).collect()
    }

    /// Number of failed topics.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Total topics seen.
    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failures.len()
    }

    /// True if no topic failed.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Other(e.to_string()))
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Errors list")?;
        for failure in &self.failures {
            writeln!(f, "{}", failure.topic)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ErrorReport {
        let mut report = ErrorReport::new();
        report.record_success();
        report.record_failure("Unknown Field", &Error::TopicNotFound("Unknown Field".into()));
        report.record_skip();
        report.record_failure("Physics", &Error::Summarizer("HTTP 429".into()));
        report
    }

    #[test]
    fn test_counts_and_order() {
        let report = sample();
        assert_eq!(report.failed_topics(), vec!["Unknown Field", "Physics"]);
        assert_eq!(report.total(), 4);
        assert_eq!(report.failed(), 2);
        assert!(!report.is_clean());
        assert!(ErrorReport::new().is_clean());
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "Errors list\nUnknown Field\nPhysics\n");
        assert_eq!(ErrorReport::new().to_string(), "Errors list\n");
    }

    #[test]
    fn test_json() {
        let mut report = sample();
        report.finish();
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["succeeded"], 1);
        assert_eq!(value["failures"][0]["kind"], "not_found");
        assert_eq!(value["failures"][1]["kind"], "collaborator");
        assert!(value["finished_at"].is_string());
    }
}
