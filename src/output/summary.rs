//! Export summary reporting
//!
//! The summary carries the counts of discovered links, written records and
//! failed items, plus the id and reason of every failure.

use crate::crawler::ExtractionFailure;
use std::path::PathBuf;
use std::time::Duration;

/// A failed item as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    pub id: String,
    pub link: String,
    pub reason: String,
}

impl From<&ExtractionFailure> for FailureReport {
    fn from(failure: &ExtractionFailure) -> Self {
        Self {
            id: failure.id.clone(),
            link: failure.source_link.clone(),
            reason: failure.error.to_string(),
        }
    }
}

/// Outcome of one export run
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    pub profile: String,
    pub destination: PathBuf,

    /// Links found on the profile's listing pages
    pub discovered: usize,

    /// Links that produced a record
    pub succeeded: usize,

    /// Items whose fetch or extraction failed
    pub failures: Vec<FailureReport>,

    /// Records that were extracted but could not be written
    pub persist_failures: Vec<FailureReport>,

    /// Record files written, in input order
    pub written: Vec<PathBuf>,
    pub manifest: PathBuf,
    pub elapsed: Duration,
}

impl ExportSummary {
    /// Number of items that did not end up on disk
    pub fn failed(&self) -> usize {
        self.failures.len() + self.persist_failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed() == 0
    }
}

/// Formats a summary for the terminal
pub fn format_summary(summary: &ExportSummary) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Export Summary: {} ===\n\n", summary.profile));
    out.push_str(&format!("  Discovered links: {}\n", summary.discovered));
    out.push_str(&format!("  Successful records: {}\n", summary.succeeded));
    out.push_str(&format!("  Failed items: {}\n", summary.failures.len()));
    if !summary.persist_failures.is_empty() {
        out.push_str(&format!(
            "  Failed writes: {}\n",
            summary.persist_failures.len()
        ));
    }
    out.push_str(&format!("  Files written: {}\n", summary.written.len()));
    out.push_str(&format!("  Output: {}\n", summary.destination.display()));
    out.push_str(&format!("  Manifest: {}\n", summary.manifest.display()));
    out.push_str(&format!(
        "  Elapsed: {:.2}s\n",
        summary.elapsed.as_secs_f64()
    ));

    if !summary.failures.is_empty() {
        out.push_str("\nFailed items:\n");
        for failure in &summary.failures {
            out.push_str(&format!("  - {}: {}\n", failure.id, failure.reason));
        }
    }

    if !summary.persist_failures.is_empty() {
        out.push_str("\nFailed writes:\n");
        for failure in &summary.persist_failures {
            out.push_str(&format!("  - {}: {}\n", failure.id, failure.reason));
        }
    }

    out
}

/// Prints a summary to stdout
pub fn print_summary(summary: &ExportSummary) {
    print!("{}", format_summary(summary));
}
