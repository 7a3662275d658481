//! Output module for persisting exported records
//!
//! This module handles:
//! - Serializing records as JSON or plain text files
//! - Writing the manifest of exported links
//! - Reporting the export summary

mod json;
mod manifest;
pub mod summary;
mod text;
mod traits;

pub use json::JsonWriter;
pub use manifest::{read_manifest, write_manifest};
pub use summary::{format_summary, print_summary, ExportSummary, FailureReport};
pub use text::{format_project, TextWriter};
pub use traits::{OutputError, OutputResult, RecordWriter};

use crate::config::OutputFormat;
use crate::extract::{slugify, Project};
use std::collections::HashSet;

/// Returns the writer for a format
pub fn writer_for(format: OutputFormat) -> Box<dyn RecordWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter),
        OutputFormat::Text => Box::new(TextWriter),
    }
}

/// Picks a unique file stem for a record within one export
///
/// The slugified title is preferred. A title already taken in this export
/// gets the project id appended, so no record overwrites another. Every
/// part is slugified, so the result never contains a path separator.
pub fn target_name(project: &Project, used: &mut HashSet<String>) -> String {
    let id = slugify(&project.id);
    let title = slugify(&project.title);
    let base = match (title.is_empty(), id.is_empty()) {
        (false, _) => title,
        (true, false) => id.clone(),
        (true, true) => "project".to_string(),
    };

    let mut candidate = base.clone();
    if used.contains(&candidate) && !id.is_empty() {
        candidate = format!("{}-{}", base, id);
    }

    let mut counter = 2;
    let stem = candidate.clone();
    while used.contains(&candidate) {
        candidate = format!("{}-{}", stem, counter);
        counter += 1;
    }

    used.insert(candidate.clone());
    candidate
}
