//! JSON record writer

use crate::extract::Project;
use crate::output::traits::{OutputError, OutputResult, RecordWriter};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Writes records as pretty-printed JSON with four-space indentation
///
/// Non-ASCII text is written as UTF-8, not escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

impl RecordWriter for JsonWriter {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, project: &Project) -> OutputResult<String> {
        let mut buffer = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        project.serialize(&mut serializer)?;
        String::from_utf8(buffer).map_err(|e| OutputError::Format(e.to_string()))
    }
}
