//! Record writer trait and output error types
//!
//! A [`RecordWriter`] turns one [`Project`] into a file under the export
//! directory. Writers are called sequentially after the batch completes;
//! each write is independent, so a failure never rolls back earlier files.

use crate::extract::Project;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Persists records in one serialization format
pub trait RecordWriter: Send + Sync {
    /// File extension without the dot
    fn extension(&self) -> &'static str;

    /// Renders the full file content for a record
    fn render(&self, project: &Project) -> OutputResult<String>;

    /// Writes `<destination>/<target_name>.<extension>` and returns its path
    ///
    /// An existing file with the same name is overwritten.
    fn persist(
        &self,
        project: &Project,
        target_name: &str,
        destination: &Path,
    ) -> OutputResult<PathBuf> {
        let path = destination.join(format!("{}.{}", target_name, self.extension()));
        let content = self.render(project)?;
        std::fs::write(&path, content)?;
        Ok(path)
    }
}
