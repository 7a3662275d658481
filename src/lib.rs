//! Devpost-Export: a profile project harvester
//!
//! This crate walks a user's paginated profile listing to discover project
//! links, fetches and parses every project page across a bounded worker pool,
//! and persists the successfully extracted records to disk. Individual project
//! failures are recorded and reported without aborting the batch.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;

use thiserror::Error;

/// Identifier of a single detail page (its absolute URL)
pub type Link = String;

/// Main error type for Devpost-Export operations
///
/// Every variant here is fatal to an export. Per-item failures are modelled
/// separately by [`ItemError`] and never surface through this type.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Profile '{profile}' doesn't exist")]
    ProfileNotFound { profile: String },

    #[error("Discovery failed: {source}")]
    Discovery {
        #[source]
        source: TransportError,
    },

    #[error("Unexpected page layout at {url}: {message}")]
    SiteLayout { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker pool error: {0}")]
    Worker(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Transport-level failure for a single request
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("{url} not found (HTTP 404)")]
    NotFound { url: String },

    #[error("server error for {url} (HTTP {status})")]
    Server { url: String, status: u16 },

    #[error("unexpected status for {url} (HTTP {status})")]
    Status { url: String, status: u16 },

    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },
}

impl TransportError {
    /// Returns the HTTP status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Server { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Network { .. } => None,
        }
    }
}

/// Errors raised while turning a fetched document into a record
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("required element '{selector}' is missing")]
    MissingElement { selector: String },

    #[error("invalid {field} count '{value}'")]
    InvalidCount { field: String, value: String },

    #[error("markdown conversion failed: {0}")]
    Markdown(String),
}

/// Reason a single item in a batch failed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ItemError {
    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    #[error("extraction: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("task panicked: {0}")]
    Panicked(String),
}

/// Result type alias for Devpost-Export operations
pub type Result<T> = std::result::Result<T, ExportError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, OutputFormat};
pub use crawler::{BatchResult, ExtractionFailure, Exporter, Outcome, ProgressTracker};
pub use extract::{Extractor, Project, ProjectPageExtractor};
pub use output::ExportSummary;
