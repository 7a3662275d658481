//! Crawler module for link discovery and batch extraction
//!
//! This module contains the crawl-and-extract pipeline, including:
//! - HTTP fetching with failure classification
//! - Pagination-driven discovery of project links
//! - The bounded worker pool that fetches and extracts every project
//! - Thread-safe progress accounting
//! - Overall export coordination

mod coordinator;
mod discovery;
mod engine;
mod fetcher;
mod progress;

pub use coordinator::Exporter;
pub use discovery::{parse_listing_page, LinkDiscoverer, ListingPage, NextPage, MAX_LISTING_PAGES};
pub use engine::{
    item_id, partition, BatchExtractionEngine, BatchResult, ExtractionFailure, Outcome,
};
pub use fetcher::{build_http_client, check_status, HttpFetcher};
pub use progress::{ProgressSnapshot, ProgressTracker};

use crate::config::Config;
use crate::output::ExportSummary;
use crate::Result;
use std::path::Path;

/// Runs a complete export with the settings from `config`
///
/// This is the main entry point for a one-shot export. It will:
/// 1. Build the HTTP client
/// 2. Probe the profile
/// 3. Discover every project link
/// 4. Fetch and extract projects on `config.crawler.workers` workers
/// 5. Write the manifest and records in `config.output.format`
pub async fn export_profile(
    config: Config,
    profile: &str,
    destination: &Path,
) -> Result<ExportSummary> {
    let workers = config.crawler.workers as usize;
    let format = config.output.format;
    let exporter = Exporter::new(config)?;
    exporter.export(profile, workers, destination, format).await
}
