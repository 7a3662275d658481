//! Export coordinator - the end-to-end pipeline
//!
//! This module ties the pieces together:
//! - Probing that the profile exists
//! - Discovering every project link
//! - Fetching and extracting all projects on the worker pool
//! - Writing the manifest and the successful records
//! - Reporting failures alongside the output

use crate::config::{Config, OutputFormat};
use crate::crawler::discovery::LinkDiscoverer;
use crate::crawler::engine::{partition, BatchExtractionEngine};
use crate::crawler::fetcher::{build_http_client, HttpFetcher};
use crate::crawler::progress::{ProgressSnapshot, ProgressTracker};
use crate::extract::{Extractor, ProjectPageExtractor};
use crate::output::{target_name, write_manifest, writer_for, ExportSummary, FailureReport};
use crate::{ItemError, Link, Result};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

type ProgressObserver = Arc<dyn Fn(ProgressSnapshot) + Send + Sync>;

/// Runs profile exports
pub struct Exporter {
    config: Arc<Config>,
    discoverer: LinkDiscoverer,
    fetcher: HttpFetcher,
    extractor: Arc<dyn Extractor>,
    observer: Option<ProgressObserver>,
}

impl Exporter {
    /// Creates an exporter with an HTTP client built from `config`
    ///
    /// # Returns
    ///
    /// * `Ok(Exporter)` - Ready to export
    /// * `Err(ExportError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        let extractor = Arc::new(ProjectPageExtractor::new(config.site.clone()));
        Ok(Self::with_extractor(config, HttpFetcher::new(client), extractor))
    }

    /// Creates an exporter with a caller-supplied fetcher and extractor
    pub fn with_extractor(
        config: Config,
        fetcher: HttpFetcher,
        extractor: Arc<dyn Extractor>,
    ) -> Self {
        let discoverer = LinkDiscoverer::new(fetcher.clone(), config.site.clone());
        Self {
            config: Arc::new(config),
            discoverer,
            fetcher,
            extractor,
            observer: None,
        }
    }

    /// Reports batch progress to `observer` on every completed item
    pub fn with_progress<F>(mut self, observer: F) -> Self
    where
        F: Fn(ProgressSnapshot) + Send + Sync + 'static,
    {
        self.observer = Some(Arc::new(observer));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Exports every project of `profile` into `destination`
    ///
    /// Individual project failures are listed in the summary; only a missing
    /// profile, a discovery failure, or a broken worker pool fails the call.
    pub async fn export(
        &self,
        profile: &str,
        workers: usize,
        destination: &Path,
        format: OutputFormat,
    ) -> Result<ExportSummary> {
        let start_time = Instant::now();
        tracing::info!("Exporting projects of '{}'", profile);

        self.discoverer.probe_profile(profile).await?;
        let links = self.discoverer.discover(profile).await?;
        let discovered = links.len();

        // Each task owns its link and body; only the client pool is shared
        let fetcher = self.fetcher.clone();
        let extractor = Arc::clone(&self.extractor);
        let task = move |link: Link| {
            let fetcher = fetcher.clone();
            let extractor = Arc::clone(&extractor);
            async move {
                let body = fetcher.fetch(&link).await?;
                let project = extractor.extract(&link, &body)?;
                Ok::<_, ItemError>(project)
            }
        };

        let progress = Arc::new(self.tracker(discovered));
        let engine = BatchExtractionEngine::new(workers);
        let batch = engine.run(links, progress, task).await?;
        let (projects, failures) = partition(batch);

        tracing::info!(
            "Extracted {} of {} projects ({} failed)",
            projects.len(),
            discovered,
            failures.len()
        );

        std::fs::create_dir_all(destination)?;

        let manifest = destination.join(&self.config.output.manifest_name);
        write_manifest(&manifest, projects.iter().map(|project| project.link.as_str()))?;

        let writer = writer_for(format);
        let mut used_names = HashSet::new();
        let mut written = Vec::with_capacity(projects.len());
        let mut persist_failures = Vec::new();

        for project in &projects {
            let name = target_name(project, &mut used_names);
            match writer.persist(project, &name, destination) {
                Ok(path) => written.push(path),
                Err(e) => {
                    tracing::warn!("Failed to write '{}': {}", project.id, e);
                    persist_failures.push(FailureReport {
                        id: project.id.clone(),
                        link: project.link.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Export of '{}' finished in {:?}",
            profile,
            start_time.elapsed()
        );

        Ok(ExportSummary {
            profile: profile.to_string(),
            destination: destination.to_path_buf(),
            discovered,
            succeeded: projects.len(),
            failures: failures.iter().map(FailureReport::from).collect(),
            persist_failures,
            written,
            manifest,
            elapsed: start_time.elapsed(),
        })
    }

    fn tracker(&self, total: usize) -> ProgressTracker {
        match &self.observer {
            Some(observer) => {
                let observer = Arc::clone(observer);
                ProgressTracker::with_observer(total, move |snapshot| (*observer)(snapshot))
            }
            None => ProgressTracker::new(total),
        }
    }
}
