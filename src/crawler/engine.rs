//! Bounded-concurrency batch extraction
//!
//! The engine seeds a shared work queue with `(index, link)` pairs and spawns
//! a fixed number of worker tasks that drain it. Each worker runs the
//! fetch+extract task for one link at a time, converts any failure into an
//! [`ExtractionFailure`], bumps the shared [`ProgressTracker`] and sends
//! `(index, outcome)` to the collector. The collector places every outcome
//! back at its input index, so the result order never depends on completion
//! order.
//!
//! # Cancellation
//!
//! Dropping the future returned by [`BatchExtractionEngine::run`] aborts the
//! workers, so no further links are started. Items already in flight run to
//! completion in the background and their results are discarded.

use crate::crawler::progress::ProgressTracker;
use crate::{ExportError, ItemError, Link};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use url::Url;

/// Sentinel recorded in place of a record when an item fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionFailure {
    /// Short identifier of the item (last path segment of its link)
    pub id: String,
    pub source_link: Link,
    pub error: ItemError,
}

impl ExtractionFailure {
    pub fn new(source_link: Link, error: ItemError) -> Self {
        Self {
            id: item_id(&source_link),
            source_link,
            error,
        }
    }
}

/// Result of one fetch+extract attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<R> {
    Extracted(R),
    Failed(ExtractionFailure),
}

impl<R> Outcome<R> {
    pub fn is_extracted(&self) -> bool {
        matches!(self, Self::Extracted(_))
    }

    pub fn record(&self) -> Option<&R> {
        match self {
            Self::Extracted(record) => Some(record),
            Self::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ExtractionFailure> {
        match self {
            Self::Extracted(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }
}

/// Outcomes index-aligned with the input links
pub type BatchResult<R> = Vec<Outcome<R>>;

/// Splits a batch into records and failures, each keeping input order
pub fn partition<R>(batch: BatchResult<R>) -> (Vec<R>, Vec<ExtractionFailure>) {
    let mut records = Vec::new();
    let mut failures = Vec::new();
    for outcome in batch {
        match outcome {
            Outcome::Extracted(record) => records.push(record),
            Outcome::Failed(failure) => failures.push(failure),
        }
    }
    (records, failures)
}

/// Derives a short identifier from a link: its last non-empty path segment
///
/// Falls back to the whole link when it does not parse as a URL.
pub fn item_id(link: &str) -> String {
    Url::parse(link)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                .map(str::to_string)
        })
        .unwrap_or_else(|| link.to_string())
}

type WorkQueue = Arc<Mutex<VecDeque<(usize, Link)>>>;

/// Fixed-size worker pool running one task per link
#[derive(Debug, Clone, Copy)]
pub struct BatchExtractionEngine {
    worker_count: usize,
}

impl BatchExtractionEngine {
    pub fn new(worker_count: usize) -> Self {
        Self { worker_count }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Runs `task` once for every link and returns the outcomes in input order
    ///
    /// At most `worker_count` tasks execute at any instant. A task that
    /// returns an error or panics yields an [`Outcome::Failed`] for its link;
    /// siblings are unaffected. `progress` is advanced by exactly one per
    /// finished item.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchResult)` - One outcome per link, even when items failed
    /// * `Err(ExportError::Worker)` - `worker_count` is zero or the pool
    ///   itself broke down
    pub async fn run<R, F, Fut>(
        &self,
        links: Vec<Link>,
        progress: Arc<ProgressTracker>,
        task: F,
    ) -> Result<BatchResult<R>, ExportError>
    where
        R: Send + 'static,
        F: Fn(Link) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ItemError>> + Send + 'static,
    {
        if self.worker_count == 0 {
            return Err(ExportError::Worker(
                "worker count must be at least 1".to_string(),
            ));
        }

        if links.is_empty() {
            return Ok(Vec::new());
        }

        let total = links.len();
        let pool_size = self.worker_count.min(total);
        tracing::debug!("Starting {} workers for {} links", pool_size, total);

        let queue: WorkQueue = Arc::new(Mutex::new(links.into_iter().enumerate().collect()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = Arc::new(task);

        let mut workers = JoinSet::new();
        for _ in 0..pool_size {
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            let task = Arc::clone(&task);
            let progress = Arc::clone(&progress);
            workers.spawn(run_worker(queue, tx, task, progress));
        }
        // The channel closes once every worker has dropped its sender
        drop(tx);

        let mut slots: Vec<Option<Outcome<R>>> = (0..total).map(|_| None).collect();
        while let Some((index, outcome)) = rx.recv().await {
            slots[index] = Some(outcome);
        }

        while let Some(joined) = workers.join_next().await {
            joined.map_err(|e| ExportError::Worker(format!("worker task failed: {}", e)))?;
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    ExportError::Worker(format!("no outcome collected for item {}", index))
                })
            })
            .collect()
    }
}

async fn run_worker<R, F, Fut>(
    queue: WorkQueue,
    tx: mpsc::UnboundedSender<(usize, Outcome<R>)>,
    task: Arc<F>,
    progress: Arc<ProgressTracker>,
) where
    R: Send + 'static,
    F: Fn(Link) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, ItemError>> + Send + 'static,
{
    loop {
        let next = queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();

        let (index, link) = match next {
            Some(item) => item,
            None => break,
        };

        // The future is built inside its own task so a panic in either the
        // closure or the future stays with this item
        let item_task = Arc::clone(&task);
        let item = link.clone();
        let handle = tokio::spawn(async move { (*item_task)(item).await });
        let outcome = match handle.await {
            Ok(Ok(record)) => Outcome::Extracted(record),
            Ok(Err(error)) => Outcome::Failed(ExtractionFailure::new(link, error)),
            Err(join_error) => Outcome::Failed(ExtractionFailure::new(
                link,
                ItemError::Panicked(describe_join_error(join_error)),
            )),
        };

        if let Outcome::Failed(failure) = &outcome {
            tracing::warn!("Failed to extract '{}': {}", failure.id, failure.error);
        }

        progress.advance(1);

        if tx.send((index, outcome)).is_err() {
            // Collector is gone; nobody wants further results
            break;
        }
    }
}

fn describe_join_error(error: JoinError) -> String {
    if error.is_cancelled() {
        return "task was cancelled".to_string();
    }

    let payload = error.into_panic();
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
