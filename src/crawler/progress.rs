//! Thread-safe progress accounting for batch runs
//!
//! Worker tasks share one [`ProgressTracker`] by reference and call
//! [`ProgressTracker::advance`] once per finished item. Updates are
//! serialized through a mutex, so no increment is lost however many workers
//! report at once.

use std::fmt;
use std::sync::Mutex;

/// Point-in-time view of a tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub completed: usize,
    pub total: usize,
}

impl ProgressSnapshot {
    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }
}

type Observer = Box<dyn Fn(ProgressSnapshot) + Send + Sync>;

/// Monotonic completed-items counter with an optional display callback
pub struct ProgressTracker {
    total: usize,
    completed: Mutex<usize>,
    observer: Option<Observer>,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            completed: Mutex::new(0),
            observer: None,
        }
    }

    /// Creates a tracker that reports every update to `observer`
    ///
    /// The observer runs while the counter lock is held, so it sees updates
    /// in increasing order. Keep it cheap.
    pub fn with_observer<F>(total: usize, observer: F) -> Self
    where
        F: Fn(ProgressSnapshot) + Send + Sync + 'static,
    {
        Self {
            total,
            completed: Mutex::new(0),
            observer: Some(Box::new(observer)),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Records `n` more completed items
    ///
    /// The counter saturates at `total`.
    pub fn advance(&self, n: usize) {
        let mut completed = self
            .completed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let next = completed.saturating_add(n);
        if next > self.total {
            tracing::warn!(
                "Progress overflow: {} + {} exceeds total {}",
                *completed,
                n,
                self.total
            );
        }
        *completed = next.min(self.total);

        if let Some(observer) = &self.observer {
            observer(ProgressSnapshot {
                completed: *completed,
                total: self.total,
            });
        }
    }

    /// Returns `(completed, total)` as of some recent instant
    pub fn snapshot(&self) -> ProgressSnapshot {
        let completed = *self
            .completed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        ProgressSnapshot {
            completed,
            total: self.total,
        }
    }
}

impl fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("ProgressTracker")
            .field("completed", &snapshot.completed)
            .field("total", &snapshot.total)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_new_tracker_is_empty() {
        let tracker = ProgressTracker::new(5);
        assert_eq!(
            tracker.snapshot(),
            ProgressSnapshot {
                completed: 0,
                total: 5
            }
        );
        assert!(!tracker.snapshot().is_done());
    }

    #[test]
    fn test_advance_saturates_at_total() {
        let tracker = ProgressTracker::new(2);
        tracker.advance(1);
        tracker.advance(5);
        assert_eq!(tracker.snapshot().completed, 2);
        assert!(tracker.snapshot().is_done());
    }

    fn hammer(callers: usize) {
        let tracker = Arc::new(ProgressTracker::new(callers));
        let handles: Vec<_> = (0..callers)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || tracker.advance(1))
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(tracker.snapshot().completed, callers);
    }

    #[test]
    fn test_no_lost_updates_two_callers() {
        hammer(2);
    }

    #[test]
    fn test_no_lost_updates_fifty_callers() {
        hammer(50);
    }

    #[test]
    fn test_observer_sees_monotonic_updates() {
        let last = Arc::new(AtomicUsize::new(0));
        let calls = Arc::new(AtomicUsize::new(0));
        let (last_seen, call_count) = (Arc::clone(&last), Arc::clone(&calls));

        let tracker = Arc::new(ProgressTracker::with_observer(40, move |snap| {
            let prev = last_seen.swap(snap.completed, Ordering::SeqCst);
            assert!(snap.completed > prev);
            call_count.fetch_add(1, Ordering::SeqCst);
        }));

        let handles: Vec<_> = (0..40)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || tracker.advance(1))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 40);
        assert_eq!(last.load(Ordering::SeqCst), 40);
    }
}
