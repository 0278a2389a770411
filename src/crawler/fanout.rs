//! Fan-out coordinator for lecture tasks
//!
//! Spawns one tokio task per lecture reference and waits for all of them.
//!
//! # Architecture
//!
//! ```text
//!                ┌──────────────┐
//!  references ──▶│   FanOut     │── spawn ──▶ task 1 ─┐
//!                │  run_all()   │── spawn ──▶ task 2 ─┤ completion guard
//!                └──────────────┘── spawn ──▶ task n ─┘      │
//!                        ▲                                   ▼
//!                   join_all                     Progress (atomics) ──▶ watch channel
//! ```
//!
//! Completion is recorded by a guard dropped when the spawned task ends, so a
//! panicking task is counted like any other. Progress snapshots are published
//! under the watch channel's lock and are therefore monotonic.

use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Semaphore};

use crate::crawler::task::TaskOutcome;

// ============================================================================
// Progress
// ============================================================================

/// Point-in-time progress of a fan-out run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub completed: usize,
    pub total: usize,
}

impl ProgressSnapshot {
    /// Completion percentage; a run without tasks is complete
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.completed as f64 / self.total as f64) * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

/// Lock-free completion counters (thread-safe)
#[derive(Debug)]
pub struct Progress {
    completed: AtomicUsize,
    total: usize,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
        }
    }

    /// Tasks finished so far, successfully or not
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            completed: self.completed(),
            total: self.total,
        }
    }

    pub fn percentage(&self) -> f64 {
        self.snapshot().percentage()
    }

    fn record_completion(&self) -> usize {
        let completed = self.completed.fetch_add(1, Ordering::AcqRel) + 1;
        debug_assert!(completed <= self.total, "more completions than tasks");
        completed
    }
}

/// Records one completion when the owning task ends, however it ends
struct CompletionGuard {
    progress: Arc<Progress>,
    events: Arc<watch::Sender<ProgressSnapshot>>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let progress = &self.progress;
        self.events.send_modify(|snapshot| {
            snapshot.completed = progress.record_completion();
        });
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Tally of a finished fan-out run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub panicked: usize,
    /// Records added to the collection by all tasks
    pub inserted: usize,
}

impl FanOutSummary {
    pub fn completed(&self) -> usize {
        self.succeeded + self.failed + self.panicked
    }
}

// ============================================================================
// Coordinator
// ============================================================================

/// One-shot coordinator running a task per reference
#[derive(Debug)]
pub struct FanOut {
    references: Vec<String>,
    max_in_flight: Option<usize>,
    progress: Arc<Progress>,
    events: Arc<watch::Sender<ProgressSnapshot>>,
}

impl FanOut {
    /// Create a coordinator; the total is fixed to the number of references
    pub fn new(references: HashSet<String>) -> Self {
        let mut references: Vec<String> = references.into_iter().collect();
        references.sort();

        let total = references.len();
        let (events, _) = watch::channel(ProgressSnapshot {
            completed: 0,
            total,
        });

        Self {
            references,
            max_in_flight: None,
            progress: Arc::new(Progress::new(total)),
            events: Arc::new(events),
        }
    }

    /// Bound the number of simultaneously running tasks (`None` = unbounded)
    #[must_use]
    pub fn with_max_in_flight(mut self, limit: Option<usize>) -> Self {
        self.max_in_flight = limit.filter(|n| *n > 0);
        self
    }

    pub fn total(&self) -> usize {
        self.progress.total()
    }

    /// Shared counters, readable without locking while the run is in progress
    pub fn progress(&self) -> Arc<Progress> {
        Arc::clone(&self.progress)
    }

    /// Progress events, one per completed task; closed once the run drained
    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.events.subscribe()
    }

    /// Spawn `factory(reference)` for every reference and wait for all of them
    pub async fn run_all<F, Fut>(self, factory: F) -> FanOutSummary
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = TaskOutcome> + Send + 'static,
    {
        let total = self.references.len();
        let semaphore = self.max_in_flight.map(|n| Arc::new(Semaphore::new(n)));

        tracing::info!(
            total,
            max_in_flight = ?self.max_in_flight,
            "Starting lecture fan-out"
        );

        let mut handles = Vec::with_capacity(total);

        for reference in self.references {
            let task = factory(reference.clone());
            let guard = CompletionGuard {
                progress: Arc::clone(&self.progress),
                events: Arc::clone(&self.events),
            };
            let semaphore = semaphore.clone();

            let handle = tokio::spawn(async move {
                let _guard = guard;
                let _permit = match semaphore {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                task.await
            });

            handles.push((reference, handle));
        }

        // Nothing else is submitted; the receivers close once every guard and
        // this sender are gone.
        drop(self.events);
        tracing::debug!(submitted = total, "All lecture tasks submitted");

        let (references, handles): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
        let results = futures::future::join_all(handles).await;

        let mut summary = FanOutSummary {
            total,
            ..Default::default()
        };

        for (reference, result) in references.into_iter().zip(results) {
            match result {
                Ok(outcome) if outcome.is_success() => {
                    summary.succeeded += 1;
                    summary.inserted += outcome.inserted();
                }
                Ok(outcome) => {
                    summary.failed += 1;
                    tracing::debug!(reference = %outcome.reference(), "Lecture task failed");
                }
                Err(e) => {
                    summary.panicked += 1;
                    tracing::error!(reference = %reference, error = %e, "Lecture task aborted");
                }
            }
        }

        tracing::info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            panicked = summary.panicked,
            inserted = summary.inserted,
            "Lecture fan-out drained"
        );

        summary
    }
}
