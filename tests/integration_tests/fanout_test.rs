//! Fan-out coordination: concurrency bound, panic accounting, progress events

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use ufind_planner::crawler::{FanOut, ProgressSnapshot, TaskOutcome};
use ufind_planner::utils::error::FetchError;

fn references(n: usize) -> HashSet<String> {
    (0..n).map(|i| format!("course.html?lv={i:03}")).collect()
}

fn completed(reference: String) -> TaskOutcome {
    TaskOutcome::Completed {
        reference,
        inserted: 1,
        duplicates: 0,
        past: 0,
        skipped: 0,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_bounded_concurrency_never_exceeds_limit() {
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let fanout = FanOut::new(references(20)).with_max_in_flight(Some(3));
    let summary = fanout
        .run_all(|reference| {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                completed(reference)
            }
        })
        .await;

    assert_eq!(summary.succeeded, 20);
    assert!(peak.load(Ordering::SeqCst) <= 3);
    assert!(peak.load(Ordering::SeqCst) >= 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_unbounded_runs_all_at_once() {
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let fanout = FanOut::new(references(8));
    fanout
        .run_all(|reference| {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                completed(reference)
            }
        })
        .await;

    assert!(peak.load(Ordering::SeqCst) > 3);
}

#[tokio::test]
async fn test_panicking_task_is_counted() {
    let fanout = FanOut::new(references(10));
    let progress = fanout.progress();

    let summary = fanout
        .run_all(|reference| async move {
            if reference.ends_with("007") {
                panic!("lecture page exploded");
            }
            completed(reference)
        })
        .await;

    assert_eq!(summary.total, 10);
    assert_eq!(summary.succeeded, 9);
    assert_eq!(summary.panicked, 1);
    assert_eq!(summary.completed(), 10);
    assert_eq!(progress.completed(), 10);
    assert_eq!(progress.percentage(), 100.0);
}

#[tokio::test]
async fn test_failed_tasks_do_not_stop_the_run() {
    let fanout = FanOut::new(references(6));

    let summary = fanout
        .run_all(|reference| async move {
            if reference.ends_with('1') || reference.ends_with('4') {
                TaskOutcome::FetchFailed {
                    error: FetchError::Status {
                        url: reference.clone(),
                        status: 500,
                    },
                    reference,
                }
            } else {
                completed(reference)
            }
        })
        .await;

    assert_eq!(summary.succeeded, 4);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.inserted, 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_progress_events_are_monotonic() {
    let fanout = FanOut::new(references(30)).with_max_in_flight(Some(4));
    let mut events = fanout.subscribe();

    let observer = tokio::spawn(async move {
        let mut seen = vec![*events.borrow_and_update()];
        while events.changed().await.is_ok() {
            seen.push(*events.borrow_and_update());
        }
        seen.push(*events.borrow());
        seen
    });

    fanout
        .run_all(|reference| async move {
            tokio::time::sleep(Duration::from_millis(2)).await;
            completed(reference)
        })
        .await;

    let seen = observer.await.unwrap();
    assert!(seen.windows(2).all(|w| w[0].completed <= w[1].completed));
    assert!(seen.iter().all(|s| s.completed <= s.total && s.total == 30));
    assert_eq!(
        seen.last().copied(),
        Some(ProgressSnapshot {
            completed: 30,
            total: 30
        })
    );
}
