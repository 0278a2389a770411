//! Deduplicating lecture collection shared by concurrent lecture tasks
//!
//! Records are kept in insertion order next to a hash set used for identity
//! checks. Both live behind one lock, so a check-and-insert is atomic and two
//! tasks racing with equal records leave exactly one behind.

use std::collections::HashSet;
use tokio::sync::RwLock;

use crate::models::Lecture;

#[derive(Debug, Default)]
struct Inner {
    seen: HashSet<Lecture>,
    order: Vec<Lecture>,
}

impl Inner {
    fn insert(&mut self, lecture: Lecture) -> bool {
        if self.seen.contains(&lecture) {
            return false;
        }
        self.seen.insert(lecture.clone());
        self.order.push(lecture);
        true
    }

    fn remove(&mut self, lecture: &Lecture) -> bool {
        if !self.seen.remove(lecture) {
            return false;
        }
        self.order.retain(|existing| existing != lecture);
        true
    }

    /// Stable sort, so ties keep insertion order
    fn sorted(&self) -> Vec<Lecture> {
        let mut sorted = self.order.clone();
        sorted.sort_by(Lecture::cmp_by_start_time);
        sorted
    }
}

/// Set of lectures, materialized sorted by start time on demand
#[derive(Debug, Default)]
pub struct LectureCollection {
    inner: RwLock<Inner>,
}

impl LectureCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a lecture unless an equal one is already present
    ///
    /// Returns `false` when the lecture was dropped as a duplicate.
    pub async fn insert(&self, lecture: Lecture) -> bool {
        self.inner.write().await.insert(lecture)
    }

    pub async fn contains(&self, lecture: &Lecture) -> bool {
        self.inner.read().await.seen.contains(lecture)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.order.is_empty()
    }

    /// Remove the lecture equal to `lecture`
    pub async fn remove(&self, lecture: &Lecture) -> bool {
        self.inner.write().await.remove(lecture)
    }

    /// All lectures, ascending by start time
    pub async fn sorted(&self) -> Vec<Lecture> {
        self.inner.read().await.sorted()
    }

    /// The `n` soonest lectures; shorter when fewer are stored
    pub async fn top_n(&self, n: usize) -> Vec<Lecture> {
        let mut sorted = self.sorted().await;
        sorted.truncate(n);
        sorted
    }

    /// Lecture at `index` of the sorted view
    pub async fn get(&self, index: usize) -> Option<Lecture> {
        self.sorted().await.into_iter().nth(index)
    }

    /// Position of `lecture` in the sorted view
    pub async fn index_of(&self, lecture: &Lecture) -> Option<usize> {
        self.sorted().await.iter().position(|l| l == lecture)
    }

    /// Remove and return the lecture at `index` of the sorted view
    pub async fn remove_at(&self, index: usize) -> Option<Lecture> {
        let mut inner = self.inner.write().await;
        let target = inner.sorted().into_iter().nth(index)?;
        inner.remove(&target);
        Some(target)
    }

    /// Replace the lecture at `index` of the sorted view
    ///
    /// Returns the replaced lecture. The replacement is dropped if it equals a
    /// lecture that is still stored.
    pub async fn replace_at(&self, index: usize, lecture: Lecture) -> Option<Lecture> {
        let mut inner = self.inner.write().await;
        let target = inner.sorted().into_iter().nth(index)?;
        inner.remove(&target);
        inner.insert(lecture);
        Some(target)
    }
}
