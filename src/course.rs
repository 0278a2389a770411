//! A course and its upcoming lectures
//!
//! [`Course`] ties the pipeline together: it resolves its id on the catalog
//! page, discovers the lecture references on its own page, fans out one
//! [`LectureTask`] per reference and reports the soonest lectures.

use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

use crate::config::Config;
use crate::crawler::fanout::{FanOut, FanOutSummary};
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::links::{discover_lecture_links, resolve_course_url};
use crate::crawler::task::LectureTask;
use crate::models::Lecture;
use crate::storage::LectureCollection;
use crate::utils::error::ResolutionError;
use crate::utils::Clock;

/// One course of the catalog
pub struct Course {
    id: String,
    url: String,
    lectures: Arc<LectureCollection>,
    fetcher: Arc<dyn PageFetcher>,
    base_url: Url,
    catalog_url: String,
    max_in_flight: Option<usize>,
    clock: Clock,
}

impl Course {
    /// Resolve `id` on the catalog page and create the course
    ///
    /// # Errors
    ///
    /// Fails when the catalog cannot be fetched or lists no course `id`.
    pub async fn resolve(
        id: impl Into<String>,
        fetcher: Arc<dyn PageFetcher>,
        config: &Config,
    ) -> Result<Self, ResolutionError> {
        let base_url = config
            .site
            .base_url()
            .map_err(|source| ResolutionError::InvalidUrl {
                href: config.site.base_url.clone(),
                source,
            })?;

        let mut course = Self {
            id: String::new(),
            url: String::new(),
            lectures: Arc::new(LectureCollection::new()),
            fetcher,
            base_url,
            catalog_url: config.site.catalog_url.clone(),
            max_in_flight: config.fanout.max_in_flight,
            clock: Clock::System,
        };
        course.set_id(id).await?;

        Ok(course)
    }

    /// Use `clock` to decide which occurrences are still upcoming
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Absolute url of the course page
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Shared collection the lecture tasks insert into
    pub fn lectures(&self) -> Arc<LectureCollection> {
        Arc::clone(&self.lectures)
    }

    /// Switch to another course id and resolve its url again
    ///
    /// The course is left unchanged when `id` does not resolve.
    pub async fn set_id(&mut self, id: impl Into<String>) -> Result<(), ResolutionError> {
        let id = id.into();

        tracing::debug!(course_id = %id, catalog = %self.catalog_url, "Resolving course");
        let catalog = self.fetcher.fetch(&self.catalog_url).await?;
        let url = resolve_course_url(&catalog, &id, &self.base_url)?;
        tracing::info!(course_id = %id, url = %url, "Resolved course");

        self.id = id;
        self.url = url;
        Ok(())
    }

    /// Fetch the course page and collect its lecture references
    ///
    /// # Errors
    ///
    /// Returns `ResolutionError::CatalogUnreachable` if the course page cannot
    /// be fetched.
    pub async fn discover(&self) -> Result<HashSet<String>, ResolutionError> {
        let html = self.fetcher.fetch(&self.url).await?;
        let references = discover_lecture_links(&html);

        tracing::info!(
            course_id = %self.id,
            references = references.len(),
            "Discovered lecture pages"
        );

        Ok(references)
    }

    /// Task fetching `reference` into this course's collection
    pub fn lecture_task(&self, reference: String) -> LectureTask {
        let url = match self.base_url.join(&reference) {
            Ok(url) => url.to_string(),
            // Handed to the fetcher as-is, which reports it per task
            Err(_) => reference.clone(),
        };

        LectureTask::new(
            reference,
            url,
            Arc::clone(&self.fetcher),
            Arc::clone(&self.lectures),
            self.clock.now(),
        )
    }

    /// Coordinator for `references`, honouring the configured concurrency bound
    pub fn fan_out(&self, references: HashSet<String>) -> FanOut {
        FanOut::new(references).with_max_in_flight(self.max_in_flight)
    }

    /// Run one lecture task per reference of `fanout` and wait for all of them
    pub async fn collect(&self, fanout: FanOut) -> FanOutSummary {
        fanout
            .run_all(|reference| self.lecture_task(reference).run())
            .await
    }

    /// Discover and collect in one go, without progress reporting
    pub async fn run(&self) -> Result<FanOutSummary, ResolutionError> {
        let references = self.discover().await?;
        Ok(self.collect(self.fan_out(references)).await)
    }

    /// The `n` soonest lectures, ascending by start time
    ///
    /// Call after the fan-out drained. Returns fewer than `n` lectures when
    /// fewer were found.
    pub async fn report_top_n(&self, n: usize) -> Vec<Lecture> {
        self.lectures.top_n(n).await
    }

    /// Number of distinct lectures collected
    pub async fn len(&self) -> usize {
        self.lectures.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.lectures.is_empty().await
    }

    pub async fn add(&self, lecture: Lecture) -> bool {
        self.lectures.insert(lecture).await
    }

    pub async fn remove(&self, lecture: &Lecture) -> bool {
        self.lectures.remove(lecture).await
    }

    pub async fn get(&self, index: usize) -> Option<Lecture> {
        self.lectures.get(index).await
    }

    pub async fn set(&self, index: usize, lecture: Lecture) -> Option<Lecture> {
        self.lectures.replace_at(index, lecture).await
    }

    pub async fn remove_at(&self, index: usize) -> Option<Lecture> {
        self.lectures.remove_at(index).await
    }

    pub async fn index_of(&self, lecture: &Lecture) -> Option<usize> {
        self.lectures.index_of(lecture).await
    }
}

impl std::fmt::Debug for Course {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Course")
            .field("id", &self.id)
            .field("url", &self.url)
            .field("base_url", &self.base_url.as_str())
            .field("max_in_flight", &self.max_in_flight)
            .finish_non_exhaustive()
    }
}
