//! Lecture extraction task
//!
//! One task per lecture reference: fetch the page, parse its occurrence blocks
//! and insert every upcoming occurrence into the course's shared collection.
//! The unit of isolation is the task: a failed fetch or an invalid page ends
//! this task only, and an unparsable block skips that block only.

use chrono::{Datelike, NaiveDateTime};
use std::sync::Arc;

use crate::crawler::fetcher::PageFetcher;
use crate::models::Lecture;
use crate::parser::{parse_lecture_page, LecturePage};
use crate::storage::LectureCollection;
use crate::utils::error::{FetchError, ParseError};

/// How a lecture task ended
#[derive(Debug)]
pub enum TaskOutcome {
    /// Page fetched and parsed; counts describe its occurrence blocks
    Completed {
        reference: String,
        /// New records added to the collection
        inserted: usize,
        /// Records dropped as equal to an existing one
        duplicates: usize,
        /// Occurrences not strictly after the reference time
        past: usize,
        /// Blocks whose date or time could not be parsed
        skipped: usize,
    },
    /// Page could not be fetched
    FetchFailed { reference: String, error: FetchError },
    /// Page fetched but not a lecture page
    PageInvalid { reference: String, error: ParseError },
}

impl TaskOutcome {
    pub fn reference(&self) -> &str {
        match self {
            Self::Completed { reference, .. }
            | Self::FetchFailed { reference, .. }
            | Self::PageInvalid { reference, .. } => reference,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Records this task added to the collection
    pub fn inserted(&self) -> usize {
        match self {
            Self::Completed { inserted, .. } => *inserted,
            _ => 0,
        }
    }
}

/// Upcoming lectures found on one page, plus what was left out
#[derive(Debug, Default)]
pub struct Extraction {
    pub lectures: Vec<Lecture>,
    pub past: usize,
    pub errors: Vec<ParseError>,
}

/// Turn the occurrence blocks of `page` into lectures starting after `now`
///
/// The year of `now` completes the day/month printed on the page.
pub fn extract_lectures(page: &LecturePage, reference: &str, now: NaiveDateTime) -> Extraction {
    let year = now.year();
    let mut extraction = Extraction::default();

    for occurrence in &page.occurrences {
        match occurrence.start_time(year) {
            Ok(start) if start > now => extraction.lectures.push(Lecture::new(
                page.name.clone(),
                start,
                reference,
                occurrence.room.clone(),
            )),
            Ok(_) => extraction.past += 1,
            Err(e) => extraction.errors.push(e),
        }
    }

    extraction
}

/// Fetch-parse-insert job for one lecture reference
pub struct LectureTask {
    reference: String,
    url: String,
    fetcher: Arc<dyn PageFetcher>,
    lectures: Arc<LectureCollection>,
    now: NaiveDateTime,
}

impl LectureTask {
    /// Create a task for `reference`, fetched from `url`
    pub fn new(
        reference: String,
        url: String,
        fetcher: Arc<dyn PageFetcher>,
        lectures: Arc<LectureCollection>,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            reference,
            url,
            fetcher,
            lectures,
            now,
        }
    }

    /// Run the task to completion; never fails
    pub async fn run(self) -> TaskOutcome {
        let html = match self.fetcher.fetch(&self.url).await {
            Ok(html) => html,
            Err(error) => {
                tracing::warn!(
                    reference = %self.reference,
                    recoverable = error.is_recoverable(),
                    error = %error,
                    "Could not retrieve lecture data"
                );
                return TaskOutcome::FetchFailed {
                    reference: self.reference,
                    error,
                };
            }
        };

        let page = match parse_lecture_page(&html) {
            Ok(page) => page,
            Err(error) => {
                tracing::warn!(
                    reference = %self.reference,
                    error = %error,
                    "Page is not a lecture page"
                );
                return TaskOutcome::PageInvalid {
                    reference: self.reference,
                    error,
                };
            }
        };

        let extraction = extract_lectures(&page, &self.reference, self.now);

        for error in &extraction.errors {
            tracing::warn!(
                reference = %self.reference,
                error = %error,
                "Could not convert occurrence date"
            );
        }

        let mut inserted = 0;
        let mut duplicates = 0;
        for lecture in extraction.lectures {
            if self.lectures.insert(lecture).await {
                inserted += 1;
            } else {
                duplicates += 1;
            }
        }

        tracing::debug!(
            reference = %self.reference,
            name = %page.name,
            inserted,
            duplicates,
            past = extraction.past,
            skipped = extraction.errors.len(),
            "Lecture page processed"
        );

        TaskOutcome::Completed {
            reference: self.reference,
            inserted,
            duplicates,
            past: extraction.past,
            skipped: extraction.errors.len(),
        }
    }
}
