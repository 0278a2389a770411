//! ufind-planner - upcoming lectures of a u:find course
//!
//! Resolves a course id on the u:find catalog, fetches every lecture page the
//! course links to concurrently and reports the soonest upcoming sessions.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`course`] - Course orchestration: resolve, discover, fan out, report
//! - [`crawler`] - Page fetching, link discovery and the task fan-out
//! - [`parser`] - HTML parsing of lecture pages
//! - [`models`] - Core data structures and types
//! - [`storage`] - Deduplicating lecture collection
//! - [`report`] - Progress and result output
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ufind_planner::config::Config;
//! use ufind_planner::course::Course;
//! use ufind_planner::crawler::HttpFetcher;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let fetcher = Arc::new(HttpFetcher::new(&config.fetch)?);
//!     let course = Course::resolve("5.01", fetcher, &config).await?;
//!     course.run().await?;
//!     for lecture in course.report_top_n(10).await {
//!         println!("{lecture}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod course;
pub mod crawler;
pub mod error;
pub mod models;
pub mod parser;
pub mod report;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::course::Course;
    pub use crate::crawler::{FanOut, FanOutSummary, HttpFetcher, PageFetcher, ProgressSnapshot};
    pub use crate::error::{Error, ErrorCategory, PlannerErrorTrait, Result};
    pub use crate::models::Lecture;
    pub use crate::storage::LectureCollection;
    pub use crate::utils::Clock;
}

// Direct re-exports for convenience
pub use course::Course;
pub use models::Lecture;
