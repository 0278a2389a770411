//! Crawling: fetching pages, discovering links and fanning out lecture tasks
//!
//! - [`fetcher`] - `PageFetcher` seam and its reqwest implementation
//! - [`links`] - course id resolution and lecture link discovery
//! - [`task`] - per-reference fetch/parse/insert task
//! - [`fanout`] - concurrent coordinator with progress reporting

pub mod fanout;
pub mod fetcher;
pub mod links;
pub mod task;

pub use fanout::{FanOut, FanOutSummary, Progress, ProgressSnapshot};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use links::{discover_lecture_links, resolve_course_url};
pub use task::{LectureTask, TaskOutcome};
