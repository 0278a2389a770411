//! Error types for the planner crawler
//!
//! This module defines the per-domain error types used throughout the crate.

use thiserror::Error;

/// Errors that can occur while fetching a single page
///
/// Every request-level variant carries the url it was raised for, so a failed
/// lecture task can be reported without extra context.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request did not complete within the configured timeout
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// Connection could not be established
    #[error("Could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    /// Response body could not be decoded to text
    #[error("Could not decode response body from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// Any other transport error
    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Url could not be built or parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client construction failed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// Classify a reqwest error raised while requesting `url`
    pub fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        let url = url.to_string();
        if source.is_timeout() {
            Self::Timeout { url }
        } else if source.is_connect() {
            Self::Connect { url, source }
        } else if source.is_builder() {
            Self::InvalidUrl(url)
        } else {
            Self::Http { url, source }
        }
    }

    /// Whether a later attempt might succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connect { .. } | Self::Http { .. } => true,
            Self::Status { status, .. } => matches!(status, 429 | 500 | 502 | 503 | 504),
            Self::Decode { .. } | Self::InvalidUrl(_) | Self::Client(_) => false,
        }
    }
}

/// Errors that can occur while parsing a lecture page
#[derive(Error, Debug)]
pub enum ParseError {
    /// A required element is missing from the page
    #[error("Required field not found: {field}")]
    MissingField { field: &'static str },

    /// Composed date/time text does not match `day.month.year/hour:minute`
    #[error("Invalid date/time '{input}': {source}")]
    InvalidDateTime {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Errors that abort a whole planner run
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// Blank course id
    #[error("Course id must not be empty")]
    EmptyCourseId,

    /// No catalog entry is labelled with the course id
    #[error("No course found for id {id}")]
    CourseNotFound { id: String },

    /// The catalog or course page could not be fetched
    #[error("Catalog page unreachable: {0}")]
    CatalogUnreachable(#[from] FetchError),

    /// A catalog link could not be turned into an absolute url
    #[error("Invalid course url '{href}': {source}")]
    InvalidUrl {
        href: String,
        #[source]
        source: url::ParseError,
    },
}
