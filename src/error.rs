//! Unified error handling for the planner crate
//!
//! Domain-specific errors live in [`crate::utils::error`]; this module wraps
//! them into a single [`Error`] enum for the binary boundary.
//!
//! # Architecture
//!
//! - [`PlannerErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors

use thiserror::Error;

pub use crate::utils::error::{FetchError, ParseError, ResolutionError};

/// Common trait for all planner error types
pub trait PlannerErrorTrait: std::error::Error {
    /// Check if this error is recoverable (a later run may succeed)
    fn is_recoverable(&self) -> bool;

    /// One-line description suitable for the end user
    fn user_message(&self) -> String;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout)
    Network,
    /// Course id resolution errors
    Resolution,
    /// Configuration and validation errors
    Config,
}

impl ErrorCategory {
    /// Short label for the category
    pub fn label(&self) -> &'static str {
        match self {
            Self::Network => "network error",
            Self::Resolution => "resolution error",
            Self::Config => "configuration error",
        }
    }
}

/// Unified error type for the planner crate
#[derive(Error, Debug)]
pub enum Error {
    /// Course resolution or catalog errors
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// Fetch-specific errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl PlannerErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Resolution(ResolutionError::CatalogUnreachable(e)) | Self::Fetch(e) => {
                e.is_recoverable()
            }
            Self::Resolution(_) => false,
            Self::Config(_) => false,
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::Resolution(ResolutionError::CourseNotFound { id }) => {
                format!("ERROR: No course found for id '{id}'")
            }
            Self::Resolution(ResolutionError::EmptyCourseId) => {
                "ERROR: Please specify a course id, e.g. 5.01".to_string()
            }
            Self::Resolution(ResolutionError::CatalogUnreachable(_)) | Self::Fetch(_) => {
                "ERROR: Can't retrieve data - make sure you are connected to the internet!"
                    .to_string()
            }
            Self::Config(msg) => format!("ERROR: Invalid configuration: {msg}"),
            other => format!("ERROR: {}: {other}", other.category().label()),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Resolution(ResolutionError::CatalogUnreachable(_)) | Self::Fetch(_) => {
                ErrorCategory::Network
            }
            Self::Resolution(_) => ErrorCategory::Resolution,
            Self::Config(_) => ErrorCategory::Config,
        }
    }
}

// Config loading reports through anyhow
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Config(format!("{err:#}"))
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
