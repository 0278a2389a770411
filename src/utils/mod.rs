//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;

use chrono::{Local, NaiveDateTime};

/// Normalize whitespace in text
///
/// Collapses every run of whitespace into a single space and trims both ends,
/// which is how visible element text is compared across the crate.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text before the first whitespace character
///
/// Time cells carry trailing annotations (`"14:30 - 16:00"`); only the leading
/// token is meaningful.
pub fn first_token(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}

/// Source of the "current moment" used to drop past occurrences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    /// Local wall-clock time
    #[default]
    System,
    /// Fixed instant
    Fixed(NaiveDateTime),
}

impl Clock {
    /// Current local date and time, without timezone
    pub fn now(&self) -> NaiveDateTime {
        match self {
            Self::System => Local::now().naive_local(),
            Self::Fixed(instant) => *instant,
        }
    }
}
