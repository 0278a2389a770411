// Core data structures for the planner

use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One scheduled occurrence of a lecture
///
/// Identity (`PartialEq`/`Hash`) covers the source page, the start time and the
/// location; the name is not part of it. Ordering is not derived: sort with
/// [`Lecture::cmp_by_start_time`].
#[derive(Debug, Clone)]
pub struct Lecture {
    name: String,
    start_time: NaiveDateTime,
    source: String,
    location: String,
}

impl Lecture {
    pub fn new(
        name: impl Into<String>,
        start_time: NaiveDateTime,
        source: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            start_time,
            source: source.into(),
            location: location.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    /// Reference of the lecture page this occurrence was found on
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Whether both records describe the same occurrence
    pub fn same_occurrence(&self, other: &Self) -> bool {
        self.source == other.source
            && self.start_time == other.start_time
            && self.location == other.location
    }

    /// Ascending start time; records starting together compare equal
    pub fn cmp_by_start_time(a: &Self, b: &Self) -> Ordering {
        a.start_time.cmp(&b.start_time)
    }
}

impl PartialEq for Lecture {
    fn eq(&self, other: &Self) -> bool {
        self.same_occurrence(other)
    }
}

impl Eq for Lecture {}

impl Hash for Lecture {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.start_time.hash(state);
        self.location.hash(state);
    }
}

impl fmt::Display for Lecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lecture {} on {} with url: {}\nAt location: {}",
            self.name,
            self.start_time.format("%a %d.%m.%Y %H:%M"),
            self.source,
            self.location
        )
    }
}
