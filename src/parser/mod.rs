//! HTML parsing and data extraction
//!
//! This module turns lecture page markup into occurrence blocks and composes
//! their date and time cells into timestamps.

pub mod selectors;

use chrono::NaiveDateTime;
use scraper::{ElementRef, Html, Selector};

use crate::utils::error::ParseError;
use crate::utils::{first_token, normalize_whitespace};

/// Format of the composed `date + year + "/" + time` text
pub const START_TIME_FORMAT: &str = "%d.%m.%Y/%H:%M";

/// Structured content of one lecture page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LecturePage {
    /// Display name of the lecture
    pub name: String,

    /// Upcoming occurrence blocks, `future` ones first, then `next`
    pub occurrences: Vec<Occurrence>,
}

/// Raw cells of one occurrence block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// Day and month, e.g. `15.06.`
    pub date: String,

    /// Start time with trailing annotations removed, e.g. `14:30`
    pub time: String,

    /// Room or location label
    pub room: String,
}

impl Occurrence {
    /// Start of this occurrence in `year`
    pub fn start_time(&self, year: i32) -> Result<NaiveDateTime, ParseError> {
        parse_start_time(&self.date, year, &self.time)
    }
}

/// Compose `date + year + "/" + time` and parse it as `day.month.year/hour:minute`
///
/// ```
/// use ufind_planner::parser::parse_start_time;
///
/// let start = parse_start_time("15.06.", 2025, "14:30").unwrap();
/// assert_eq!(start.to_string(), "2025-06-15 14:30:00");
/// ```
pub fn parse_start_time(date: &str, year: i32, time: &str) -> Result<NaiveDateTime, ParseError> {
    let input = format!("{}{year}/{}", date.trim(), first_token(time));
    NaiveDateTime::parse_from_str(&input, START_TIME_FORMAT)
        .map_err(|source| ParseError::InvalidDateTime { input, source })
}

/// Parse a lecture page into its name and occurrence blocks
///
/// # Errors
///
/// Returns `ParseError::MissingField` if the page has no lecture name.
pub fn parse_lecture_page(html: &str) -> Result<LecturePage, ParseError> {
    let document = Html::parse_document(html);

    let name = document
        .select(&selectors::LECTURE_NAME)
        .next()
        .map(|el| element_text(&el))
        .ok_or(ParseError::MissingField { field: "name" })?;

    let occurrences = selectors::OCCURRENCE_BLOCKS
        .iter()
        .flat_map(|selector| document.select(selector))
        .map(|block| Occurrence {
            date: cell_text(&block, &selectors::OCCURRENCE_DATE),
            time: first_token(&cell_text(&block, &selectors::OCCURRENCE_TIME)).to_string(),
            room: cell_text(&block, &selectors::OCCURRENCE_ROOM),
        })
        .collect();

    Ok(LecturePage { name, occurrences })
}

fn element_text(element: &ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Text of every matching cell inside `block`, joined by single spaces
fn cell_text(block: &ElementRef<'_>, selector: &Selector) -> String {
    let parts: Vec<String> = block
        .select(selector)
        .map(|el| element_text(&el))
        .filter(|text| !text.is_empty())
        .collect();
    parts.join(" ")
}
