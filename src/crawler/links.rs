//! Link discovery on catalog and course pages
//!
//! Two pure functions over already fetched markup: resolving a course id to its
//! page on the catalog, and collecting the lecture references of a course page.

use scraper::Html;
use std::collections::HashSet;
use url::Url;

use crate::parser::selectors::{COURSE_LINK, LECTURE_LINK};
use crate::utils::error::ResolutionError;
use crate::utils::normalize_whitespace;

/// Collect the distinct lecture references linked from a course page
///
/// Returns an empty set when the page links no lectures.
///
/// ```
/// use ufind_planner::crawler::links::discover_lecture_links;
///
/// let html = r#"<a class="what" href="course.html?lv=1">A</a>
///               <a class="what" href="course.html?lv=1">A again</a>"#;
/// assert_eq!(discover_lecture_links(html).len(), 1);
/// ```
pub fn discover_lecture_links(html: &str) -> HashSet<String> {
    let document = Html::parse_document(html);

    document
        .select(&LECTURE_LINK)
        .filter_map(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect()
}

/// Find the page of `course_id` on the catalog page
///
/// A catalog entry matches when its label starts with the id followed by a
/// single space, so `5.01` never matches an entry for `5.010`. The first
/// matching entry with an href wins; entries without one are skipped. The href
/// is joined onto `base_url`.
///
/// # Errors
///
/// Returns `ResolutionError::CourseNotFound` when no entry matches.
pub fn resolve_course_url(
    html: &str,
    course_id: &str,
    base_url: &Url,
) -> Result<String, ResolutionError> {
    let course_id = course_id.trim();
    if course_id.is_empty() {
        return Err(ResolutionError::EmptyCourseId);
    }

    let prefix = format!("{course_id} ");
    let document = Html::parse_document(html);

    let href = document
        .select(&COURSE_LINK)
        .filter(|el| normalize_whitespace(&el.text().collect::<String>()).starts_with(&prefix))
        .find_map(|el| {
            el.value()
                .attr("href")
                .map(str::trim)
                .filter(|href| !href.is_empty())
        })
        .ok_or_else(|| ResolutionError::CourseNotFound {
            id: course_id.to_string(),
        })?;

    let url = base_url
        .join(href)
        .map_err(|source| ResolutionError::InvalidUrl {
            href: href.to_string(),
            source,
        })?;

    Ok(url.to_string())
}
