//! Terminal output: progress lines, lecture summaries, the footer and failures

use std::fmt;
use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::watch;
use url::Url;

use crate::crawler::fanout::ProgressSnapshot;
use crate::error::PlannerErrorTrait;
use crate::models::Lecture;

/// Prints a progress line whenever progress moved by more than `step` points
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    step: f64,
    last: f64,
}

impl ProgressReporter {
    pub fn new(step: f64) -> Self {
        Self { step, last: 0.0 }
    }

    /// Percentage of the last printed line
    pub fn last_printed(&self) -> f64 {
        self.last
    }

    /// Line to print for `snapshot`, if progress advanced far enough
    pub fn observe(&mut self, snapshot: ProgressSnapshot) -> Option<String> {
        let percentage = snapshot.percentage();
        if percentage - self.last > self.step {
            self.last = percentage;
            Some(format!("{percentage:.2}% finished"))
        } else {
            None
        }
    }

    /// Consume progress events until the fan-out drained
    ///
    /// Returns the last snapshot seen, which is the final one.
    pub async fn drive<W: Write>(
        mut self,
        mut events: watch::Receiver<ProgressSnapshot>,
        mut out: W,
    ) -> io::Result<ProgressSnapshot> {
        loop {
            let snapshot = *events.borrow_and_update();
            if let Some(line) = self.observe(snapshot) {
                writeln!(out, "{line}")?;
                out.flush()?;
            }

            if events.changed().await.is_err() {
                break;
            }
        }

        let last = *events.borrow();
        if let Some(line) = self.observe(last) {
            writeln!(out, "{line}")?;
        }
        out.flush()?;

        Ok(last)
    }
}

/// A lecture printed with the absolute url of its page
pub struct LectureSummary<'a> {
    lecture: &'a Lecture,
    base_url: &'a Url,
}

impl<'a> LectureSummary<'a> {
    pub fn new(lecture: &'a Lecture, base_url: &'a Url) -> Self {
        Self { lecture, base_url }
    }
}

impl fmt::Display for LectureSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let url = self
            .base_url
            .join(self.lecture.source())
            .map(String::from)
            .unwrap_or_else(|_| format!("{}{}", self.base_url, self.lecture.source()));

        write!(
            f,
            "Lecture {} on {} with url: {}\nAt location: {}",
            self.lecture.name(),
            self.lecture.start_time().format("%a %d.%m.%Y %H:%M"),
            url,
            self.lecture.location()
        )
    }
}

pub fn render_lecture(lecture: &Lecture, base_url: &Url) -> String {
    LectureSummary::new(lecture, base_url).to_string()
}

/// Closing line stating how many of the collected lectures were shown
pub fn render_footer(shown: usize, total: usize, elapsed: Duration) -> String {
    format!(
        "Showing {shown} of {total} lectures in {:.2} secs",
        elapsed.as_secs_f64()
    )
}

/// What a fatal failure prints: the user message, plus the error chain in debug mode
pub fn render_failure<E: PlannerErrorTrait>(error: &E, debug: bool) -> String {
    let mut message = error.user_message();
    if debug {
        let mut source = error.source();
        message.push_str(&format!("\n{error}"));
        while let Some(cause) = source {
            message.push_str(&format!("\n  caused by: {cause}"));
            source = cause.source();
        }
    }
    message
}
