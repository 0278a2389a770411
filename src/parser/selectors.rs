//! CSS selectors for the course catalog and lecture pages
//!
//! The markup conventions are fixed by the target site; everything that
//! depends on them is kept in this table.

use lazy_static::lazy_static;
use scraper::Selector;

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

lazy_static! {
    /// Course entries on the catalog page
    pub static ref COURSE_LINK: Selector = parse_selector!(".link");

    /// Lecture links on a course page
    pub static ref LECTURE_LINK: Selector = parse_selector!(".what");

    /// Display name of a lecture page
    pub static ref LECTURE_NAME: Selector = parse_selector!(".usse-id-courselong .what");

    /// Occurrence blocks, listed in the order they are read
    pub static ref OCCURRENCE_BLOCKS: Vec<Selector> = vec![
        parse_selector!(".event.line.future"),
        parse_selector!(".event.line.next"),
    ];

    pub static ref OCCURRENCE_DATE: Selector = parse_selector!(".date");
    pub static ref OCCURRENCE_TIME: Selector = parse_selector!(".time");
    pub static ref OCCURRENCE_ROOM: Selector = parse_selector!(".room");
}
