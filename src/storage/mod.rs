//! In-memory lecture storage
//!
//! The collection is the only state written by more than one lecture task.

pub mod collection;

pub use collection::LectureCollection;
