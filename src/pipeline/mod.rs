//! Change detection and announcement pipeline.
//!
//! - `classify`: split entities into new / updated against the watermark
//! - `index`: group files by folder
//! - `homework`: pair homework files with assignments
//! - `compose`: build the announcement
//! - `check`: one fetch → compose cycle
//! - `watch`: the polling loop

pub mod check;
pub mod classify;
pub mod compose;
pub mod homework;
pub mod index;
pub mod watch;

#[cfg(test)]
pub(crate) mod testing;

pub use check::{CheckReport, run_check};
pub use classify::{Classification, classify, classify_window};
pub use compose::{ComposeInput, CourseLayout, compose, compose_message};
pub use index::{FolderIndex, index_by_folder};
pub use watch::Watcher;
