//! Homework file ↔ assignment matching.
//!
//! Canvas keeps homework handouts (files) and their submission pages
//! (assignments) as unrelated objects. They are paired by name:
//!
//! - a file such as `HW4_handout.pdf` maps to the assignment whose name
//!   contains `Homework-4`;
//! - an assignment such as `Homework-4` maps to the first file whose name
//!   contains `HW4`.
//!
//! Matching is plain substring search, so `Homework-1` also matches
//! `Homework-10`. Solution files never take part.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Assignment, File};

/// First run of decimal digits, e.g. `3` in `HW3_problem.pdf`.
static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("DIGIT_RUN regex should compile"));

/// Whether a file name looks like a homework handout.
pub fn is_homework_file(display_name: &str) -> bool {
    let lower = display_name.to_lowercase();
    lower.contains("hw") && !is_solution(&lower)
}

/// Whether an assignment name looks like a homework submission.
pub fn is_homework_assignment(name: &str) -> bool {
    name.to_lowercase().contains("homework")
}

fn is_solution(name: &str) -> bool {
    name.to_lowercase().contains("solution")
}

/// First run of decimal digits in a file name.
pub fn homework_number(display_name: &str) -> Option<&str> {
    DIGIT_RUN.find(display_name).map(|m| m.as_str())
}

/// Assignment-name key for a homework number, e.g. `Homework-4`.
pub fn assignment_key(number: &str) -> String {
    format!("Homework-{number}")
}

/// File-name fragment expected for an assignment, e.g. `HW4` for `Homework-4`.
///
/// Uses the segment after the last `-`; names without one yield `None`.
pub fn expected_file_fragment(assignment_name: &str) -> Option<String> {
    assignment_name
        .rsplit_once('-')
        .map(|(_, suffix)| format!("HW{suffix}"))
}

/// Substring policy shared by both matching directions.
pub fn name_matches(candidate: &str, key: &str) -> bool {
    candidate.contains(key)
}

/// First assignment whose name contains `key`.
pub fn find_assignment<'a>(key: &str, assignments: &'a [Assignment]) -> Option<&'a Assignment> {
    assignments.iter().find(|a| name_matches(&a.name, key))
}

/// First non-solution file whose name contains `fragment`.
pub fn find_homework_file<'a>(fragment: &str, files: &[&'a File]) -> Option<&'a File> {
    files
        .iter()
        .copied()
        .find(|f| name_matches(&f.display_name, fragment) && !is_solution(&f.display_name))
}
