// src/pipeline/check.rs

//! One check cycle: fetch, classify, index, compose.
//!
//! The cycle is given the previous watermark and hands back the instant to
//! persist; it never touches storage itself, so a cycle that fails part way
//! leaves the watermark where it was.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::{AppError, Result};
use crate::models::{Announcement, Assignment, File, Folder, FolderId};
use crate::pipeline::classify::{Classification, classify_window};
use crate::pipeline::compose::{ComposeInput, CourseLayout, compose};
use crate::pipeline::index::index_by_folder;
use crate::services::CourseSource;

/// Outcome of one check cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Start of this check; the next watermark
    pub this_check: DateTime<Utc>,
    /// Watermark the check compared against
    pub last_check: DateTime<Utc>,
    pub new_assignments: usize,
    pub updated_assignments: usize,
    pub new_files: usize,
    pub updated_files: usize,
    pub new_folders: usize,
    /// Composed announcement, if anything new was posted
    pub announcement: Option<Announcement>,
}

impl CheckReport {
    /// Rendered announcement text.
    pub fn message(&self) -> Option<String> {
        self.announcement.as_ref().map(ToString::to_string)
    }
}

/// Fail if a tracked folder is not among the course's folders.
pub fn ensure_tracked_folders(
    layout: &CourseLayout,
    folder_names: &HashMap<FolderId, String>,
) -> Result<()> {
    let missing: Vec<String> = layout
        .folder_order
        .iter()
        .filter(|id| !folder_names.contains_key(*id))
        .map(ToString::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::config(format!(
            "tracked folders not found in course {}: {}",
            layout.course_id,
            missing.join(", ")
        )))
    }
}

/// Run one check over the window `(last_check, this_check]`.
///
/// Changes stamped after `this_check` are left for the next check.
pub async fn run_check(
    source: &dyn CourseSource,
    layout: &CourseLayout,
    last_check: DateTime<Utc>,
    this_check: DateTime<Utc>,
) -> Result<CheckReport> {
    let (assignments, folders, files) =
        futures::try_join!(source.assignments(), source.folders(), source.files())?;

    log::debug!(
        "Fetched {} assignments, {} folders, {} files",
        assignments.len(),
        folders.len(),
        files.len()
    );

    let folder_names: HashMap<FolderId, String> =
        folders.iter().map(|f| (f.id, f.name.clone())).collect();
    ensure_tracked_folders(layout, &folder_names)?;

    let assignment_changes: Classification<'_, Assignment> =
        classify_window(&assignments, last_check, this_check);
    let file_changes: Classification<'_, File> = classify_window(&files, last_check, this_check);
    let folder_changes: Classification<'_, Folder> =
        classify_window(&folders, last_check, this_check);

    let all_files = index_by_folder(&files);
    let new_files = index_by_folder(file_changes.new.iter().copied());

    let input = ComposeInput {
        new_files: &new_files,
        new_assignments: &assignment_changes.new,
        folder_names: &folder_names,
        all_files: &all_files,
        all_assignments: &assignments,
    };
    let announcement = compose(layout, &input)?;

    if !file_changes.updated.is_empty() || !assignment_changes.updated.is_empty() {
        log::info!(
            "Updated since last check: {} files, {} assignments",
            file_changes.updated.len(),
            assignment_changes.updated.len()
        );
    }

    Ok(CheckReport {
        this_check,
        last_check,
        new_assignments: assignment_changes.new.len(),
        updated_assignments: assignment_changes.updated.len(),
        new_files: file_changes.new.len(),
        updated_files: file_changes.updated.len(),
        new_folders: folder_changes.new.len(),
        announcement,
    })
}
