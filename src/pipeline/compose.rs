//! Announcement composition.
//!
//! Turns classified course changes into the chat announcement. Tracked
//! folders are walked in configured order; each folder with new files gets a
//! section listing them, homework handouts annotated with their submission
//! link. When the homework folder has no new files but new homework
//! assignments appeared, the assignments are paired with handouts already in
//! the folder instead, so every homework is announced once whichever side
//! was posted first.

use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::models::{
    Announcement, Assignment, Config, File, FileLine, FolderId, Section, SectionKind,
    SubmissionLink,
};
use crate::pipeline::homework;
use crate::pipeline::index::FolderIndex;
use crate::utils::url;

/// Course-specific layout used to build links and order sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseLayout {
    /// Canvas instance root
    pub base_url: String,
    pub course_id: u64,
    /// Tracked folders, in announcement order
    pub folder_order: Vec<FolderId>,
    /// Folder whose files are paired with homework assignments
    pub homework_folder: FolderId,
}

impl CourseLayout {
    /// Build the layout from validated configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let homework_folder = config.folders.homework_folder().ok_or_else(|| {
            AppError::config(format!(
                "folders.homework_index {} has no tracked folder",
                config.folders.homework_index
            ))
        })?;

        Ok(Self {
            base_url: config.canvas.base_url.clone(),
            course_id: config.canvas.course_id,
            folder_order: config.folders.tracked.clone(),
            homework_folder,
        })
    }

    fn file_url(&self, folder_name: &str, file: &File) -> String {
        url::file_preview_url(&self.base_url, self.course_id, folder_name, file.id)
    }

    fn assignments_url(&self) -> String {
        url::assignments_url(&self.base_url, self.course_id)
    }
}

/// Everything the composer looks at for one check.
#[derive(Debug, Clone, Copy)]
pub struct ComposeInput<'a> {
    /// Files created since the last check, by folder
    pub new_files: &'a FolderIndex<'a>,
    /// Assignments created since the last check
    pub new_assignments: &'a [&'a Assignment],
    /// Display names of all course folders
    pub folder_names: &'a HashMap<FolderId, String>,
    /// Every file in the course, by folder
    pub all_files: &'a FolderIndex<'a>,
    /// Every assignment in the course
    pub all_assignments: &'a [Assignment],
}

/// Compose the announcement, or `None` when nothing new was posted.
///
/// Fails if a tracked folder has no known name.
pub fn compose(layout: &CourseLayout, input: &ComposeInput<'_>) -> Result<Option<Announcement>> {
    if !input.new_files.any_in(&layout.folder_order) && input.new_assignments.is_empty() {
        return Ok(None);
    }

    let mut sections = Vec::new();
    for &folder in &layout.folder_order {
        let folder_name = input.folder_names.get(&folder).ok_or_else(|| {
            AppError::config(format!("tracked folder {folder} does not exist in the course"))
        })?;

        let new_files = input.new_files.files_in(folder);
        if !new_files.is_empty() {
            let lines = new_files
                .iter()
                .map(|file| FileLine {
                    name: file.display_name.clone(),
                    url: layout.file_url(folder_name, file),
                    submission: submission_for_file(layout, file, input.all_assignments),
                })
                .collect();
            sections.push(Section {
                kind: SectionKind::NewFiles,
                heading: folder_name.clone(),
                lines,
            });
        } else if folder == layout.homework_folder && !input.new_assignments.is_empty() {
            sections.extend(homework_fallback(layout, folder, folder_name, input));
        }
    }

    Ok(Some(Announcement { sections }))
}

/// Compose and render the announcement text.
pub fn compose_message(layout: &CourseLayout, input: &ComposeInput<'_>) -> Result<Option<String>> {
    Ok(compose(layout, input)?.map(|a| a.to_string()))
}

/// Submission annotation for a newly posted file.
fn submission_for_file(
    layout: &CourseLayout,
    file: &File,
    assignments: &[Assignment],
) -> Option<SubmissionLink> {
    if !homework::is_homework_file(&file.display_name) {
        return None;
    }

    let resolved = homework::homework_number(&file.display_name).and_then(|number| {
        let key = homework::assignment_key(number);
        homework::find_assignment(&key, assignments).map(|assignment| SubmissionLink::Resolved {
            url: assignment.html_url.clone(),
            label: key,
        })
    });

    Some(resolved.unwrap_or_else(|| {
        log::debug!(
            "No assignment found for homework file {:?}",
            file.display_name
        );
        SubmissionLink::Unresolved {
            assignments_url: layout.assignments_url(),
        }
    }))
}

/// Section pairing new homework assignments with existing handouts.
fn homework_fallback(
    layout: &CourseLayout,
    folder: FolderId,
    folder_name: &str,
    input: &ComposeInput<'_>,
) -> Option<Section> {
    let mut section: Option<Section> = None;
    let folder_files = input.all_files.files_in(folder);

    for assignment in input
        .new_assignments
        .iter()
        .filter(|a| homework::is_homework_assignment(&a.name))
    {
        let section = section.get_or_insert_with(|| Section {
            kind: SectionKind::HomeworkFallback,
            heading: folder_name.to_string(),
            lines: Vec::new(),
        });

        let Some(fragment) = homework::expected_file_fragment(&assignment.name) else {
            log::debug!("Assignment {:?} has no homework number", assignment.name);
            continue;
        };

        if let Some(file) = homework::find_homework_file(&fragment, folder_files) {
            section.lines.push(FileLine {
                name: file.display_name.clone(),
                url: layout.file_url(folder_name, file),
                submission: Some(SubmissionLink::Resolved {
                    label: assignment.name.clone(),
                    url: assignment.html_url.clone(),
                }),
            });
        }
    }

    section
}
