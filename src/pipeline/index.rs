//! Folder content index.
//!
//! Groups course files by owning folder so the composer can walk tracked
//! folders in configured order. Folders without files have no entry;
//! [`FolderIndex::files_in`] returns an empty slice for them.

use std::collections::HashMap;

use crate::models::{File, FolderId};

/// Files grouped by `folder_id`, input order preserved within each group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderIndex<'a> {
    groups: HashMap<FolderId, Vec<&'a File>>,
}

impl<'a> FolderIndex<'a> {
    /// Files in `folder`, empty when the folder holds none.
    pub fn files_in(&self, folder: FolderId) -> &[&'a File] {
        self.groups.get(&folder).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `folder` has an entry.
    pub fn contains(&self, folder: FolderId) -> bool {
        self.groups.contains_key(&folder)
    }

    /// Number of folders with at least one file.
    pub fn folder_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of indexed files.
    pub fn file_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// True if any of `folders` has at least one file.
    pub fn any_in(&self, folders: &[FolderId]) -> bool {
        folders.iter().any(|id| self.contains(*id))
    }
}

/// Group files by their owning folder.
pub fn index_by_folder<'a, I>(files: I) -> FolderIndex<'a>
where
    I: IntoIterator<Item = &'a File>,
{
    let mut groups: HashMap<FolderId, Vec<&'a File>> = HashMap::new();
    for file in files {
        groups.entry(file.folder_id).or_default().push(file);
    }
    FolderIndex { groups }
}
