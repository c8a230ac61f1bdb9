//! Course content snapshots.
//!
//! Dumps the current assignments, files and folders as small JSON records
//! for debugging what Canvas reports. Assignments record their due date;
//! files and folders record their modification time.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::{Assignment, Entity, EntityId, File, Folder, Timestamped};

pub const ASSIGNMENTS_FILE: &str = "assignments_curr.json";
pub const FILES_FILE: &str = "files_curr.json";
pub const FOLDERS_FILE: &str = "folders_curr.json";

/// One snapshot line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SnapshotRecord {
    Assignment {
        id: EntityId,
        due_at: Option<DateTime<Utc>>,
    },
    Content {
        id: EntityId,
        updated_at: DateTime<Utc>,
    },
}

impl From<&Entity> for SnapshotRecord {
    fn from(entity: &Entity) -> Self {
        match entity {
            Entity::Assignment(a) => SnapshotRecord::Assignment {
                id: a.id,
                due_at: a.due_at,
            },
            Entity::File(_) | Entity::Folder(_) => SnapshotRecord::Content {
                id: entity.id(),
                updated_at: entity.updated_at(),
            },
        }
    }
}

/// Summary of an export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotSummary {
    pub assignments: usize,
    pub files: usize,
    pub folders: usize,
}

/// Write a list of entities as pretty JSON records.
pub async fn write_snapshot(path: &Path, entities: &[Entity]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let records: Vec<SnapshotRecord> = entities.iter().map(SnapshotRecord::from).collect();
    let bytes = serde_json::to_vec_pretty(&records)?;

    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(&bytes).await?;
    file.flush().await?;

    log::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(records.len())
}

/// Export all three content kinds into `dir`.
pub async fn export_course(
    dir: &Path,
    assignments: &[Assignment],
    files: &[File],
    folders: &[Folder],
) -> Result<SnapshotSummary> {
    let assignments: Vec<Entity> = assignments.iter().cloned().map(Entity::from).collect();
    let files: Vec<Entity> = files.iter().cloned().map(Entity::from).collect();
    let folders: Vec<Entity> = folders.iter().cloned().map(Entity::from).collect();

    Ok(SnapshotSummary {
        assignments: write_snapshot(&dir.join(ASSIGNMENTS_FILE), &assignments).await?,
        files: write_snapshot(&dir.join(FILES_FILE), &files).await?,
        folders: write_snapshot(&dir.join(FOLDERS_FILE), &folders).await?,
    })
}
