//! Course content entities as returned by the Canvas API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canvas object identifier.
pub type EntityId = u64;

/// Identifier of a course folder.
pub type FolderId = EntityId;

/// Anything carrying creation and modification instants.
pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
}

/// A course assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Assignment {
    pub id: EntityId,

    /// Assignment title, e.g. `Homework-4`
    pub name: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Due date; unset for undated assignments
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,

    /// Link to the assignment (submission) page
    pub html_url: String,
}

/// A file uploaded to the course.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct File {
    pub id: EntityId,

    /// Name shown to students
    pub display_name: String,

    /// Owning folder
    pub folder_id: FolderId,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A course folder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Any of the three tracked content kinds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entity {
    Assignment(Assignment),
    File(File),
    Folder(Folder),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Assignment(a) => a.id,
            Entity::File(f) => f.id,
            Entity::Folder(f) => f.id,
        }
    }
}

macro_rules! impl_timestamped {
    ($($ty:ty),*) => {
        $(
            impl Timestamped for $ty {
                fn created_at(&self) -> DateTime<Utc> {
                    self.created_at
                }
                fn updated_at(&self) -> DateTime<Utc> {
                    self.updated_at
                }
            }
        )*
    };
}

impl_timestamped!(Assignment, File, Folder);

impl Timestamped for Entity {
    fn created_at(&self) -> DateTime<Utc> {
        match self {
            Entity::Assignment(a) => a.created_at,
            Entity::File(f) => f.created_at,
            Entity::Folder(f) => f.created_at,
        }
    }

    fn updated_at(&self) -> DateTime<Utc> {
        match self {
            Entity::Assignment(a) => a.updated_at,
            Entity::File(f) => f.updated_at,
            Entity::Folder(f) => f.updated_at,
        }
    }
}

impl From<Assignment> for Entity {
    fn from(value: Assignment) -> Self {
        Entity::Assignment(value)
    }
}

impl From<File> for Entity {
    fn from(value: File) -> Self {
        Entity::File(value)
    }
}

impl From<Folder> for Entity {
    fn from(value: Folder) -> Self {
        Entity::Folder(value)
    }
}
