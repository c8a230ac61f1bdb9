// src/models/mod.rs

//! Domain models for the course watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod announcement;
mod config;
mod entity;

// Re-export all public types
pub use announcement::{
    ANNOUNCEMENT_HEADER, Announcement, FileLine, Section, SectionKind, SubmissionLink,
};
pub use config::{
    CanvasConfig, Config, DiscordConfig, FoldersConfig, HttpConfig, PathsConfig, ScheduleConfig,
};
pub use entity::{Assignment, Entity, EntityId, File, Folder, FolderId, Timestamped};
