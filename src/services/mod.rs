//! External collaborators: the course data source and the chat sink.
//!
//! - `CanvasClient`: fetches assignments, folders and files over the Canvas REST API
//! - `DiscordClient`: posts announcements to a Discord channel
//! - `LogSink`: writes announcements to the log instead (dry runs)

pub mod canvas;
pub mod discord;
pub mod log_sink;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Assignment, File, Folder};

pub use canvas::CanvasClient;
pub use discord::DiscordClient;
pub use log_sink::LogSink;

/// Source of course content.
#[async_trait]
pub trait CourseSource: Send + Sync {
    async fn assignments(&self) -> Result<Vec<Assignment>>;
    async fn folders(&self) -> Result<Vec<Folder>>;
    async fn files(&self) -> Result<Vec<File>>;
}

/// Destination for announcements.
#[async_trait]
pub trait ChannelSink: Send + Sync {
    /// Deliver one message; no retries.
    async fn send(&self, text: &str) -> Result<()>;
}
