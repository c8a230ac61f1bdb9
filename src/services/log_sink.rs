//! Sink that logs announcements instead of posting them.

use async_trait::async_trait;

use crate::error::Result;
use crate::services::ChannelSink;

/// Dry-run sink: every message goes to the `info` log.
#[derive(Debug, Clone, Default)]
pub struct LogSink;

#[async_trait]
impl ChannelSink for LogSink {
    async fn send(&self, text: &str) -> Result<()> {
        log::info!("[dry run] would send:\n{}", text);
        Ok(())
    }
}
