//! Local filesystem watermark store.
//!
//! Keeps the last-checked instant as a single RFC 3339 line. A missing or
//! blank file means "never checked"; anything else must parse.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::WatermarkStore;

/// File-backed watermark store.
#[derive(Debug, Clone)]
pub struct LocalWatermarkStore {
    path: PathBuf,
}

impl LocalWatermarkStore {
    /// Create a store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read the file, returning None if it doesn't exist.
    async fn read_string(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

/// Parse a stored watermark; blank text means none was stored.
pub fn parse_watermark(location: &str, text: &str) -> Result<Option<DateTime<Utc>>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| Some(dt.with_timezone(&Utc)))
        .map_err(|e| AppError::timestamp(location, trimmed, e))
}

#[async_trait]
impl WatermarkStore for LocalWatermarkStore {
    async fn load(&self) -> Result<Option<DateTime<Utc>>> {
        match self.read_string().await? {
            Some(text) => parse_watermark(&self.path.display().to_string(), &text),
            None => {
                log::info!(
                    "No watermark at {}; treating this as the first check",
                    self.path.display()
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, instant: DateTime<Utc>) -> Result<()> {
        self.write_bytes(instant.to_rfc3339().as_bytes()).await?;
        log::debug!("Watermark advanced to {}", instant.to_rfc3339());
        Ok(())
    }
}
