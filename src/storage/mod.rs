//! Persistence for the last-checked watermark.
//!
//! The only state that survives between runs is one instant: everything
//! created before it has already been announced.
//!
//! ```text
//! storage/
//! ├── last_check.log        # RFC 3339 instant of the last successful check
//! └── snapshots/            # Optional `snapshot` command output
//!     ├── assignments_curr.json
//!     ├── files_curr.json
//!     └── folders_curr.json
//! ```

pub mod local;
pub mod snapshot;

use async_trait::async_trait;
use chrono::{DateTime, Duration, SubsecRound, Utc};

use crate::error::Result;

// Re-export for convenience
pub use local::LocalWatermarkStore;

/// Latest whole second that had fully elapsed at `now`.
///
/// Canvas reports instants to the second, so content uploaded later within
/// the current second carries a timestamp at or before `now`. Watermarks are
/// taken from this instant instead of `now`, and anything stamped after it
/// is left for the next check.
pub fn settled(now: DateTime<Utc>) -> DateTime<Utc> {
    now.trunc_subsecs(0) - Duration::seconds(1)
}

/// Trait for watermark storage backends.
#[async_trait]
pub trait WatermarkStore: Send + Sync {
    /// Read the stored instant; `None` if nothing was ever stored.
    ///
    /// A stored value that does not parse is an error, never `None`.
    async fn load(&self) -> Result<Option<DateTime<Utc>>>;

    /// Replace the stored instant.
    async fn save(&self, instant: DateTime<Utc>) -> Result<()>;

    /// Start a check window at the current [`settled`] instant.
    ///
    /// Returns `(this_check, last_check)` and persists `this_check`. On first
    /// use `last_check == this_check`, so nothing already in the course is
    /// reported as new.
    async fn read_and_advance(&self) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let this_check = settled(Utc::now());
        let last_check = self.load().await?.unwrap_or(this_check);
        self.save(this_check).await?;
        Ok((this_check, last_check))
    }
}
