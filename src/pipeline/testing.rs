//! In-memory collaborators shared by pipeline tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Notify;

use crate::error::{AppError, Result};
use crate::models::{Assignment, File, Folder, FolderId};
use crate::pipeline::compose::CourseLayout;
use crate::services::{ChannelSink, CourseSource};
use crate::storage::WatermarkStore;

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    Utc::now() - Duration::hours(hours)
}

pub fn secs_ago(secs: i64) -> DateTime<Utc> {
    Utc::now() - Duration::seconds(secs)
}

pub fn layout() -> CourseLayout {
    CourseLayout {
        base_url: "https://canvas.example.edu".into(),
        course_id: 42,
        folder_order: vec![101, 102, 103],
        homework_folder: 103,
    }
}

pub fn assignment(
    id: u64,
    name: &str,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Assignment {
    Assignment {
        id,
        name: name.to_string(),
        created_at,
        updated_at,
        due_at: None,
        html_url: format!("https://canvas.example.edu/courses/42/assignments/{id}"),
    }
}

pub fn file(
    id: u64,
    folder_id: FolderId,
    name: &str,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> File {
    File {
        id,
        display_name: name.to_string(),
        folder_id,
        created_at,
        updated_at,
    }
}

pub fn folder(id: FolderId, name: &str) -> Folder {
    let ts = hours_ago(24 * 30);
    Folder {
        id,
        name: name.to_string(),
        created_at: ts,
        updated_at: ts,
    }
}

/// Course source backed by vectors.
///
/// The first `failures` calls to `files()` fail. Once `files()` has been
/// called `stop_after` times, `stop` is notified.
pub struct FakeSource {
    assignments: Mutex<Vec<Assignment>>,
    folders: Vec<Folder>,
    files: Mutex<Vec<File>>,
    failures: AtomicUsize,
    fetches: AtomicUsize,
    stop_after: usize,
    pub stop: Notify,
}

impl FakeSource {
    pub fn new(assignments: Vec<Assignment>, folders: Vec<Folder>, files: Vec<File>) -> Self {
        Self {
            assignments: Mutex::new(assignments),
            folders,
            files: Mutex::new(files),
            failures: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
            stop_after: usize::MAX,
            stop: Notify::new(),
        }
    }

    /// Source whose first `failures` file fetches fail.
    pub fn failing(failures: usize) -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new()).with_failures(failures)
    }

    pub fn with_failures(self, failures: usize) -> Self {
        self.failures.store(failures, Ordering::SeqCst);
        self
    }

    pub fn stop_after(mut self, fetches: usize) -> Self {
        self.stop_after = fetches;
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn push_file(&self, file: File) {
        self.files.lock().unwrap().push(file);
    }

    pub fn push_assignment(&self, assignment: Assignment) {
        self.assignments.lock().unwrap().push(assignment);
    }
}

#[async_trait]
impl CourseSource for FakeSource {
    async fn assignments(&self) -> Result<Vec<Assignment>> {
        Ok(self.assignments.lock().unwrap().clone())
    }

    async fn folders(&self) -> Result<Vec<Folder>> {
        Ok(self.folders.clone())
    }

    async fn files(&self) -> Result<Vec<File>> {
        let count = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        if count == self.stop_after {
            self.stop.notify_one();
        }

        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(AppError::fetch("files", "503 Service Unavailable"));
        }
        Ok(self.files.lock().unwrap().clone())
    }
}

/// Sink that records messages, optionally refusing them.
#[derive(Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChannelSink for RecordingSink {
    async fn send(&self, text: &str) -> Result<()> {
        if self.fail {
            return Err(AppError::notify("401 Unauthorized"));
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Watermark held in memory.
#[derive(Default)]
pub struct MemoryStore {
    value: Mutex<Option<DateTime<Utc>>>,
    corrupt: bool,
    read_only: bool,
}

impl MemoryStore {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            value: Mutex::new(Some(instant)),
            ..Self::default()
        }
    }

    /// Store whose contents never parse.
    pub fn corrupt() -> Self {
        Self {
            corrupt: true,
            ..Self::default()
        }
    }

    /// Store holding `instant` that rejects every save.
    pub fn read_only(instant: DateTime<Utc>) -> Self {
        Self {
            read_only: true,
            ..Self::at(instant)
        }
    }

    pub fn get(&self) -> Option<DateTime<Utc>> {
        *self.value.lock().unwrap()
    }
}

#[async_trait]
impl WatermarkStore for MemoryStore {
    async fn load(&self) -> Result<Option<DateTime<Utc>>> {
        if self.corrupt {
            return Err(AppError::timestamp("memory", "garbage", "invalid"));
        }
        Ok(self.get())
    }

    async fn save(&self, instant: DateTime<Utc>) -> Result<()> {
        if self.read_only {
            return Err(AppError::Io(std::io::Error::other("disk full")));
        }
        *self.value.lock().unwrap() = Some(instant);
        Ok(())
    }
}
