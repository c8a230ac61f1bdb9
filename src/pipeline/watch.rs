// src/pipeline/watch.rs

//! Polling loop around the check cycle.
//!
//! Each tick loads the watermark, runs a check, advances the watermark and
//! only then announces the result. Content counts as seen once composed, so
//! a failed save skips the announcement instead of repeating it every tick.
//! Ticks are awaited one after another so two checks never share a window.
//!
//! Windows end at the last fully elapsed second (see [`settled`]); content
//! posted later in the same second as a check is reported by the next one.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::pipeline::check::{CheckReport, run_check};
use crate::pipeline::compose::CourseLayout;
use crate::services::{ChannelSink, CourseSource};
use crate::storage::{WatermarkStore, settled};

/// Ties the course source, chat sink and watermark store together.
pub struct Watcher<'a> {
    layout: &'a CourseLayout,
    source: &'a dyn CourseSource,
    sink: &'a dyn ChannelSink,
    store: &'a dyn WatermarkStore,
}

impl<'a> Watcher<'a> {
    pub fn new(
        layout: &'a CourseLayout,
        source: &'a dyn CourseSource,
        sink: &'a dyn ChannelSink,
        store: &'a dyn WatermarkStore,
    ) -> Self {
        Self {
            layout,
            source,
            sink,
            store,
        }
    }

    /// Run one check cycle now.
    pub async fn tick(&self) -> Result<CheckReport> {
        self.tick_at(Utc::now()).await
    }

    /// Run one check cycle as of `now`.
    ///
    /// A failed fetch or a failed save returns the error before anything is
    /// sent. A failed send is logged; the watermark has already advanced, so
    /// the same content is not announced again on the next tick.
    pub async fn tick_at(&self, now: DateTime<Utc>) -> Result<CheckReport> {
        let this_check = settled(now);
        let last_check = self.store.load().await?.unwrap_or(this_check);

        let report = run_check(self.source, self.layout, last_check, this_check).await?;
        self.store.save(this_check).await?;

        let local_time = now.with_timezone(&Local);
        match report.message() {
            None => {
                log::info!(
                    "Check time: {}\tResult: No files or assignments found!",
                    local_time
                );
            }
            Some(message) => {
                log::info!(
                    "Check time: {}\tResult: New files or assignments found! ({} new files, {} new assignments)",
                    local_time,
                    report.new_files,
                    report.new_assignments
                );
                log::debug!("Announcement: {:?}", message);

                if let Err(e) = self.sink.send(&message).await {
                    log::error!("Failed to send announcement: {}", e);
                }
            }
        }

        Ok(report)
    }

    /// Tick every `interval` until Ctrl-C or a fatal error.
    pub async fn run(&self, interval: Duration) -> Result<()> {
        self.run_until(interval, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::warn!("Cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Tick every `interval` until `shutdown` completes or a fatal error.
    ///
    /// Transient failures (network, chat delivery) are logged and retried on
    /// the next tick.
    pub async fn run_until<F>(&self, interval: Duration, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        log::info!(
            "Watching course {} every {}s",
            self.layout.course_id,
            interval.as_secs()
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    log::info!("Shutting down");
                    return Ok(());
                }
                _ = ticker.tick() => {}
            }

            match self.tick().await {
                Ok(_) => {}
                Err(e) if e.is_fatal() => {
                    log::error!("Stopping: {}", e);
                    return Err(e);
                }
                Err(e) => log::error!("Check failed, watermark unchanged: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::pipeline::testing::{
        FakeSource, MemoryStore, RecordingSink, assignment, file, folder, hours_ago, layout,
        secs_ago,
    };
    use chrono::{Duration as TimeDelta, SubsecRound};

    fn course_folders() -> Vec<crate::models::Folder> {
        vec![
            folder(101, "Lecture Notes"),
            folder(102, "Labs"),
            folder(103, "Homework"),
        ]
    }

    #[tokio::test]
    async fn test_first_run_reports_nothing() {
        let source = FakeSource::new(
            vec![assignment(1, "Homework-1", hours_ago(2), hours_ago(2))],
            course_folders(),
            vec![file(1, 103, "HW1.pdf", hours_ago(2), hours_ago(2))],
        );
        let sink = RecordingSink::default();
        let store = MemoryStore::default();
        let layout = layout();
        let watcher = Watcher::new(&layout, &source, &sink, &store);

        let report = watcher.tick().await.unwrap();
        assert_eq!(report.last_check, report.this_check);
        assert!(report.announcement.is_none());
        assert!(sink.messages().is_empty());
        assert_eq!(store.get(), Some(report.this_check));
    }

    #[tokio::test]
    async fn test_announces_and_advances() {
        let source = FakeSource::new(
            Vec::new(),
            course_folders(),
            vec![file(7, 101, "Week 3.pdf", secs_ago(5), secs_ago(5))],
        );
        let sink = RecordingSink::default();
        let store = MemoryStore::at(hours_ago(1));
        let layout = layout();
        let watcher = Watcher::new(&layout, &source, &sink, &store);

        let report = watcher.tick().await.unwrap();
        assert_eq!(sink.messages().len(), 1);
        assert!(sink.messages()[0].contains("[Week 3.pdf]"));
        assert_eq!(store.get(), Some(report.this_check));

        // Same content, next window: nothing new.
        let report = watcher.tick().await.unwrap();
        assert!(report.announcement.is_none());
        assert_eq!(sink.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_watermark() {
        let start = hours_ago(1);
        let source = FakeSource::new(
            Vec::new(),
            course_folders(),
            vec![file(7, 101, "Week 3.pdf", secs_ago(5), secs_ago(5))],
        )
        .with_failures(1);
        let sink = RecordingSink::default();
        let store = MemoryStore::at(start);
        let layout = layout();
        let watcher = Watcher::new(&layout, &source, &sink, &store);

        assert!(watcher.tick().await.is_err());
        assert_eq!(store.get(), Some(start));
        assert!(sink.messages().is_empty());

        // The file is still announced once the source recovers.
        let report = watcher.tick().await.unwrap();
        assert_eq!(report.last_check, start);
        assert_eq!(sink.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_send_failure_still_advances() {
        let source = FakeSource::new(
            Vec::new(),
            course_folders(),
            vec![file(7, 101, "Week 3.pdf", secs_ago(5), secs_ago(5))],
        );
        let sink = RecordingSink::failing();
        let store = MemoryStore::at(hours_ago(1));
        let layout = layout();
        let watcher = Watcher::new(&layout, &source, &sink, &store);

        let report = watcher.tick().await.unwrap();
        assert!(report.announcement.is_some());
        assert_eq!(store.get(), Some(report.this_check));
    }

    #[tokio::test]
    async fn test_failed_save_never_repeats_announcement() {
        let start = hours_ago(1);
        let source = FakeSource::new(
            Vec::new(),
            course_folders(),
            vec![file(7, 101, "Week 3.pdf", secs_ago(5), secs_ago(5))],
        );
        let sink = RecordingSink::default();
        let store = MemoryStore::read_only(start);
        let layout = layout();
        let watcher = Watcher::new(&layout, &source, &sink, &store);

        for _ in 0..3 {
            let err = watcher.tick().await.unwrap_err();
            assert!(matches!(err, AppError::Io(_)));
            assert!(!err.is_fatal());
        }

        assert!(sink.messages().len() <= 1);
        assert!(sink.messages().is_empty());
        assert_eq!(store.get(), Some(start));
        assert_eq!(source.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_corrupt_watermark_is_fatal() {
        let source = FakeSource::new(Vec::new(), course_folders(), Vec::new());
        let sink = RecordingSink::default();
        let store = MemoryStore::corrupt();
        let layout = layout();
        let watcher = Watcher::new(&layout, &source, &sink, &store);

        let result = watcher
            .run_until(Duration::from_millis(1), std::future::pending::<()>())
            .await;
        assert!(matches!(result, Err(AppError::Timestamp { .. })));
        assert_eq!(source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_loop_survives_transient_failures() {
        let source = FakeSource::new(Vec::new(), course_folders(), Vec::new())
            .with_failures(2)
            .stop_after(4);
        let sink = RecordingSink::default();
        let store = MemoryStore::at(hours_ago(1));
        let layout = layout();
        let watcher = Watcher::new(&layout, &source, &sink, &store);

        watcher
            .run_until(Duration::from_millis(1), source.stop.notified())
            .await
            .unwrap();

        assert_eq!(source.fetch_count(), 4);
        assert!(store.get().unwrap() > hours_ago(1));
    }

    #[tokio::test]
    async fn test_new_content_between_ticks() {
        let base = hours_ago(1).trunc_subsecs(0);
        let source = FakeSource::new(Vec::new(), course_folders(), Vec::new());
        let sink = RecordingSink::default();
        let store = MemoryStore::default();
        let layout = layout();
        let watcher = Watcher::new(&layout, &source, &sink, &store);

        watcher.tick_at(base - TimeDelta::seconds(30)).await.unwrap();
        assert!(sink.messages().is_empty());

        source.push_assignment(assignment(44, "Homework-4", base, base));
        source.push_file(file(2, 103, "HW4_handout.pdf", base, base));

        watcher.tick_at(base + TimeDelta::seconds(5)).await.unwrap();
        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].matches("HW4_handout.pdf").count(), 1);
        assert!(messages[0].contains("(Submission link: [Homework-4]"));
    }

    #[tokio::test]
    async fn test_upload_later_in_same_second_is_announced_next_tick() {
        // Canvas stamps this upload with the whole second it happened in,
        // here the same second as the first check.
        let base = hours_ago(1).trunc_subsecs(0);
        let source = FakeSource::new(Vec::new(), course_folders(), Vec::new());
        let sink = RecordingSink::default();
        let store = MemoryStore::at(base - TimeDelta::seconds(60));
        let layout = layout();
        let watcher = Watcher::new(&layout, &source, &sink, &store);

        source.push_file(file(9, 101, "Week 9.pdf", base, base));
        let first = watcher
            .tick_at(base + TimeDelta::milliseconds(300))
            .await
            .unwrap();
        assert!(first.this_check < base);
        assert!(first.announcement.is_none());

        source.push_file(file(10, 101, "Week 10.pdf", base, base));
        let second = watcher.tick_at(base + TimeDelta::seconds(30)).await.unwrap();
        assert_eq!(second.last_check, first.this_check);
        assert_eq!(second.new_files, 2);

        let third = watcher.tick_at(base + TimeDelta::seconds(60)).await.unwrap();
        assert!(third.announcement.is_none());

        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("[Week 9.pdf]"));
        assert!(messages[0].contains("[Week 10.pdf]"));
    }
}
