//! PostgreSQL-backed collections.
//!
//! Every call goes through the retry policy. The snapshot feed is refreshed
//! after each mutation and by a periodic task, and only sent when the record
//! set actually changed.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{ReportCollection, Snapshot, WarningCollection};
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{OfficialWarning, Report, ReportStatus};
use crate::services::retry::RetryPolicy;

pub struct PgCollection {
    db: DbPool,
    retry: RetryPolicy,
    feed: watch::Sender<Snapshot>,
}

impl PgCollection {
    /// Build the collection and load the first snapshot.
    pub async fn new(db: DbPool, retry: RetryPolicy) -> AppResult<Self> {
        let (feed, _) = watch::channel(Arc::new(Vec::new()));
        let collection = Self { db, retry, feed };
        collection.refresh().await?;
        Ok(collection)
    }

    /// Reload all records and publish them if anything changed.
    pub async fn refresh(&self) -> AppResult<bool> {
        let records = self.all().await?;
        let changed = self.feed.send_if_modified(|current| {
            if current.as_slice() == records.as_slice() {
                false
            } else {
                *current = Arc::new(records);
                true
            }
        });
        if changed {
            debug!("Report feed refreshed");
        }
        Ok(changed)
    }

    /// Periodically refresh the feed so changes made by other writers reach
    /// subscribers.
    pub fn start_refresh_task(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let collection = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = collection.refresh().await {
                    warn!(error = %e, "Report feed refresh failed");
                }
            }
        })
    }

    async fn refresh_after_write(&self) {
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Failed to publish snapshot after write");
        }
    }
}

#[async_trait]
impl ReportCollection for PgCollection {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, report: &Report) -> AppResult<String> {
        self.retry
            .run("insert_hazard_report", move || self.db.insert_hazard_report(report))
            .await?;
        self.refresh_after_write().await;
        Ok(report.id.clone())
    }

    async fn update_status(&self, id: &str, to: ReportStatus) -> AppResult<(ReportStatus, Report)> {
        let result = self
            .retry
            .run("update_hazard_report_status", move || {
                self.db.update_hazard_report_status(id, to)
            })
            .await?;
        self.refresh_after_write().await;
        Ok(result)
    }

    async fn get(&self, id: &str) -> AppResult<Option<Report>> {
        self.retry
            .run("get_hazard_report", move || self.db.get_hazard_report(id))
            .await
    }

    async fn all(&self) -> AppResult<Vec<Report>> {
        self.retry
            .run("list_hazard_reports", move || self.db.list_hazard_reports())
            .await
    }

    fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.feed.subscribe()
    }

    async fn ping(&self) -> AppResult<()> {
        self.db.ping().await
    }
}

pub struct PgWarnings {
    db: DbPool,
    retry: RetryPolicy,
}

impl PgWarnings {
    pub fn new(db: DbPool, retry: RetryPolicy) -> Self {
        Self { db, retry }
    }
}

#[async_trait]
impl WarningCollection for PgWarnings {
    async fn insert(&self, warning: &OfficialWarning) -> AppResult<()> {
        self.retry
            .run("insert_warning", move || self.db.insert_warning(warning))
            .await
    }

    async fn list(&self) -> AppResult<Vec<OfficialWarning>> {
        self.retry
            .run("list_warnings", move || self.db.list_warnings())
            .await
    }
}
