//! Stand-in collection used when the external store could not be reached at
//! startup. Reads return nothing live, writes fail with `StoreUnavailable`.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use super::{ReportCollection, Snapshot, WarningCollection};
use crate::error::{AppError, AppResult};
use crate::models::{OfficialWarning, Report, ReportStatus};

pub struct OfflineCollection {
    reason: String,
    // Kept so subscribers see an open feed that never changes.
    feed: watch::Sender<Snapshot>,
}

impl OfflineCollection {
    pub fn new(reason: impl Into<String>) -> Self {
        let (feed, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            reason: reason.into(),
            feed,
        }
    }

    fn unavailable(&self) -> AppError {
        AppError::StoreUnavailable(self.reason.clone())
    }
}

#[async_trait]
impl ReportCollection for OfflineCollection {
    fn backend(&self) -> &'static str {
        "offline"
    }

    async fn insert(&self, _report: &Report) -> AppResult<String> {
        Err(self.unavailable())
    }

    async fn update_status(&self, _id: &str, _to: ReportStatus) -> AppResult<(ReportStatus, Report)> {
        Err(self.unavailable())
    }

    async fn get(&self, _id: &str) -> AppResult<Option<Report>> {
        Err(self.unavailable())
    }

    async fn all(&self) -> AppResult<Vec<Report>> {
        Ok(Vec::new())
    }

    fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.feed.subscribe()
    }

    async fn ping(&self) -> AppResult<()> {
        Err(self.unavailable())
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[async_trait]
impl WarningCollection for OfflineCollection {
    async fn insert(&self, _warning: &OfficialWarning) -> AppResult<()> {
        Err(self.unavailable())
    }

    async fn list(&self) -> AppResult<Vec<OfficialWarning>> {
        Ok(Vec::new())
    }
}
