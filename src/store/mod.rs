//! Report and warning storage.
//!
//! A [`ReportCollection`] is the remote real-time collection: it owns live
//! records, applies status changes atomically and publishes a full snapshot
//! on every change. [`ReportStore`] layers the seed set, merge precedence and
//! event broadcasting on top.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::AppResult;
use crate::models::{OfficialWarning, Report, ReportStatus};

pub mod kv;
pub mod memory;
pub mod offline;
pub mod postgres;
pub mod report_store;

pub use memory::{MemoryCollection, MemoryWarnings};
pub use offline::OfflineCollection;
pub use postgres::{PgCollection, PgWarnings};
pub use report_store::ReportStore;

/// Full record set as published on the feed.
pub type Snapshot = Arc<Vec<Report>>;

#[async_trait]
pub trait ReportCollection: Send + Sync {
    /// Short backend name for logs.
    fn backend(&self) -> &'static str;

    /// Insert a new record. Fails with `Conflict` when the id is taken.
    async fn insert(&self, report: &Report) -> AppResult<String>;

    /// Move record `id` to `to`, returning the previous status and the
    /// updated record. The edge check runs under the same lock as the write.
    async fn update_status(&self, id: &str, to: ReportStatus) -> AppResult<(ReportStatus, Report)>;

    async fn get(&self, id: &str) -> AppResult<Option<Report>>;

    /// Every live record; order is unspecified.
    async fn all(&self) -> AppResult<Vec<Report>>;

    /// Receiver of full snapshots. Dropping it unsubscribes.
    fn subscribe(&self) -> watch::Receiver<Snapshot>;

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[async_trait]
pub trait WarningCollection: Send + Sync {
    async fn insert(&self, warning: &OfficialWarning) -> AppResult<()>;

    /// All warnings, newest first.
    async fn list(&self) -> AppResult<Vec<OfficialWarning>>;
}
