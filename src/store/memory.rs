//! In-process collections used for development and tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};

use super::{ReportCollection, Snapshot, WarningCollection};
use crate::error::{AppError, AppResult};
use crate::models::{OfficialWarning, Report, ReportStatus};
use crate::services::verification::check_edge;

pub struct MemoryCollection {
    records: Mutex<Vec<Report>>,
    feed: watch::Sender<Snapshot>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        let (feed, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            records: Mutex::new(Vec::new()),
            feed,
        }
    }

    fn publish(&self, records: &[Report]) {
        self.feed.send_replace(Arc::new(records.to_vec()));
    }
}

impl Default for MemoryCollection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReportCollection for MemoryCollection {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, report: &Report) -> AppResult<String> {
        let mut records = self.records.lock().await;
        if records.iter().any(|r| r.id == report.id) {
            return Err(AppError::Conflict(format!(
                "report id {} already exists",
                report.id
            )));
        }
        records.push(report.clone());
        self.publish(&records);
        Ok(report.id.clone())
    }

    async fn update_status(&self, id: &str, to: ReportStatus) -> AppResult<(ReportStatus, Report)> {
        let mut records = self.records.lock().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Report {}", id)))?;

        let from = record.status;
        check_edge(id, from, to)?;
        record.status = to;
        let updated = record.clone();

        self.publish(&records);
        Ok((from, updated))
    }

    async fn get(&self, id: &str) -> AppResult<Option<Report>> {
        let records = self.records.lock().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn all(&self) -> AppResult<Vec<Report>> {
        Ok(self.records.lock().await.clone())
    }

    fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.feed.subscribe()
    }
}

#[derive(Default)]
pub struct MemoryWarnings {
    warnings: Mutex<Vec<OfficialWarning>>,
}

impl MemoryWarnings {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WarningCollection for MemoryWarnings {
    async fn insert(&self, warning: &OfficialWarning) -> AppResult<()> {
        self.warnings.lock().await.push(warning.clone());
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<OfficialWarning>> {
        let mut warnings = self.warnings.lock().await.clone();
        warnings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransitionError;
    use crate::models::{HazardType, Location, ReporterRole};

    fn report(id: &str) -> Report {
        Report {
            id: id.to_string(),
            persistent_mock_id: "user_1".to_string(),
            reporter_role: ReporterRole::CoastalGuard,
            status: ReportStatus::Received,
            hazard_type: HazardType::Flooding,
            extra_hazard_type: None,
            description: None,
            location: Location::new(17.71, 83.27),
            media_files: vec![],
            created_at: Some(chrono::Utc::now()),
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_ids() {
        let collection = MemoryCollection::new();
        collection.insert(&report("a")).await.unwrap();
        assert!(matches!(
            collection.insert(&report("a")).await,
            Err(AppError::Conflict(_))
        ));
        assert_eq!(collection.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_checks_edge_and_publishes() {
        let collection = MemoryCollection::new();
        let mut feed = collection.subscribe();
        collection.insert(&report("a")).await.unwrap();
        assert!(feed.has_changed().unwrap());
        feed.borrow_and_update();

        let (from, updated) = collection
            .update_status("a", ReportStatus::Verified)
            .await
            .unwrap();
        assert_eq!(from, ReportStatus::Received);
        assert_eq!(updated.status, ReportStatus::Verified);
        assert_eq!(feed.borrow_and_update()[0].status, ReportStatus::Verified);

        assert!(matches!(
            collection.update_status("a", ReportStatus::False).await,
            Err(AppError::AlreadyFinalized { .. })
        ));
        assert!(matches!(
            collection.update_status("missing", ReportStatus::False).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_no_edge_leaves_record_unchanged() {
        let collection = MemoryCollection::new();
        collection.insert(&report("a")).await.unwrap();
        assert!(matches!(
            collection.update_status("a", ReportStatus::Review).await,
            Err(AppError::InvalidTransition(TransitionError::NoEdge { .. }))
        ));
        let stored = collection.get("a").await.unwrap().unwrap();
        assert_eq!(stored.status, ReportStatus::Received);
    }

    #[tokio::test]
    async fn test_warnings_listed_newest_first() {
        let warnings = MemoryWarnings::new();
        for title in ["first", "second"] {
            let warning = crate::models::PostWarningRequest {
                title: title.to_string(),
                message: "m".to_string(),
                verified: None,
            }
            .into_warning("user_admin")
            .unwrap();
            warnings.insert(&warning).await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        let listed = warnings.list().await.unwrap();
        assert_eq!(listed[0].title, "second");
    }
}
