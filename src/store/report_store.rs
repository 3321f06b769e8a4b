//! The report store: live collection plus seed set.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use super::ReportCollection;
use crate::error::{AppError, AppResult};
use crate::models::{Identity, Report, ReportStatus, Session, SubmitReportRequest, WsEvent};
use crate::services::event_broadcaster::EventBroadcaster;
use crate::services::reconcile::{LiveReportView, MergePrecedence, reconcile};
use crate::services::seed::SeedSet;
use crate::services::verification::check_edge;

#[derive(Clone)]
pub struct ReportStore {
    collection: Arc<dyn ReportCollection>,
    seed: SeedSet,
    precedence: MergePrecedence,
    events: EventBroadcaster,
}

impl ReportStore {
    pub fn new(
        collection: Arc<dyn ReportCollection>,
        seed: SeedSet,
        precedence: MergePrecedence,
        events: EventBroadcaster,
    ) -> Self {
        Self {
            collection,
            seed,
            precedence,
            events,
        }
    }

    pub fn seed(&self) -> &SeedSet {
        &self.seed
    }

    pub fn precedence(&self) -> MergePrecedence {
        self.precedence
    }

    pub fn events(&self) -> &EventBroadcaster {
        &self.events
    }

    pub fn backend(&self) -> &'static str {
        self.collection.backend()
    }

    /// Validate and insert a new report on behalf of `session`.
    pub async fn create(&self, session: &Session, request: SubmitReportRequest) -> AppResult<Report> {
        let draft = request.validate()?;

        let report = Report {
            id: Uuid::now_v7().to_string(),
            persistent_mock_id: session.identity.as_str().to_string(),
            reporter_role: session.role,
            status: ReportStatus::Received,
            hazard_type: draft.hazard_type,
            extra_hazard_type: draft.extra_hazard_type,
            description: draft.description,
            location: draft.location,
            media_files: draft.media_files,
            created_at: Some(Utc::now()),
        };

        self.collection.insert(&report).await?;

        info!(
            report_id = %report.id,
            hazard = %report.hazard_type,
            role = %report.reporter_role,
            reporter = %session.identity.short(),
            backend = self.collection.backend(),
            "Report created"
        );
        self.events.publish(WsEvent::report_created(report.clone()));

        Ok(report)
    }

    /// Apply a status change. Authorization is the caller's job; this checks
    /// existence, the seed read-only rule, finality and the edge, in that order.
    pub async fn update_status(
        &self,
        id: &str,
        to: ReportStatus,
        actor: &Identity,
    ) -> AppResult<Report> {
        let seed_record = self.seed.get(id);
        let seed_wins = seed_record.is_some() && self.precedence == MergePrecedence::Seed;
        // A seed record that wins the merge exists without a live lookup
        let live_record = if seed_wins {
            None
        } else {
            self.collection.get(id).await?
        };

        let (from, updated) = match (live_record, seed_record) {
            (None, None) => return Err(AppError::NotFound(format!("Report {}", id))),
            (_, Some(_)) if seed_wins => {
                warn!(report_id = %id, "Rejected status change on seed report");
                return Err(AppError::SeedReadOnly(id.to_string()));
            }
            (Some(_), _) => self.collection.update_status(id, to).await?,
            (None, Some(seed)) => self.copy_on_write(seed, to).await?,
        };

        self.events.publish(WsEvent::report_status_changed(
            id,
            from,
            to,
            actor.as_str(),
        ));
        Ok(updated)
    }

    /// First change to a seed record under live precedence: store a live copy
    /// carrying the new status.
    async fn copy_on_write(&self, seed: &Report, to: ReportStatus) -> AppResult<(ReportStatus, Report)> {
        check_edge(&seed.id, seed.status, to)?;
        let copy = Report {
            status: to,
            ..seed.clone()
        };
        match self.collection.insert(&copy).await {
            Ok(_) => {
                info!(report_id = %seed.id, "Seed report copied into live collection");
                Ok((seed.status, copy))
            }
            // Another writer copied it first; apply the change to that copy.
            Err(AppError::Conflict(_)) => self.collection.update_status(&seed.id, to).await,
            Err(e) => Err(e),
        }
    }

    /// Every live record, unordered.
    pub async fn all(&self) -> AppResult<Vec<Report>> {
        self.collection.all().await
    }

    /// Seed and live records merged under the configured precedence.
    pub async fn reconciled(&self) -> AppResult<Vec<Report>> {
        let live = self.collection.all().await?;
        Ok(reconcile(self.seed.reports(), &live, self.precedence))
    }

    pub async fn get(&self, id: &str) -> AppResult<Report> {
        self.reconciled()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Report {}", id)))
    }

    /// A view that follows the collection feed.
    pub fn live_view(&self) -> LiveReportView {
        LiveReportView::new(
            self.seed.clone(),
            self.precedence,
            self.collection.subscribe(),
        )
    }

    pub fn is_available(&self) -> bool {
        self.collection.is_available()
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.collection.ping().await
    }
}
