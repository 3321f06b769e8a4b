//! Report verification state machine.
//!
//! ```text
//!   received ──┬──> verified
//!              └──> false
//!   review ────┬──> verified
//!              └──> false
//! ```
//!
//! `verified` and `false` are terminal. Nothing moves a report into `review`;
//! that state only arrives through seed data or direct storage.

use tracing::{info, warn};

use crate::error::{AppError, AppResult, TransitionError};
use crate::models::{Report, ReportStatus, Session};
use crate::store::ReportStore;

/// Whether the edge `from -> to` exists.
pub fn has_edge(from: ReportStatus, to: ReportStatus) -> bool {
    matches!(
        (from, to),
        (
            ReportStatus::Received | ReportStatus::Review,
            ReportStatus::Verified | ReportStatus::False
        )
    )
}

/// Check a transition for report `id` currently in `from`.
///
/// Backends call this while holding the record, so the check and the write
/// are one atomic step.
pub fn check_edge(id: &str, from: ReportStatus, to: ReportStatus) -> AppResult<()> {
    if from.is_terminal() {
        return Err(AppError::AlreadyFinalized {
            id: id.to_string(),
            status: from,
        });
    }
    if !has_edge(from, to) {
        return Err(TransitionError::NoEdge { from, to }.into());
    }
    Ok(())
}

/// Only administrators may drive the workflow.
pub fn authorize(session: &Session) -> AppResult<()> {
    if session.is_administrator() {
        Ok(())
    } else {
        Err(TransitionError::NotAdministrator(session.role).into())
    }
}

/// Administrator entry point to the state machine.
#[derive(Clone)]
pub struct VerificationWorkflow {
    store: ReportStore,
}

impl VerificationWorkflow {
    pub fn new(store: ReportStore) -> Self {
        Self { store }
    }

    /// Move report `id` to `to` on behalf of `session`.
    pub async fn transition(
        &self,
        session: &Session,
        id: &str,
        to: ReportStatus,
    ) -> AppResult<Report> {
        if let Err(e) = authorize(session) {
            warn!(
                report_id = %id,
                role = %session.role,
                reporter = %session.identity.short(),
                "Status change denied"
            );
            return Err(e);
        }

        let report = self.store.update_status(id, to, &session.identity).await?;
        info!(
            report_id = %id,
            status = %to,
            admin = %session.identity.short(),
            "Report status changed"
        );
        Ok(report)
    }

    /// Shorthand for `transition(.., Verified)`.
    pub async fn verify(&self, session: &Session, id: &str) -> AppResult<Report> {
        self.transition(session, id, ReportStatus::Verified).await
    }

    /// Shorthand for `transition(.., False)`.
    pub async fn dismiss(&self, session: &Session, id: &str) -> AppResult<Report> {
        self.transition(session, id, ReportStatus::False).await
    }
}
