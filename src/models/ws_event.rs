//! WebSocket event types for real-time updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{OfficialWarning, Report, ReportStatus};

/// WebSocket event sent to connected clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
#[serde(rename_all = "snake_case")]
pub enum WsEvent {
    /// Full reconciled report list (sent on connect and on every feed change).
    Snapshot(SnapshotPayload),
    /// A new report was submitted.
    ReportCreated(ReportCreatedPayload),
    /// An administrator changed a report's status.
    ReportStatusChanged(ReportStatusChangedPayload),
    /// An administrator posted an official warning.
    WarningPosted(OfficialWarning),
}

/// Payload for snapshot event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotPayload {
    pub reports: Vec<Report>,
    pub total: usize,
}

/// Payload for report_created event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportCreatedPayload {
    pub report: Report,
}

/// Payload for report_status_changed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStatusChangedPayload {
    pub report_id: String,
    pub from: ReportStatus,
    pub to: ReportStatus,
    /// Identity of the administrator who made the change.
    pub changed_by: String,
    pub updated_at: DateTime<Utc>,
}

/// Wrapper that includes timestamp with every event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsEventMessage {
    #[serde(flatten)]
    pub event: WsEvent,
    pub timestamp: DateTime<Utc>,
}

impl WsEventMessage {
    /// Create a new event message with the current timestamp.
    pub fn new(event: WsEvent) -> Self {
        Self {
            event,
            timestamp: Utc::now(),
        }
    }
}

impl WsEvent {
    pub fn snapshot(reports: Vec<Report>) -> Self {
        let total = reports.len();
        WsEvent::Snapshot(SnapshotPayload { reports, total })
    }

    pub fn report_created(report: Report) -> Self {
        WsEvent::ReportCreated(ReportCreatedPayload { report })
    }

    pub fn report_status_changed(
        report_id: impl Into<String>,
        from: ReportStatus,
        to: ReportStatus,
        changed_by: impl Into<String>,
    ) -> Self {
        WsEvent::ReportStatusChanged(ReportStatusChangedPayload {
            report_id: report_id.into(),
            from,
            to,
            changed_by: changed_by.into(),
            updated_at: Utc::now(),
        })
    }

    pub fn warning_posted(warning: OfficialWarning) -> Self {
        WsEvent::WarningPosted(warning)
    }
}
