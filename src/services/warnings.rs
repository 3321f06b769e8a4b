//! Official warnings posted by administrators.

use std::sync::Arc;

use tracing::info;

use crate::error::AppResult;
use crate::models::{OfficialWarning, PostWarningRequest, Session, WsEvent};
use crate::services::event_broadcaster::EventBroadcaster;
use crate::services::verification::authorize;
use crate::store::WarningCollection;

#[derive(Clone)]
pub struct WarningBoard {
    warnings: Arc<dyn WarningCollection>,
    events: EventBroadcaster,
}

impl WarningBoard {
    pub fn new(warnings: Arc<dyn WarningCollection>, events: EventBroadcaster) -> Self {
        Self { warnings, events }
    }

    /// Publish a warning. Administrator only.
    pub async fn post(&self, session: &Session, request: PostWarningRequest) -> AppResult<OfficialWarning> {
        authorize(session)?;
        let warning = request.into_warning(session.identity.as_str())?;
        self.warnings.insert(&warning).await?;

        info!(
            warning_id = %warning.id,
            verified = warning.verified,
            admin = %session.identity.short(),
            "Official warning posted"
        );
        self.events.publish(WsEvent::warning_posted(warning.clone()));
        Ok(warning)
    }

    /// All warnings, newest first.
    pub async fn list(&self) -> AppResult<Vec<OfficialWarning>> {
        self.warnings.list().await
    }
}
