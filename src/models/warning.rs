//! Official warnings posted by administrators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A warning published to all report viewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OfficialWarning {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    /// Whether the warning has been confirmed by the issuing centre.
    pub verified: bool,
    /// Identity of the posting administrator.
    pub admin_id: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for posting a warning.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostWarningRequest {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub verified: Option<bool>,
}

impl PostWarningRequest {
    /// Build the stored warning, rejecting blank titles or messages.
    pub fn into_warning(self, admin_id: &str) -> AppResult<OfficialWarning> {
        let title = self.title.trim().to_string();
        let message = self.message.trim().to_string();
        if title.is_empty() {
            return Err(AppError::Validation("warning title is required".to_string()));
        }
        if message.is_empty() {
            return Err(AppError::Validation(
                "warning message is required".to_string(),
            ));
        }

        Ok(OfficialWarning {
            id: Uuid::now_v7(),
            title,
            message,
            verified: self.verified.unwrap_or(true),
            admin_id: admin_id.to_string(),
            created_at: Utc::now(),
        })
    }
}

/// Warning list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WarningListResponse {
    pub warnings: Vec<OfficialWarning>,
}
