//! Domain error types for the coastal hazard service.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use crate::models::{ReportStatus, ReporterRole};

/// Reason a status transition was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Only administrators may verify or dismiss reports.
    #[error("role '{0}' is not allowed to perform this action; Administrator role required")]
    NotAdministrator(ReporterRole),

    /// The requested target state has no edge from the current state.
    #[error("no transition from '{from}' to '{to}'")]
    NoEdge {
        from: ReportStatus,
        to: ReportStatus,
    },
}

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required field is missing or invalid
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Status value outside the known set
    #[error("Invalid status: '{0}' (expected one of received, review, verified, false)")]
    InvalidStatus(String),

    /// Status transition refused
    #[error("Invalid transition: {0}")]
    InvalidTransition(#[from] TransitionError),

    /// Report already reached a terminal status
    #[error("Report {id} is already finalized as '{status}'")]
    AlreadyFinalized { id: String, status: ReportStatus },

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// External store not initialized or unreachable
    #[error("Report store unavailable: {0}")]
    StoreUnavailable(String),

    /// Seed records cannot be modified under seed precedence
    #[error("Report {0} is seed data and cannot be modified")]
    SeedReadOnly(String),

    /// Identifier already taken
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Authentication failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Upstream service (geocoder) failed
    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl AppError {
    /// Stable machine-readable code for the error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidStatus(_) => "INVALID_STATUS",
            AppError::InvalidTransition(_) => "INVALID_TRANSITION",
            AppError::AlreadyFinalized { .. } => "ALREADY_FINALIZED",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AppError::SeedReadOnly(_) => "SEED_READ_ONLY",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
        }
    }

    /// Whether a retry might succeed (connection-level failures only).
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::StoreUnavailable(_))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidTransition(TransitionError::NotAdministrator(_)) => {
                StatusCode::FORBIDDEN
            }
            AppError::InvalidTransition(TransitionError::NoEdge { .. })
            | AppError::AlreadyFinalized { .. }
            | AppError::SeedReadOnly(_)
            | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Database(err_str) => {
                tracing::error!("Database error: {}", err_str);
                "An internal database error occurred".to_string()
            }
            AppError::Upstream(err_str) => {
                tracing::warn!("Upstream error: {}", err_str);
                "Location search is temporarily unavailable".to_string()
            }
            _ => self.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.code().to_string(),
            message,
        })
    }
}

/// Error response body matching OpenAPI schema.
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON parsing error: {}", err))
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_) => {
                AppError::StoreUnavailable(err.to_string())
            }
            other => AppError::Database(other.to_string()),
        }
    }
}
