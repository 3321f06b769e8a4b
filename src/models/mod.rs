//! Domain models for the coastal hazard service.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod report;
pub mod session;
pub mod warning;
pub mod ws_event;

// Re-export commonly used types
pub use report::{
    EXTRA_HAZARD_TYPES, HazardType, Location, MAX_DESCRIPTION_LEN, MAX_EXTRA_HAZARD_TYPE_LEN,
    MAX_LOCATION_NAME_LEN, MAX_MEDIA_NAME_LEN, MAX_MOCK_ID_LEN, MAX_REPORT_ID_LEN, MediaFile,
    Report, ReportDraft, ReportListResponse, ReportStatus, ReporterRole, SubmitReportRequest,
    UpdateStatusRequest, parse_status,
};
pub use session::{Identity, Session};
pub use warning::{OfficialWarning, PostWarningRequest, WarningListResponse};
pub use ws_event::{WsEvent, WsEventMessage};

/// A location candidate returned by the geocoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeocodeResult {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl From<GeocodeResult> for Location {
    fn from(result: GeocodeResult) -> Self {
        Location {
            lat: result.lat,
            lng: result.lng,
            name: Some(result.name),
        }
    }
}
