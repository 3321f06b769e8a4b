//! Report domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Column limits of the `hazard_reports` table, in characters.
pub const MAX_REPORT_ID_LEN: usize = 64;
pub const MAX_MOCK_ID_LEN: usize = 128;
pub const MAX_EXTRA_HAZARD_TYPE_LEN: usize = 128;
pub const MAX_LOCATION_NAME_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 4000;
pub const MAX_MEDIA_NAME_LEN: usize = 255;

fn check_length(field: &str, value: Option<&str>, max: usize) -> AppResult<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        ))),
        _ => Ok(()),
    }
}

/// Lifecycle status of a hazard report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Received,
    Review,
    Verified,
    False,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 4] = [
        ReportStatus::Received,
        ReportStatus::Review,
        ReportStatus::Verified,
        ReportStatus::False,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Review => "review",
            Self::Verified => "verified",
            Self::False => "false",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "received" => Some(Self::Received),
            "review" => Some(Self::Review),
            "verified" => Some(Self::Verified),
            "false" => Some(Self::False),
            _ => None,
        }
    }

    /// Human-readable label shown on status badges.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Received => "Received",
            Self::Review => "Under Review",
            Self::Verified => "Verified by INCOIS",
            Self::False => "False Alarm",
        }
    }

    /// Verified and false reports are closed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Verified | Self::False)
    }

    /// Still waiting for an administrator decision.
    pub fn is_pending(&self) -> bool {
        !self.is_terminal()
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse a status value supplied by a caller.
pub fn parse_status(s: &str) -> AppResult<ReportStatus> {
    ReportStatus::parse(s.trim()).ok_or_else(|| AppError::InvalidStatus(s.to_string()))
}

/// Hazard category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HazardType {
    Flooding,
    Erosion,
    Pollution,
    Others,
}

/// Sub-categories offered when the hazard type is `others`.
pub const EXTRA_HAZARD_TYPES: [&str; 8] = [
    "Storm Surge",
    "Tsunami Warning",
    "Oil Spill",
    "Marine Debris",
    "Beach Closure",
    "Navigation Hazard",
    "Weather Alert",
    "Not in list",
];

impl HazardType {
    pub const ALL: [HazardType; 4] = [
        HazardType::Flooding,
        HazardType::Erosion,
        HazardType::Pollution,
        HazardType::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flooding => "flooding",
            Self::Erosion => "erosion",
            Self::Pollution => "pollution",
            Self::Others => "others",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "flooding" => Some(Self::Flooding),
            "erosion" => Some(Self::Erosion),
            "pollution" => Some(Self::Pollution),
            "others" => Some(Self::Others),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Flooding => "Flooding/High Water",
            Self::Erosion => "Coastal Erosion",
            Self::Pollution => "Pollution/Spill",
            Self::Others => "Others",
        }
    }
}

impl std::fmt::Display for HazardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Role of the person submitting or handling a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ReporterRole {
    #[serde(rename = "Coastal Guard")]
    CoastalGuard,
    #[serde(rename = "Disaster Manager")]
    DisasterManager,
    #[serde(rename = "General Volunteer")]
    GeneralVolunteer,
    #[serde(rename = "Coastal Resident")]
    CoastalResident,
    #[serde(rename = "Administrator")]
    Administrator,
}

impl ReporterRole {
    pub const ALL: [ReporterRole; 5] = [
        ReporterRole::CoastalGuard,
        ReporterRole::DisasterManager,
        ReporterRole::GeneralVolunteer,
        ReporterRole::CoastalResident,
        ReporterRole::Administrator,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoastalGuard => "Coastal Guard",
            Self::DisasterManager => "Disaster Manager",
            Self::GeneralVolunteer => "General Volunteer",
            Self::CoastalResident => "Coastal Resident",
            Self::Administrator => "Administrator",
        }
    }

    /// Case-insensitive parse of the display name.
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(wanted))
    }

    /// Weight given to reports from this role when ordering the verification queue.
    pub fn priority(&self) -> u8 {
        match self {
            Self::Administrator => 10,
            Self::CoastalGuard => 9,
            Self::DisasterManager => 8,
            Self::GeneralVolunteer => 5,
            Self::CoastalResident => 3,
        }
    }

    pub fn is_administrator(&self) -> bool {
        matches!(self, Self::Administrator)
    }
}

impl std::fmt::Display for ReporterRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Geographic position of an observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    /// Display name (search result or reverse lookup).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            name: None,
        }
    }

    /// Check that the coordinate pair is on the globe.
    pub fn validate(&self) -> AppResult<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(AppError::Validation(format!(
                "latitude {} must be between -90 and 90",
                self.lat
            )));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(AppError::Validation(format!(
                "longitude {} must be between -180 and 180",
                self.lng
            )));
        }
        Ok(())
    }

    /// Name if present, otherwise the rounded coordinates.
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("{:.4}, {:.4}", self.lat, self.lng),
        }
    }
}

/// Attachment metadata. Binary content lives outside the report store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MediaFile {
    pub name: String,
    pub size_bytes: u64,
}

impl MediaFile {
    pub fn size_megabytes(&self) -> f64 {
        self.size_bytes as f64 / 1024.0 / 1024.0
    }
}

/// A single hazard observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Report {
    pub id: String,
    pub persistent_mock_id: String,
    pub reporter_role: ReporterRole,
    pub status: ReportStatus,
    pub hazard_type: HazardType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_hazard_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: Location,
    #[serde(default)]
    pub media_files: Vec<MediaFile>,
    /// Creation time. Seed records may omit it.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Report {
    /// Milliseconds since the epoch, missing timestamps count as zero.
    pub fn sort_key(&self) -> i64 {
        self.created_at.map(|t| t.timestamp_millis()).unwrap_or(0)
    }

    /// Check every text field against the storage limits.
    pub fn check_lengths(&self) -> AppResult<()> {
        check_length("id", Some(&self.id), MAX_REPORT_ID_LEN)?;
        check_length(
            "persistent_mock_id",
            Some(&self.persistent_mock_id),
            MAX_MOCK_ID_LEN,
        )?;
        check_length(
            "extra_hazard_type",
            self.extra_hazard_type.as_deref(),
            MAX_EXTRA_HAZARD_TYPE_LEN,
        )?;
        check_length(
            "description",
            self.description.as_deref(),
            MAX_DESCRIPTION_LEN,
        )?;
        check_length(
            "location.name",
            self.location.name.as_deref(),
            MAX_LOCATION_NAME_LEN,
        )?;
        for file in &self.media_files {
            check_length("media file name", Some(&file.name), MAX_MEDIA_NAME_LEN)?;
        }
        Ok(())
    }

    /// Hazard label, using the sub-category for `others`.
    pub fn hazard_label(&self) -> String {
        match (self.hazard_type, self.extra_hazard_type.as_deref()) {
            (HazardType::Others, Some(extra)) => extra.to_string(),
            (hazard, _) => hazard.label().to_string(),
        }
    }
}

/// Request body for submitting a report.
///
/// Fields are optional on the wire so that missing values surface as
/// validation errors with a readable message instead of a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SubmitReportRequest {
    pub hazard_type: Option<HazardType>,
    pub extra_hazard_type: Option<String>,
    pub description: Option<String>,
    pub location: Option<Location>,
    #[serde(default)]
    pub media_files: Vec<MediaFile>,
}

/// Validated submission, ready to be stamped with id and session data.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub hazard_type: HazardType,
    pub extra_hazard_type: Option<String>,
    pub description: Option<String>,
    pub location: Location,
    pub media_files: Vec<MediaFile>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl SubmitReportRequest {
    /// Validate required fields and normalize optional ones.
    pub fn validate(self) -> AppResult<ReportDraft> {
        let location = self
            .location
            .ok_or_else(|| AppError::Validation("location is required".to_string()))?;
        location.validate()?;

        let hazard_type = self
            .hazard_type
            .ok_or_else(|| AppError::Validation("hazard_type is required".to_string()))?;

        if let Some(file) = self.media_files.iter().find(|f| f.name.trim().is_empty()) {
            return Err(AppError::Validation(format!(
                "media file names must not be blank (size {} bytes)",
                file.size_bytes
            )));
        }

        // The sub-category only means something for `others`.
        let extra_hazard_type = match hazard_type {
            HazardType::Others => non_blank(self.extra_hazard_type),
            _ => None,
        };

        let description = non_blank(self.description);
        let location = Location {
            name: non_blank(location.name),
            ..location
        };

        check_length(
            "extra_hazard_type",
            extra_hazard_type.as_deref(),
            MAX_EXTRA_HAZARD_TYPE_LEN,
        )?;
        check_length("description", description.as_deref(), MAX_DESCRIPTION_LEN)?;
        check_length(
            "location.name",
            location.name.as_deref(),
            MAX_LOCATION_NAME_LEN,
        )?;
        for file in &self.media_files {
            check_length("media file name", Some(&file.name), MAX_MEDIA_NAME_LEN)?;
        }

        Ok(ReportDraft {
            hazard_type,
            extra_hazard_type,
            description,
            location,
            media_files: self.media_files,
        })
    }
}

/// Request body for a status change.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// Target status (`verified` or `false`).
    pub status: String,
}

/// Report list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportListResponse {
    pub reports: Vec<Report>,
    pub total: usize,
}
