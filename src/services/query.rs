//! Filtered and sorted views over a report list.
//!
//! Nothing here mutates its input; callers pass the reconciled list.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};
use crate::models::{Report, ReportStatus, ReporterRole, parse_status};

/// Ordering of a filtered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Creation time, newest first.
    #[default]
    Newest,
    /// Reporter role priority, then newest first.
    Priority,
}

/// Parsed filters for the "all reports" view. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilters {
    pub status: Option<ReportStatus>,
    pub role: Option<ReporterRole>,
    pub sort: SortOrder,
}

/// Raw query string for the list endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListReportsQuery {
    /// Status to keep, or `all` (default).
    pub status: Option<String>,
    /// Reporter role to keep, or `all` (default).
    pub role: Option<String>,
    /// `newest` (default) or `priority`.
    pub sort: Option<String>,
}

fn is_all(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("all")
}

impl ReportFilters {
    pub fn status(status: ReportStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

impl TryFrom<ListReportsQuery> for ReportFilters {
    type Error = AppError;

    fn try_from(query: ListReportsQuery) -> AppResult<Self> {
        let status = match query.status.as_deref() {
            Some(s) if !is_all(s) => Some(parse_status(s)?),
            _ => None,
        };
        let role = match query.role.as_deref() {
            Some(r) if !is_all(r) => Some(
                ReporterRole::parse(r)
                    .ok_or_else(|| AppError::Validation(format!("unknown role '{}'", r)))?,
            ),
            _ => None,
        };
        let sort = match query.sort.as_deref().map(str::trim) {
            None | Some("") | Some("newest") => SortOrder::Newest,
            Some("priority") => SortOrder::Priority,
            Some(other) => {
                return Err(AppError::Validation(format!(
                    "unknown sort '{}' (expected newest or priority)",
                    other
                )));
            }
        };
        Ok(Self { status, role, sort })
    }
}

/// Stable newest-first sort; reports without a timestamp go last.
pub fn sort_newest_first(reports: &mut [Report]) {
    reports.sort_by_key(|r| Reverse(r.sort_key()));
}

/// Stable sort by role priority, then newest first.
pub fn sort_by_priority(reports: &mut [Report]) {
    reports.sort_by_key(|r| (Reverse(r.reporter_role.priority()), Reverse(r.sort_key())));
}

/// Reports submitted from the device identified by `actor_id`, newest first.
pub fn my_reports(reports: &[Report], actor_id: &str) -> Vec<Report> {
    let mut mine: Vec<Report> = reports
        .iter()
        .filter(|r| r.persistent_mock_id == actor_id)
        .cloned()
        .collect();
    sort_newest_first(&mut mine);
    mine
}

/// Status filter, then role filter, then the requested ordering.
pub fn all_reports(reports: &[Report], filters: &ReportFilters) -> Vec<Report> {
    let mut list: Vec<Report> = reports
        .iter()
        .filter(|r| filters.status.is_none_or(|s| r.status == s))
        .filter(|r| filters.role.is_none_or(|role| r.reporter_role == role))
        .cloned()
        .collect();

    match filters.sort {
        SortOrder::Newest => sort_newest_first(&mut list),
        SortOrder::Priority => sort_by_priority(&mut list),
    }
    list
}

/// Distinct reporter roles present in `reports`, sorted by name.
pub fn unique_roles(reports: &[Report]) -> Vec<ReporterRole> {
    let mut roles: Vec<ReporterRole> = Vec::new();
    for report in reports {
        if !roles.contains(&report.reporter_role) {
            roles.push(report.reporter_role);
        }
    }
    roles.sort_by_key(|r| r.as_str());
    roles
}

/// Per-status counters for dashboards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusCounts {
    pub total: usize,
    pub pending: usize,
    /// Count keyed by status name.
    pub by_status: BTreeMap<String, usize>,
}

pub fn status_counts(reports: &[Report]) -> StatusCounts {
    let mut by_status: BTreeMap<String, usize> = ReportStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    for report in reports {
        *by_status
            .entry(report.status.as_str().to_string())
            .or_default() += 1;
    }
    StatusCounts {
        total: reports.len(),
        pending: reports.iter().filter(|r| r.status.is_pending()).count(),
        by_status,
    }
}
