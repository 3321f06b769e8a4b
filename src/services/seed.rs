//! Static seed reports shown alongside live data.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::Report;

const EMBEDDED_SEED: &str = include_str!("../../seed/reports.json");

/// Read-only set of seed reports. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct SeedSet {
    reports: Arc<Vec<Report>>,
}

impl SeedSet {
    /// Seed set compiled into the binary.
    pub fn embedded() -> AppResult<Self> {
        Self::from_json(EMBEDDED_SEED)
    }

    /// Load a seed set from a JSON array on disk.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Validation(format!(
                "failed to read seed file {}: {}",
                path.display(),
                e
            ))
        })?;
        let seed = Self::from_json(&raw)?;
        info!(path = %path.display(), count = seed.len(), "Loaded seed reports");
        Ok(seed)
    }

    pub fn from_json(raw: &str) -> AppResult<Self> {
        let reports: Vec<Report> = serde_json::from_str(raw)?;
        Ok(Self::from_reports(reports))
    }

    /// Build a seed set, skipping records with bad coordinates, fields that
    /// exceed the storage limits, or repeated ids.
    pub fn from_reports(reports: Vec<Report>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(reports.len());
        for report in reports {
            if let Err(e) = report
                .location
                .validate()
                .and_then(|()| report.check_lengths())
            {
                warn!(report_id = %report.id, error = %e, "Skipping seed report");
                continue;
            }
            if !seen.insert(report.id.clone()) {
                warn!(report_id = %report.id, "Skipping duplicate seed report id");
                continue;
            }
            kept.push(report);
        }
        Self {
            reports: Arc::new(kept),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn get(&self, id: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MAX_REPORT_ID_LEN, ReportStatus};
    use std::io::Write;

    #[test]
    fn test_embedded_seed_parses() {
        let seed = SeedSet::embedded().unwrap();
        assert_eq!(seed.len(), 5);
        assert_eq!(seed.get("r2").unwrap().status, ReportStatus::Review);
        assert!(seed.get("r5").unwrap().created_at.is_none());
    }

    #[test]
    fn test_invalid_and_duplicate_records_are_skipped() {
        let raw = r#"[
            {"id": "a", "persistent_mock_id": "user_1", "reporter_role": "Coastal Guard",
             "status": "received", "hazard_type": "flooding", "location": {"lat": 10.0, "lng": 80.0}},
            {"id": "b", "persistent_mock_id": "user_1", "reporter_role": "Coastal Guard",
             "status": "received", "hazard_type": "flooding", "location": {"lat": 95.0, "lng": 80.0}},
            {"id": "a", "persistent_mock_id": "user_2", "reporter_role": "Coastal Resident",
             "status": "verified", "hazard_type": "erosion", "location": {"lat": 11.0, "lng": 79.0}}
        ]"#;
        let seed = SeedSet::from_json(raw).unwrap();
        assert_eq!(seed.len(), 1);
        assert_eq!(seed.get("a").unwrap().persistent_mock_id, "user_1");
        assert!(!seed.contains("b"));
    }

    #[test]
    fn test_overlong_seed_id_is_skipped() {
        let long_id = "s".repeat(MAX_REPORT_ID_LEN + 1);
        let raw = format!(
            r#"[
            {{"id": "{long_id}", "persistent_mock_id": "user_1", "reporter_role": "Coastal Guard",
             "status": "received", "hazard_type": "flooding", "location": {{"lat": 10.0, "lng": 80.0}}}},
            {{"id": "ok", "persistent_mock_id": "user_1", "reporter_role": "Coastal Guard",
             "status": "received", "hazard_type": "flooding", "location": {{"lat": 10.0, "lng": 80.0}}}}
        ]"#
        );
        let seed = SeedSet::from_json(&raw).unwrap();
        assert_eq!(seed.len(), 1);
        assert!(seed.contains("ok"));
        assert!(!seed.contains(&long_id));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        assert!(SeedSet::from_file(file.path()).unwrap().is_empty());

        let missing = SeedSet::from_file(Path::new("/nonexistent/seed.json"));
        assert!(matches!(missing, Err(AppError::Validation(_))));
    }
}
