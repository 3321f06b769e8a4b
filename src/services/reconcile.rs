//! Merge of the static seed set with the live collection.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::{AppError, AppResult};
use crate::models::Report;
use crate::services::query::sort_newest_first;
use crate::services::seed::SeedSet;

/// Which side wins when a seed record and a live record share an id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePrecedence {
    /// Seed records are authoritative and read-only.
    #[default]
    Seed,
    /// Live records shadow seed records with the same id.
    Live,
}

impl MergePrecedence {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "seed" => Some(Self::Seed),
            "live" => Some(Self::Live),
            _ => None,
        }
    }
}

impl std::fmt::Display for MergePrecedence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Seed => write!(f, "seed"),
            Self::Live => write!(f, "live"),
        }
    }
}

/// First occurrence of every id, in input order.
fn first_occurrences(reports: &[Report]) -> Vec<&Report> {
    let mut seen = HashSet::new();
    reports
        .iter()
        .filter(|r| seen.insert(r.id.as_str()))
        .collect()
}

/// Merge `seed` and `live` into one list, de-duplicated by id and ordered
/// newest first. Seed survivors precede live records before the stable sort,
/// so equal timestamps keep that order.
pub fn reconcile(seed: &[Report], live: &[Report], precedence: MergePrecedence) -> Vec<Report> {
    let seed = first_occurrences(seed);
    let live = first_occurrences(live);

    let (seed, live): (Vec<&Report>, Vec<&Report>) = match precedence {
        MergePrecedence::Seed => {
            let ids: HashSet<&str> = seed.iter().map(|r| r.id.as_str()).collect();
            let live = live
                .into_iter()
                .filter(|r| !ids.contains(r.id.as_str()))
                .collect();
            (seed, live)
        }
        MergePrecedence::Live => {
            let ids: HashSet<&str> = live.iter().map(|r| r.id.as_str()).collect();
            let seed = seed
                .into_iter()
                .filter(|r| !ids.contains(r.id.as_str()))
                .collect();
            (seed, live)
        }
    };

    let mut merged: Vec<Report> = seed.into_iter().chain(live).cloned().collect();
    sort_newest_first(&mut merged);
    merged
}

/// A reconciled view kept current by the collection feed.
///
/// Dropping the view drops its receiver, which unsubscribes from the feed.
pub struct LiveReportView {
    seed: SeedSet,
    precedence: MergePrecedence,
    feed: watch::Receiver<Arc<Vec<Report>>>,
}

impl LiveReportView {
    pub fn new(
        seed: SeedSet,
        precedence: MergePrecedence,
        feed: watch::Receiver<Arc<Vec<Report>>>,
    ) -> Self {
        Self {
            seed,
            precedence,
            feed,
        }
    }

    /// Reconciled list for the latest snapshot.
    pub fn current(&mut self) -> Vec<Report> {
        let live = Arc::clone(&self.feed.borrow_and_update());
        reconcile(self.seed.reports(), &live, self.precedence)
    }

    /// Wait for the next snapshot and return the recomputed list.
    pub async fn changed(&mut self) -> AppResult<Vec<Report>> {
        self.feed
            .changed()
            .await
            .map_err(|_| AppError::StoreUnavailable("report feed closed".to_string()))?;
        Ok(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HazardType, Location, ReportStatus, ReporterRole};
    use chrono::{TimeZone, Utc};

    fn report(id: &str, status: ReportStatus, ts: Option<i64>) -> Report {
        Report {
            id: id.to_string(),
            persistent_mock_id: "user_x".to_string(),
            reporter_role: ReporterRole::GeneralVolunteer,
            status,
            hazard_type: HazardType::Erosion,
            extra_hazard_type: None,
            description: None,
            location: Location::new(13.08, 80.27),
            media_files: vec![],
            created_at: ts.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
        }
    }

    fn ids(reports: &[Report]) -> Vec<&str> {
        reports.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_seed_wins_on_collision() {
        let seed = vec![report("r1", ReportStatus::Received, Some(10))];
        let live = vec![
            report("r1", ReportStatus::Verified, Some(20)),
            report("x", ReportStatus::Received, Some(5)),
        ];

        let merged = reconcile(&seed, &live, MergePrecedence::Seed);
        assert_eq!(ids(&merged), vec!["r1", "x"]);
        assert_eq!(merged[0].status, ReportStatus::Received);
    }

    #[test]
    fn test_live_wins_on_collision() {
        let seed = vec![report("r1", ReportStatus::Received, Some(10))];
        let live = vec![report("r1", ReportStatus::Verified, Some(10))];

        let merged = reconcile(&seed, &live, MergePrecedence::Live);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].status, ReportStatus::Verified);
    }

    #[test]
    fn test_duplicates_within_one_input_keep_first() {
        let live = vec![
            report("a", ReportStatus::Received, Some(1)),
            report("a", ReportStatus::False, Some(2)),
        ];
        let merged = reconcile(&[], &live, MergePrecedence::Seed);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].status, ReportStatus::Received);
    }

    #[test]
    fn test_ties_keep_seed_before_live() {
        let seed = vec![report("s", ReportStatus::Review, None)];
        let live = vec![
            report("l1", ReportStatus::Received, None),
            report("l2", ReportStatus::Received, Some(3)),
        ];
        let merged = reconcile(&seed, &live, MergePrecedence::Seed);
        assert_eq!(ids(&merged), vec!["l2", "s", "l1"]);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let seed = vec![
            report("r1", ReportStatus::Received, Some(10)),
            report("r2", ReportStatus::Review, None),
        ];
        let live = vec![
            report("r1", ReportStatus::Verified, Some(30)),
            report("n1", ReportStatus::Received, Some(10)),
            report("n2", ReportStatus::False, Some(40)),
        ];

        for precedence in [MergePrecedence::Seed, MergePrecedence::Live] {
            let once = reconcile(&seed, &live, precedence);
            let twice = reconcile(&seed, &once, precedence);
            assert_eq!(once, twice, "{precedence}");
            assert_eq!(once, reconcile(&seed, &live, precedence));
        }
    }

    #[tokio::test]
    async fn test_live_view_recomputes_on_push() {
        let seed = SeedSet::from_reports(vec![report("r1", ReportStatus::Received, Some(10))]);
        let (tx, rx) = watch::channel(Arc::new(Vec::new()));
        let mut view = LiveReportView::new(seed, MergePrecedence::Seed, rx);

        assert_eq!(ids(&view.current()), vec!["r1"]);

        tx.send_replace(Arc::new(vec![report("n1", ReportStatus::Received, Some(99))]));
        let list = view.changed().await.unwrap();
        assert_eq!(ids(&list), vec!["n1", "r1"]);

        drop(tx);
        assert!(matches!(
            view.changed().await,
            Err(AppError::StoreUnavailable(_))
        ));
    }

    #[test]
    fn test_precedence_parse() {
        assert_eq!(MergePrecedence::parse("LIVE"), Some(MergePrecedence::Live));
        assert_eq!(MergePrecedence::parse("seed"), Some(MergePrecedence::Seed));
        assert_eq!(MergePrecedence::parse("remote"), None);
        assert_eq!(MergePrecedence::default(), MergePrecedence::Seed);
    }
}
