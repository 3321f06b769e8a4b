//! Status transitions and seed/live reconciliation over HTTP.

use chrono::Utc;
use coastal_hazard_lib::models::{HazardType, Location, Report, ReportStatus, ReporterRole};
use coastal_hazard_lib::services::MergePrecedence;
use coastal_hazard_lib::store::ReportCollection;
use serde_json::json;

use super::test_helpers::*;

/// Coastal Guard reports a flood, an administrator verifies it, and a later
/// attempt to mark it false is refused.
#[actix_rt::test]
async fn test_flood_report_lifecycle() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;
    let id = submit_flood(&app).await;

    let (status, body) = set_status(&app, &id, "verified").await;
    assert_eq!(status, 200, "unexpected body: {}", body);
    assert_eq!(body["status"], "verified");

    let (status, body) = set_status(&app, &id, "false").await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "ALREADY_FINALIZED");

    let (_, body) = get(&app, &format!("/api/v1/reports/{}", id), &[]).await;
    assert_eq!(body["status"], "verified");
}

#[actix_rt::test]
async fn test_dismiss_marks_report_false() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;
    let id = submit_flood(&app).await;

    let (status, body) = set_status(&app, &id, "false").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "false");
}

#[actix_rt::test]
async fn test_contributor_cannot_change_status() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;
    let id = submit_flood(&app).await;

    let (status, body) = put(
        &app,
        &format!("/api/v1/reports/{}/status", id),
        &contributor(GUARD_ID, "Coastal Guard"),
        json!({ "status": "verified" }),
    )
    .await;
    assert_eq!(status, 403);
    assert_eq!(body["error"], "INVALID_TRANSITION");

    let (_, body) = get(&app, &format!("/api/v1/reports/{}", id), &[]).await;
    assert_eq!(body["status"], "received");
}

#[actix_rt::test]
async fn test_administrator_role_requires_key() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;
    let id = submit_flood(&app).await;

    let headers = vec![
        ("X-Reporter-Id", "user_impostor".to_string()),
        ("X-Reporter-Role", "Administrator".to_string()),
        ("X-Admin-Key", "wrong-key".to_string()),
    ];
    let (status, _) = put(
        &app,
        &format!("/api/v1/reports/{}/status", id),
        &headers,
        json!({ "status": "verified" }),
    )
    .await;
    assert_eq!(status, 401);
}

#[actix_rt::test]
async fn test_missing_edges_and_unknown_values() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;
    let id = submit_flood(&app).await;

    let (status, body) = set_status(&app, &id, "review").await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "INVALID_TRANSITION");

    let (status, body) = set_status(&app, &id, "approved").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_STATUS");

    let (status, body) = set_status(&app, "no-such-report", "verified").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_rt::test]
async fn test_seed_reports_are_read_only_by_default() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;

    let (status, body) = set_status(&app, "r1", "verified").await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "SEED_READ_ONLY");
}

#[actix_rt::test]
async fn test_seed_reports_copy_on_write_under_live_precedence() {
    let (app, collection) = create_test_app(MergePrecedence::Live).await;

    let (status, body) = set_status(&app, "r1", "verified").await;
    assert_eq!(status, 200, "unexpected body: {}", body);
    assert_eq!(body["status"], "verified");

    let stored = collection.get("r1").await.unwrap().expect("live copy");
    assert_eq!(stored.status, ReportStatus::Verified);

    let (_, body) = get(&app, "/api/v1/reports", &[]).await;
    assert_eq!(body["total"], 5);

    // r3 is already verified in the seed set
    let (status, body) = set_status(&app, "r3", "false").await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "ALREADY_FINALIZED");
}

fn live_r1() -> Report {
    Report {
        id: "r1".to_string(),
        persistent_mock_id: "user_live-device".to_string(),
        reporter_role: ReporterRole::CoastalGuard,
        status: ReportStatus::Verified,
        hazard_type: HazardType::Flooding,
        extra_hazard_type: None,
        description: None,
        location: Location::new(17.7, 83.3),
        media_files: Vec::new(),
        created_at: Some(Utc::now()),
    }
}

#[actix_rt::test]
async fn test_seed_id_collision_keeps_seed_record() {
    let (app, collection) = create_test_app(MergePrecedence::Seed).await;
    collection.insert(&live_r1()).await.unwrap();

    let (_, body) = get(&app, "/api/v1/reports", &[]).await;
    assert_eq!(body["total"], 5);
    let r1: Vec<_> = body["reports"]
        .as_array()
        .expect("reports")
        .iter()
        .filter(|r| r["id"] == "r1")
        .collect();
    assert_eq!(r1.len(), 1);
    assert_eq!(r1[0]["status"], "received");
}

#[actix_rt::test]
async fn test_seed_id_collision_under_live_precedence() {
    let (app, collection) = create_test_app(MergePrecedence::Live).await;
    collection.insert(&live_r1()).await.unwrap();

    let (_, body) = get(&app, "/api/v1/reports", &[]).await;
    assert_eq!(body["total"], 5);

    let (status, body) = get(&app, "/api/v1/reports/r1", &[]).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "verified");
    assert_eq!(body["persistent_mock_id"], "user_live-device");
}
