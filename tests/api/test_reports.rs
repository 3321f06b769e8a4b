//! Report submission and listing.

use coastal_hazard_lib::services::MergePrecedence;
use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_submit_creates_received_report() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;

    let (status, body) = post(
        &app,
        "/api/v1/reports",
        &contributor(GUARD_ID, "Coastal Guard"),
        flood_report(),
    )
    .await;

    assert_eq!(status, 201, "unexpected body: {}", body);
    assert_eq!(body["status"], "received");
    assert_eq!(body["reporter_role"], "Coastal Guard");
    assert_eq!(body["persistent_mock_id"], GUARD_ID);
    assert_eq!(body["location"]["lat"], 17.71);
    assert!(body["created_at"].is_string());
}

#[actix_rt::test]
async fn test_sequential_submissions_get_unique_ids() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;

    let mut ids = Vec::new();
    for _ in 0..5 {
        ids.push(submit_flood(&app).await);
    }
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 5);

    let (_, body) = get(&app, "/api/v1/reports/stats", &[]).await;
    assert_eq!(body["total"], 10);
}

#[actix_rt::test]
async fn test_submit_requires_session() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;

    let (status, body) = post(&app, "/api/v1/reports", &[], flood_report()).await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "UNAUTHORIZED");
}

#[actix_rt::test]
async fn test_submit_validates_fields() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;
    let headers = contributor(GUARD_ID, "Coastal Guard");

    let (status, body) = post(
        &app,
        "/api/v1/reports",
        &headers,
        json!({ "hazard_type": "flooding" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = post(
        &app,
        "/api/v1/reports",
        &headers,
        json!({ "hazard_type": "flooding", "location": { "lat": 95.0, "lng": 10.0 } }),
    )
    .await;
    assert_eq!(status, 400);

    let (status, body) = post(
        &app,
        "/api/v1/reports",
        &headers,
        json!({ "hazard_type": "tsunami", "location": { "lat": 10.0, "lng": 10.0 } }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_rt::test]
async fn test_list_includes_seed_and_live_newest_first() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;
    let id = submit_flood(&app).await;

    let (status, body) = get(&app, "/api/v1/reports", &[]).await;
    assert_eq!(status, 200);
    assert_eq!(body["total"], 6);

    let ids: Vec<&str> = body["reports"]
        .as_array()
        .expect("reports")
        .iter()
        .filter_map(|r| r["id"].as_str())
        .collect();
    // Fresh submission first, the untimestamped seed record last
    assert_eq!(ids[0], id);
    assert_eq!(ids[ids.len() - 1], "r5");
}

#[actix_rt::test]
async fn test_list_filters_by_status_and_role() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;

    let (status, body) = get(&app, "/api/v1/reports?status=verified&role=all", &[]).await;
    assert_eq!(status, 200);
    let reports = body["reports"].as_array().expect("reports");
    assert!(!reports.is_empty());
    assert!(reports.iter().all(|r| r["status"] == "verified"));

    let (status, body) = get(
        &app,
        "/api/v1/reports?status=all&role=Coastal%20Resident",
        &[],
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["total"], 2);

    let (status, body) = get(&app, "/api/v1/reports?status=pending", &[]).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_STATUS");
}

#[actix_rt::test]
async fn test_priority_sort_puts_guard_first() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;
    post(
        &app,
        "/api/v1/reports",
        &contributor("user_resident", "Coastal Resident"),
        flood_report(),
    )
    .await;

    let (status, body) = get(&app, "/api/v1/reports?sort=priority", &[]).await;
    assert_eq!(status, 200);
    assert_eq!(body["reports"][0]["reporter_role"], "Coastal Guard");
}

#[actix_rt::test]
async fn test_my_reports_only_returns_own_submissions() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;
    let resident = contributor("user_resident", "Coastal Resident");

    submit_flood(&app).await;
    post(&app, "/api/v1/reports", &resident, flood_report()).await;
    post(&app, "/api/v1/reports", &resident, flood_report()).await;

    let (status, body) = get(&app, "/api/v1/reports/mine", &resident).await;
    assert_eq!(status, 200);
    assert_eq!(body["total"], 2);
    assert!(
        body["reports"]
            .as_array()
            .expect("reports")
            .iter()
            .all(|r| r["persistent_mock_id"] == "user_resident")
    );

    let (status, _) = get(&app, "/api/v1/reports/mine", &[]).await;
    assert_eq!(status, 401);
}

#[actix_rt::test]
async fn test_roles_and_stats() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;

    let (status, body) = get(&app, "/api/v1/reports/roles", &[]).await;
    assert_eq!(status, 200);
    assert_eq!(
        body["roles"],
        json!([
            "Coastal Guard",
            "Coastal Resident",
            "Disaster Manager",
            "General Volunteer"
        ])
    );

    let (status, body) = get(&app, "/api/v1/reports/stats", &[]).await;
    assert_eq!(status, 200);
    assert_eq!(body["total"], 5);
    assert_eq!(body["by_status"]["received"], 2);
    assert_eq!(body["by_status"]["false"], 1);
}

#[actix_rt::test]
async fn test_get_report() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;

    let (status, body) = get(&app, "/api/v1/reports/r3", &[]).await;
    assert_eq!(status, 200);
    assert_eq!(body["hazard_type"], "pollution");

    let (status, body) = get(&app, "/api/v1/reports/does-not-exist", &[]).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");
}
