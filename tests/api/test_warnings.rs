//! Official warnings.

use coastal_hazard_lib::services::MergePrecedence;
use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_admin_posts_warning() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;

    let (status, body) = post(
        &app,
        "/api/v1/warnings",
        &admin(),
        json!({ "title": "High tide alert", "message": "Stay off the beach road until 18:00" }),
    )
    .await;
    assert_eq!(status, 201, "unexpected body: {}", body);
    assert_eq!(body["title"], "High tide alert");

    let (status, body) = get(&app, "/api/v1/warnings", &[]).await;
    assert_eq!(status, 200);
    assert_eq!(body["warnings"].as_array().map(Vec::len), Some(1));
}

#[actix_rt::test]
async fn test_contributor_cannot_post_warning() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;

    let (status, _) = post(
        &app,
        "/api/v1/warnings",
        &contributor(GUARD_ID, "Coastal Guard"),
        json!({ "title": "Fake", "message": "Not an official warning" }),
    )
    .await;
    assert_eq!(status, 403);

    let (_, body) = get(&app, "/api/v1/warnings", &[]).await;
    assert_eq!(body["warnings"].as_array().map(Vec::len), Some(0));
}

#[actix_rt::test]
async fn test_blank_warning_is_rejected() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;

    let (status, body) = post(
        &app,
        "/api/v1/warnings",
        &admin(),
        json!({ "title": "  ", "message": "body" }),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}
