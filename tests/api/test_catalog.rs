//! Catalog, health and geocoding endpoints.

use coastal_hazard_lib::services::MergePrecedence;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_health_and_ready() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;

    let (status, body) = get(&app, "/api/v1/health", &[]).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get(&app, "/api/v1/ready", &[]).await;
    assert_eq!(status, 200);
    assert_eq!(body["store"], "memory");
    assert_eq!(body["seed_reports"], 5);
}

#[actix_rt::test]
async fn test_catalog_lists_roles_with_priorities() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;

    let (status, body) = get(&app, "/api/v1/catalog", &[]).await;
    assert_eq!(status, 200);

    let roles = body["roles"].as_array().expect("roles");
    assert_eq!(roles.len(), 5);
    let guard = roles
        .iter()
        .find(|r| r["name"] == "Coastal Guard")
        .expect("Coastal Guard listed");
    assert_eq!(guard["priority"], 9);

    let statuses = body["statuses"].as_array().expect("statuses");
    let terminal: Vec<&str> = statuses
        .iter()
        .filter(|s| s["terminal"] == true)
        .filter_map(|s| s["value"].as_str())
        .collect();
    assert_eq!(terminal, vec!["verified", "false"]);
}

#[actix_rt::test]
async fn test_geocode_proxies_search() {
    let (app, _) = create_test_app(MergePrecedence::Seed).await;

    let (status, body) = get(&app, "/api/v1/geocode?q=Puri%20beach", &[]).await;
    assert_eq!(status, 200);
    assert_eq!(body["results"][0]["name"], "Puri, Odisha, India");

    let (status, body) = get(&app, "/api/v1/geocode?q=nowhere", &[]).await;
    assert_eq!(status, 200);
    assert_eq!(body["results"].as_array().map(Vec::len), Some(0));
}
