//! Shared helpers for API tests.

use std::sync::Arc;

use actix_web::{App, dev::ServiceResponse, test, web};
use async_trait::async_trait;
use coastal_hazard_lib::api;
use coastal_hazard_lib::auth::{AdminKey, AuthProvider, HeaderAuthProvider};
use coastal_hazard_lib::error::AppResult;
use coastal_hazard_lib::models::GeocodeResult;
use coastal_hazard_lib::services::{
    EventBroadcaster, Geocoder, MergePrecedence, SeedSet, VerificationWorkflow, WarningBoard,
};
use coastal_hazard_lib::store::{MemoryCollection, MemoryWarnings, ReportStore};
use serde_json::{Value, json};

/// Admin key used in tests.
pub const TEST_ADMIN_KEY: &str = "test-admin-key-for-api-tests";

/// Identity of the contributor device used by most tests.
pub const GUARD_ID: &str = "user_test-guard";

/// Geocoder that knows a single place.
pub struct StubGeocoder;

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn search(&self, text: &str) -> AppResult<Vec<GeocodeResult>> {
        if text.to_lowercase().contains("puri") {
            Ok(vec![GeocodeResult {
                name: "Puri, Odisha, India".to_string(),
                lat: 19.8135,
                lng: 85.8312,
            }])
        } else {
            Ok(Vec::new())
        }
    }
}

/// Create a test app over an empty in-memory collection and the embedded
/// seed set. The collection is returned so tests can add live records
/// directly.
pub async fn create_test_app(
    precedence: MergePrecedence,
) -> (
    impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
    Arc<MemoryCollection>,
) {
    let collection = Arc::new(MemoryCollection::new());
    let seed = SeedSet::embedded().expect("embedded seed parses");
    let events = EventBroadcaster::new();
    let store = ReportStore::new(collection.clone(), seed, precedence, events.clone());
    let workflow = VerificationWorkflow::new(store.clone());
    let board = WarningBoard::new(Arc::new(MemoryWarnings::new()), events);
    let auth: Arc<dyn AuthProvider> = Arc::new(HeaderAuthProvider::new(AdminKey::new(Some(
        TEST_ADMIN_KEY.to_string(),
    ))));
    let geocoder: Arc<dyn Geocoder> = Arc::new(StubGeocoder);

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(store))
            .app_data(web::Data::new(workflow))
            .app_data(web::Data::new(board))
            .app_data(web::Data::from(auth))
            .app_data(web::Data::from(geocoder))
            .app_data(api::json_config())
            .service(web::scope("/api/v1").configure(api::configure)),
    )
    .await;

    (app, collection)
}

/// Headers for a contributor session.
pub fn contributor(id: &str, role: &str) -> Vec<(&'static str, String)> {
    vec![
        ("X-Reporter-Id", id.to_string()),
        ("X-Reporter-Role", role.to_string()),
    ]
}

/// Headers for an administrator session.
pub fn admin() -> Vec<(&'static str, String)> {
    vec![
        ("X-Reporter-Id", "user_test-admin".to_string()),
        ("X-Reporter-Role", "Administrator".to_string()),
        ("X-Admin-Key", TEST_ADMIN_KEY.to_string()),
    ]
}

/// The Scenario A submission: a flood seen by a Coastal Guard.
pub fn flood_report() -> Value {
    json!({
        "hazard_type": "flooding",
        "description": "Water over the beach road",
        "location": { "lat": 17.71, "lng": 83.27 },
    })
}

async fn send<S>(app: &S, req: test::TestRequest, headers: &[(&'static str, String)]) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let mut req = req;
    for (name, value) in headers {
        req = req.insert_header((*name, value.as_str()));
    }
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status().as_u16();
    let body = test::read_body(resp).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, value)
}

pub async fn get<S>(app: &S, uri: &str, headers: &[(&'static str, String)]) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    send(app, test::TestRequest::get().uri(uri), headers).await
}

pub async fn post<S>(
    app: &S,
    uri: &str,
    headers: &[(&'static str, String)],
    body: Value,
) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    send(app, test::TestRequest::post().uri(uri).set_json(body), headers).await
}

pub async fn put<S>(
    app: &S,
    uri: &str,
    headers: &[(&'static str, String)],
    body: Value,
) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    send(app, test::TestRequest::put().uri(uri).set_json(body), headers).await
}

/// Submit the flood report as the test Coastal Guard and return its id.
pub async fn submit_flood<S>(app: &S) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, body) = post(
        app,
        "/api/v1/reports",
        &contributor(GUARD_ID, "Coastal Guard"),
        flood_report(),
    )
    .await;
    assert_eq!(status, 201, "submit failed: {}", body);
    body["id"].as_str().expect("report id").to_string()
}

/// Change a report's status as the administrator.
pub async fn set_status<S>(app: &S, id: &str, status: &str) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    put(
        app,
        &format!("/api/v1/reports/{}/status", id),
        &admin(),
        json!({ "status": status }),
    )
    .await
}
