//! Location search proxy.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppResult;
use crate::models::GeocodeResult;
use crate::services::Geocoder;

#[derive(Debug, Deserialize, IntoParams)]
pub struct GeocodeQuery {
    /// Free-text place name.
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GeocodeResponse {
    pub results: Vec<GeocodeResult>,
}

#[utoipa::path(
    get,
    path = "/api/v1/geocode",
    tag = "Geocoding",
    params(GeocodeQuery),
    responses(
        (status = 200, description = "Candidate locations", body = GeocodeResponse),
        (status = 502, description = "Geocoder unavailable", body = crate::error::ErrorResponse),
    )
)]
pub async fn geocode(
    geocoder: web::Data<dyn Geocoder>,
    query: web::Query<GeocodeQuery>,
) -> AppResult<HttpResponse> {
    let results = geocoder.search(&query.q).await?;
    Ok(HttpResponse::Ok().json(GeocodeResponse { results }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/geocode").route(web::get().to(geocode)));
}
