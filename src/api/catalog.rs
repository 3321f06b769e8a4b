//! Reference data for report forms and filters.

use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{EXTRA_HAZARD_TYPES, HazardType, ReportStatus, ReporterRole};

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleInfo {
    pub name: ReporterRole,
    pub priority: u8,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusInfo {
    pub value: ReportStatus,
    pub label: &'static str,
    pub terminal: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HazardInfo {
    pub value: HazardType,
    pub label: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogResponse {
    pub roles: Vec<RoleInfo>,
    pub statuses: Vec<StatusInfo>,
    pub hazard_types: Vec<HazardInfo>,
    /// Sub-categories offered for `others`.
    pub extra_hazard_types: Vec<&'static str>,
}

impl CatalogResponse {
    pub fn build() -> Self {
        Self {
            roles: ReporterRole::ALL
                .into_iter()
                .map(|name| RoleInfo {
                    name,
                    priority: name.priority(),
                })
                .collect(),
            statuses: ReportStatus::ALL
                .into_iter()
                .map(|value| StatusInfo {
                    value,
                    label: value.label(),
                    terminal: value.is_terminal(),
                })
                .collect(),
            hazard_types: HazardType::ALL
                .into_iter()
                .map(|value| HazardInfo {
                    value,
                    label: value.label(),
                })
                .collect(),
            extra_hazard_types: EXTRA_HAZARD_TYPES.to_vec(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/catalog",
    tag = "Catalog",
    responses(
        (status = 200, description = "Roles, statuses and hazard categories", body = CatalogResponse)
    )
)]
#[get("/catalog")]
pub async fn catalog() -> HttpResponse {
    HttpResponse::Ok().json(CatalogResponse::build())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(catalog);
}
