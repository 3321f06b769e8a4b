//! OpenAPI documentation configuration.

use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};

use crate::config::{ADMIN_KEY_HEADER, REPORTER_ID_HEADER};
use crate::{api, error, models, services};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Coastal Hazard Server",
        version = "0.1.0",
        description = "Citizen coastal hazard reporting with administrator verification"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Catalog
        api::catalog::catalog,
        // Report endpoints
        api::reports::submit_report,
        api::reports::list_reports,
        api::reports::list_my_reports,
        api::reports::list_roles,
        api::reports::report_stats,
        api::reports::get_report,
        api::reports::update_report_status,
        // Warnings
        api::warnings::list_warnings,
        api::warnings::post_warning,
        // Geocoding
        api::geocode::geocode,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Catalog
            api::catalog::CatalogResponse,
            api::catalog::RoleInfo,
            api::catalog::StatusInfo,
            api::catalog::HazardInfo,
            // Reports
            models::ReportStatus,
            models::HazardType,
            models::ReporterRole,
            models::Location,
            models::MediaFile,
            models::Report,
            models::SubmitReportRequest,
            models::UpdateStatusRequest,
            models::ReportListResponse,
            api::reports::RolesResponse,
            services::query::SortOrder,
            services::query::StatusCounts,
            // Warnings
            models::OfficialWarning,
            models::PostWarningRequest,
            models::WarningListResponse,
            // Geocoding
            models::GeocodeResult,
            api::geocode::GeocodeResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness checks"),
        (name = "Catalog", description = "Roles, statuses and hazard categories"),
        (name = "Reports", description = "Report submission, listing and verification"),
        (name = "Warnings", description = "Official warnings posted by administrators"),
        (name = "Geocoding", description = "Place name search")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Session header security schemes.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "reporter",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    REPORTER_ID_HEADER,
                    "Device identity; send X-Reporter-Role alongside it",
                ))),
            );
            components.add_security_scheme(
                "admin_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ADMIN_KEY_HEADER))),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_report_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/reports"));
        assert!(
            paths
                .iter()
                .any(|p| p.as_str() == "/api/v1/reports/{report_id}/status")
        );
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/warnings"));
    }

    #[test]
    fn test_security_schemes_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("reporter"));
        assert!(components.security_schemes.contains_key("admin_key"));
    }
}
