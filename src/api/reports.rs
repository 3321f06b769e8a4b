//! Report API handlers.

use actix_web::{HttpResponse, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::SessionAuth;
use crate::error::AppResult;
use crate::models::{
    ReportListResponse, ReporterRole, SubmitReportRequest, UpdateStatusRequest, parse_status,
};
use crate::services::VerificationWorkflow;
use crate::services::query::{
    ListReportsQuery, ReportFilters, StatusCounts, all_reports, my_reports, status_counts,
    unique_roles,
};
use crate::store::ReportStore;

/// Roles present in the current report list.
#[derive(Debug, Serialize, ToSchema)]
pub struct RolesResponse {
    pub roles: Vec<ReporterRole>,
}

/// Submit a new hazard report as the calling session.
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    tag = "Reports",
    request_body = SubmitReportRequest,
    responses(
        (status = 201, description = "Report created", body = crate::models::Report),
        (status = 400, description = "Missing or invalid field", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing session headers", body = crate::error::ErrorResponse),
        (status = 503, description = "Report store unavailable", body = crate::error::ErrorResponse),
    ),
    security(("reporter" = []))
)]
pub async fn submit_report(
    auth: SessionAuth,
    store: web::Data<ReportStore>,
    body: web::Json<SubmitReportRequest>,
) -> AppResult<HttpResponse> {
    let report = store.create(&auth.session, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(report))
}

/// List reports with optional status and role filters.
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    tag = "Reports",
    params(ListReportsQuery),
    responses(
        (status = 200, description = "Filtered reports", body = ReportListResponse),
        (status = 400, description = "Unknown filter value", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_reports(
    store: web::Data<ReportStore>,
    query: web::Query<ListReportsQuery>,
) -> AppResult<HttpResponse> {
    let filters = ReportFilters::try_from(query.into_inner())?;
    let reports = all_reports(&store.reconciled().await?, &filters);
    let total = reports.len();
    Ok(HttpResponse::Ok().json(ReportListResponse { reports, total }))
}

/// Reports submitted from the calling device, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/reports/mine",
    tag = "Reports",
    responses(
        (status = 200, description = "The caller's reports", body = ReportListResponse),
        (status = 401, description = "Missing session headers", body = crate::error::ErrorResponse),
    ),
    security(("reporter" = []))
)]
pub async fn list_my_reports(
    auth: SessionAuth,
    store: web::Data<ReportStore>,
) -> AppResult<HttpResponse> {
    let reports = my_reports(
        &store.reconciled().await?,
        auth.session.identity.as_str(),
    );
    let total = reports.len();
    Ok(HttpResponse::Ok().json(ReportListResponse { reports, total }))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/roles",
    tag = "Reports",
    responses(
        (status = 200, description = "Distinct reporter roles, sorted by name", body = RolesResponse)
    )
)]
pub async fn list_roles(store: web::Data<ReportStore>) -> AppResult<HttpResponse> {
    let roles = unique_roles(&store.reconciled().await?);
    Ok(HttpResponse::Ok().json(RolesResponse { roles }))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/stats",
    tag = "Reports",
    responses(
        (status = 200, description = "Report counts per status", body = StatusCounts)
    )
)]
pub async fn report_stats(store: web::Data<ReportStore>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(status_counts(&store.reconciled().await?)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/{report_id}",
    tag = "Reports",
    params(
        ("report_id" = String, Path, description = "Report id")
    ),
    responses(
        (status = 200, description = "Report", body = crate::models::Report),
        (status = 404, description = "Report not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_report(
    store: web::Data<ReportStore>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let report = store.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Verify or dismiss a report. Administrator only.
#[utoipa::path(
    put,
    path = "/api/v1/reports/{report_id}/status",
    tag = "Reports",
    params(
        ("report_id" = String, Path, description = "Report id")
    ),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = crate::models::Report),
        (status = 400, description = "Unknown status", body = crate::error::ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = crate::error::ErrorResponse),
        (status = 404, description = "Report not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Finalized, seed or no such transition", body = crate::error::ErrorResponse),
    ),
    security(("admin_key" = []))
)]
pub async fn update_report_status(
    auth: SessionAuth,
    workflow: web::Data<VerificationWorkflow>,
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
) -> AppResult<HttpResponse> {
    let to = parse_status(&body.status)?;
    let report = workflow
        .transition(&auth.session, &path.into_inner(), to)
        .await?;
    Ok(HttpResponse::Ok().json(report))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/reports")
            .route(web::get().to(list_reports))
            .route(web::post().to(submit_report)),
    )
    .service(web::resource("/reports/mine").route(web::get().to(list_my_reports)))
    .service(web::resource("/reports/roles").route(web::get().to(list_roles)))
    .service(web::resource("/reports/stats").route(web::get().to(report_stats)))
    .service(web::resource("/reports/{report_id}").route(web::get().to(get_report)))
    .service(
        web::resource("/reports/{report_id}/status").route(web::put().to(update_report_status)),
    );
}
