//! Official warning handlers.

use actix_web::{HttpResponse, web};

use crate::auth::SessionAuth;
use crate::error::AppResult;
use crate::models::{PostWarningRequest, WarningListResponse};
use crate::services::WarningBoard;

#[utoipa::path(
    get,
    path = "/api/v1/warnings",
    tag = "Warnings",
    responses(
        (status = 200, description = "Warnings, newest first", body = WarningListResponse)
    )
)]
pub async fn list_warnings(board: web::Data<WarningBoard>) -> AppResult<HttpResponse> {
    let warnings = board.list().await?;
    Ok(HttpResponse::Ok().json(WarningListResponse { warnings }))
}

/// Publish a warning to every live view. Administrator only.
#[utoipa::path(
    post,
    path = "/api/v1/warnings",
    tag = "Warnings",
    request_body = PostWarningRequest,
    responses(
        (status = 201, description = "Warning posted", body = crate::models::OfficialWarning),
        (status = 400, description = "Blank title or message", body = crate::error::ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = crate::error::ErrorResponse),
    ),
    security(("admin_key" = []))
)]
pub async fn post_warning(
    auth: SessionAuth,
    board: web::Data<WarningBoard>,
    body: web::Json<PostWarningRequest>,
) -> AppResult<HttpResponse> {
    let warning = board.post(&auth.session, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(warning))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/warnings")
            .route(web::get().to(list_warnings))
            .route(web::post().to(post_warning)),
    );
}
