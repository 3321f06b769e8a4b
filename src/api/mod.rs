//! API endpoint modules.

use actix_web::{error::JsonPayloadError, web};

use crate::error::AppError;

pub mod catalog;
pub mod geocode;
pub mod health;
pub mod openapi;
pub mod reports;
pub mod warnings;
pub mod websocket;

pub use health::configure_health_routes;
pub use openapi::ApiDoc;

/// Malformed JSON bodies answer with the standard error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err: JsonPayloadError, _req| {
            AppError::Validation(format!("Invalid request body: {}", err)).into()
        })
}

/// Register every `/api/v1` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(catalog::configure_routes)
        .configure(reports::configure_routes)
        .configure(warnings::configure_routes)
        .configure(geocode::configure_routes)
        .configure(websocket::configure_routes);
}
