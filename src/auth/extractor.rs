//! Actix-web extractor producing the acting [`Session`].

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use std::future::{Ready, ready};
use tracing::warn;

use super::AuthProvider;
use crate::error::AppError;
use crate::models::Session;

/// Extractor for handlers that need to know who is acting:
/// ```ignore
/// async fn handler(auth: SessionAuth) -> impl Responder {
///     // auth.session.role, auth.session.identity
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SessionAuth {
    pub session: Session,
}

impl FromRequest for SessionAuth {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let provider = match req.app_data::<web::Data<dyn AuthProvider>>() {
            Some(provider) => provider,
            None => {
                return ready(Err(AppError::Unauthorized(
                    "Internal configuration error".to_string(),
                )));
            }
        };

        match provider.authenticate(req.headers()) {
            Ok(session) => ready(Ok(SessionAuth { session })),
            Err(e) => {
                warn!(path = %req.path(), error = %e, "Authentication failed");
                ready(Err(e))
            }
        }
    }
}
