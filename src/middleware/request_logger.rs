//! Per-request access log under the `api` target.

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::time::Instant;
use tracing::{error, info, warn};

use crate::config::{ADMIN_KEY_HEADER, REPORTER_ID_HEADER, REPORTER_ROLE_HEADER};
use crate::models::Identity;

/// Request logger middleware factory.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

/// Service produced by [`RequestLogger`]; logs each request once it completes.
pub struct RequestLoggerMiddleware<S> {
    service: S,
}

/// Who the request claims to be, without exposing the full identity or key.
fn caller_summary(req: &ServiceRequest) -> String {
    let headers = req.headers();
    if headers.contains_key(ADMIN_KEY_HEADER) {
        return "admin-key".to_string();
    }
    let reporter = headers
        .get(REPORTER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|id| Identity::new(id).short().to_string());
    let role = headers
        .get(REPORTER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok());
    match (reporter, role) {
        (Some(reporter), Some(role)) => format!("{} ({})", reporter, role),
        (Some(reporter), None) => reporter,
        _ => "anonymous".to_string(),
    }
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let caller = caller_summary(&req);

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let status = res.status();
            let duration_ms = start.elapsed().as_millis() as u64;

            if status.is_server_error() {
                error!(target: "api", %method, %path, status = status.as_u16(), duration_ms, %caller, "Request failed");
            } else if status.is_client_error() {
                warn!(target: "api", %method, %path, status = status.as_u16(), duration_ms, %caller, "Request rejected");
            } else {
                info!(target: "api", %method, %path, status = status.as_u16(), duration_ms, %caller, "Request completed");
            }

            Ok(res)
        })
    }
}
