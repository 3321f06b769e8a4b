//! Request authentication: who is acting and in which role.

mod extractor;

use actix_web::http::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

pub use extractor::SessionAuth;

use crate::config::{ADMIN_KEY_HEADER, REPORTER_ID_HEADER, REPORTER_ROLE_HEADER};
use crate::error::{AppError, AppResult};
use crate::models::{Identity, ReporterRole, Session};

/// Identity used when an administrator authenticates with the key alone.
pub const ADMIN_IDENTITY: &str = "admin";

const MAX_REPORTER_ID_LEN: usize = 128;

/// The administrator key. `Debug` never prints the value.
#[derive(Clone)]
pub struct AdminKey(Option<SecretString>);

impl AdminKey {
    pub fn new(key: Option<String>) -> Self {
        Self(key.map(SecretString::from))
    }

    /// Constant-time comparison with the configured key.
    /// Always false when no key is configured.
    pub fn verify(&self, provided: &str) -> bool {
        match &self.0 {
            Some(secret) => secret
                .expose_secret()
                .as_bytes()
                .ct_eq(provided.as_bytes())
                .into(),
            None => false,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }
}

impl std::fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(_) => write!(f, "AdminKey([REDACTED])"),
            None => write!(f, "AdminKey(None)"),
        }
    }
}

/// Turns request headers into a [`Session`].
pub trait AuthProvider: Send + Sync {
    fn authenticate(&self, headers: &HeaderMap) -> AppResult<Session>;
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Default provider: identity and role come from headers, and the
/// Administrator role is only granted with a valid admin key.
#[derive(Debug, Clone)]
pub struct HeaderAuthProvider {
    admin_key: AdminKey,
}

impl HeaderAuthProvider {
    pub fn new(admin_key: AdminKey) -> Self {
        Self { admin_key }
    }
}

impl AuthProvider for HeaderAuthProvider {
    fn authenticate(&self, headers: &HeaderMap) -> AppResult<Session> {
        let reporter_id = header(headers, REPORTER_ID_HEADER);
        if let Some(id) = reporter_id
            && id.len() > MAX_REPORTER_ID_LEN
        {
            return Err(AppError::Validation(format!(
                "{} must be at most {} characters",
                REPORTER_ID_HEADER, MAX_REPORTER_ID_LEN
            )));
        }

        let role = match header(headers, REPORTER_ROLE_HEADER) {
            Some(name) => Some(ReporterRole::parse(name).ok_or_else(|| {
                AppError::Validation(format!("unknown reporter role '{}'", name))
            })?),
            None => None,
        };

        if let Some(provided) = headers
            .get(ADMIN_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| SecretString::from(s.to_string()))
        {
            if !self.admin_key.verify(provided.expose_secret()) {
                return Err(AppError::Unauthorized("invalid admin key".to_string()));
            }
            let identity = Identity::new(reporter_id.unwrap_or(ADMIN_IDENTITY));
            return Ok(Session::new(ReporterRole::Administrator, identity));
        }

        match (role, reporter_id) {
            (Some(ReporterRole::Administrator), _) => Err(AppError::Unauthorized(format!(
                "Administrator role requires the {} header",
                ADMIN_KEY_HEADER
            ))),
            (Some(role), Some(id)) => Ok(Session::new(role, Identity::new(id))),
            (None, _) => Err(AppError::Unauthorized(format!(
                "missing {} header",
                REPORTER_ROLE_HEADER
            ))),
            (_, None) => Err(AppError::Unauthorized(format!(
                "missing {} header",
                REPORTER_ID_HEADER
            ))),
        }
    }
}
