//! Device identity and the locally remembered login.

use std::sync::Arc;

use tracing::info;

use crate::models::{Identity, ReporterRole, Session};
use crate::store::kv::{KeyValueStore, KvError};

pub const MOCK_ID_KEY: &str = "mockId";
pub const USER_ROLE_KEY: &str = "userRole";
pub const SELECTED_ROLE_KEY: &str = "selectedRole";

/// `userRole` value for people submitting reports.
pub const FIELD_CONTRIBUTOR: &str = "Field Contributor";
/// `userRole` value for the verification desk.
pub const ADMINISTRATOR: &str = "Administrator";
/// `selectedRole` shown for administrators.
pub const ANALYST_ROLE: &str = "INCOIS Analyst";

/// Maps a device to a stable pseudo-identity.
#[derive(Clone)]
pub struct IdentityResolver {
    kv: Arc<dyn KeyValueStore>,
}

impl IdentityResolver {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Stored identity, or a freshly generated one that is stored first.
    pub fn get_or_create(&self) -> Result<Identity, KvError> {
        if let Some(existing) = self.kv.get(MOCK_ID_KEY)?
            && !existing.trim().is_empty()
        {
            return Ok(Identity::new(existing));
        }
        let identity = Identity::generate();
        self.kv.set(MOCK_ID_KEY, identity.as_str())?;
        info!(reporter = %identity.short(), "Generated device identity");
        Ok(identity)
    }
}

/// Login state remembered by the device.
#[derive(Clone)]
pub struct DeviceSession {
    kv: Arc<dyn KeyValueStore>,
    resolver: IdentityResolver,
}

impl DeviceSession {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            resolver: IdentityResolver::new(Arc::clone(&kv)),
            kv,
        }
    }

    /// Remember a contributor login in `role`.
    pub fn login_contributor(&self, role: ReporterRole) -> Result<Session, KvError> {
        self.kv.set(USER_ROLE_KEY, FIELD_CONTRIBUTOR)?;
        self.kv.set(SELECTED_ROLE_KEY, role.as_str())?;
        Ok(Session::new(role, self.resolver.get_or_create()?))
    }

    /// Remember an administrator login.
    pub fn login_administrator(&self) -> Result<Session, KvError> {
        self.kv.set(USER_ROLE_KEY, ADMINISTRATOR)?;
        self.kv.set(SELECTED_ROLE_KEY, ANALYST_ROLE)?;
        Ok(Session::new(
            ReporterRole::Administrator,
            self.resolver.get_or_create()?,
        ))
    }

    /// Session rebuilt from storage, `None` when logged out.
    ///
    /// A contributor whose selected role is missing or unknown acts as a
    /// Coastal Resident.
    pub fn current(&self) -> Result<Option<Session>, KvError> {
        let role = match self.kv.get(USER_ROLE_KEY)?.as_deref() {
            Some(ADMINISTRATOR) => ReporterRole::Administrator,
            Some(FIELD_CONTRIBUTOR) => self
                .kv
                .get(SELECTED_ROLE_KEY)?
                .as_deref()
                .and_then(ReporterRole::parse)
                .filter(|r| !r.is_administrator())
                .unwrap_or(ReporterRole::CoastalResident),
            _ => return Ok(None),
        };
        Ok(Some(Session::new(role, self.resolver.get_or_create()?)))
    }

    /// Forget the login and the device identity.
    pub fn logout(&self) -> Result<(), KvError> {
        self.kv.remove(USER_ROLE_KEY)?;
        self.kv.remove(MOCK_ID_KEY)
    }
}
