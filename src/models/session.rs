//! Caller identity passed explicitly to every mutating operation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ReporterRole;

/// Stable per-device pseudo-identity (`user_<uuid>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Prefix used for generated identities.
    pub const PREFIX: &'static str = "user_";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generate a fresh identity.
    pub fn generate() -> Self {
        Self(format!("{}{}", Self::PREFIX, uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 characters after the prefix, for log lines.
    pub fn short(&self) -> &str {
        let rest = self.0.strip_prefix(Self::PREFIX).unwrap_or(&self.0);
        rest.get(..8).unwrap_or(rest)
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who is acting: the role they act in and the device identity they act from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Session {
    pub role: ReporterRole,
    pub identity: Identity,
}

impl Session {
    pub fn new(role: ReporterRole, identity: Identity) -> Self {
        Self { role, identity }
    }

    pub fn is_administrator(&self) -> bool {
        self.role.is_administrator()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_identity_shape() {
        let id = Identity::generate();
        assert!(id.as_str().starts_with("user_"));
        assert_eq!(id.short().len(), 8);
        assert_ne!(id, Identity::generate());
    }

    #[test]
    fn test_short_handles_foreign_ids() {
        assert_eq!(Identity::new("abc").short(), "abc");
    }
}
