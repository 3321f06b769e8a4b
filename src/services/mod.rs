//! Business logic services.

pub mod event_broadcaster;
pub mod geocoding;
pub mod identity;
pub mod query;
pub mod reconcile;
pub mod retry;
pub mod seed;
pub mod verification;
pub mod warnings;

pub use event_broadcaster::EventBroadcaster;
pub use geocoding::{Geocoder, NominatimGeocoder};
pub use identity::{DeviceSession, IdentityResolver};
pub use reconcile::{LiveReportView, MergePrecedence};
pub use retry::RetryPolicy;
pub use seed::SeedSet;
pub use verification::VerificationWorkflow;
pub use warnings::WarningBoard;
