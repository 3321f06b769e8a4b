//! HTTP API test suite.
//!
//! Runs the full `/api/v1` surface against the in-memory backend and the
//! embedded seed reports. No external services are required.
//!
//! Run with: cargo test --test api

mod test_helpers;

mod test_catalog;
mod test_reports;
mod test_verification;
mod test_warnings;
