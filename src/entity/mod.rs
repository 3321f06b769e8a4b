//! SeaORM entity definitions for PostgreSQL database.

pub mod hazard_report;
pub mod official_warning;
