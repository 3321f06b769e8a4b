//! Coastal hazard server library.
//!
//! Citizen hazard reports, the administrator verification workflow, the
//! seed/live merge that feeds every list view, and the HTTP and WebSocket
//! surface around them.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod services;
pub mod store;
