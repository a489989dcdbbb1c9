//! Library entry point for the credlink backend.
//!
//! Exports all core modules for use in integration tests and by the main binary.

pub mod config;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod services;
pub mod session;
pub mod telemetry;

pub use config::*;
pub use handlers::*;
pub use logging::*;
pub use models::AppState;
pub use services::*;
pub use session::*;
