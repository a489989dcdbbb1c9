//! Per-request logging for the HTTP server.
//!
//! [`RequestLoggingMiddleware`] runs next to `tracing_actix_web::TracingLogger`
//! and emits one summary event per request, levelled by response status.

pub mod middleware;

pub use middleware::RequestLoggingMiddleware;

/// Requests slower than this get an extra warning.
pub const SLOW_REQUEST_THRESHOLD_MS: u64 = 2000;

/// Log level bucket for a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

pub fn level_for_status(status_code: u16) -> StatusLevel {
    match status_code {
        400..=499 => StatusLevel::Warn,
        500..=599 => StatusLevel::Error,
        _ => StatusLevel::Info,
    }
}
