//! Liveness endpoint for monitoring and orchestration.

use actix_web::{HttpResponse, Responder};

/// Returns `{"status":"ok"}` while the process is serving requests.
#[tracing::instrument]
pub async fn health_check() -> impl Responder {
    tracing::debug!("Health check endpoint called");
    HttpResponse::Ok().json(serde_json::json!({"status": "ok"}))
}
