//! Request logging middleware.
//!
//! Logs method, path, status, duration and user agent for every request
//! under a generated request id.

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
};
use futures::future::{LocalBoxFuture, Ready, ok};
use std::{
    task::{Context, Poll},
    time::Instant,
};
use uuid::Uuid;

use super::{SLOW_REQUEST_THRESHOLD_MS, StatusLevel, level_for_status};

#[derive(Clone, Default)]
pub struct RequestLoggingMiddleware;

impl RequestLoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLoggingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RequestLoggingService { service })
    }
}

pub struct RequestLoggingService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start_time = Instant::now();
        let request_id = Uuid::new_v4();

        let method = req.method().to_string();
        let path = req.path().to_string();
        let user_agent = req
            .headers()
            .get("user-agent")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        tracing::debug!(%request_id, %method, %path, "Request received");

        let fut = self.service.call(req);

        Box::pin(async move {
            let response = fut.await?;
            let duration_ms = start_time.elapsed().as_millis() as u64;
            let status_code = response.status().as_u16();

            match level_for_status(status_code) {
                StatusLevel::Info => tracing::info!(
                    %request_id, %method, %path, status_code, duration_ms, %user_agent,
                    "{method} {path} {status_code} {duration_ms}ms"
                ),
                StatusLevel::Warn => tracing::warn!(
                    %request_id, %method, %path, status_code, duration_ms, %user_agent,
                    "{method} {path} {status_code} {duration_ms}ms"
                ),
                StatusLevel::Error => tracing::error!(
                    %request_id, %method, %path, status_code, duration_ms, %user_agent,
                    "{method} {path} {status_code} {duration_ms}ms"
                ),
            }

            if duration_ms > SLOW_REQUEST_THRESHOLD_MS {
                tracing::warn!(
                    %request_id,
                    duration_ms,
                    threshold_ms = SLOW_REQUEST_THRESHOLD_MS,
                    "Slow request detected: {method} {path}"
                );
            }

            Ok(response)
        })
    }
}
