//! JSON extractor that validates the body before the handler runs.
//!
//! # Usage
//! Take `ValidatedJson<T>` instead of `web::Json<T>` in a handler signature.
//! `T` must implement [`serde::de::DeserializeOwned`] and [`validator::Validate`].
//!
//! # Errors
//! Malformed JSON, a wrong content type, missing fields and failed validation
//! rules are all rejected with `422 Unprocessable Entity` and a
//! `{"detail": ...}` body; the handler is never invoked.

use std::ops::Deref;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::data::ApiError;

/// Deserialised and validated request body.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let json = web::Json::<T>::from_request(req, payload);
        let path = req.path().to_string();

        Box::pin(async move {
            let web::Json(body) = json.await.map_err(|e| {
                tracing::warn!(path = %path, error = %e, "Rejected malformed request body");
                ApiError::Validation(e.to_string())
            })?;

            body.validate().map_err(|e| {
                tracing::warn!(path = %path, error = %e, "Request body failed validation");
                ApiError::Validation(e.to_string())
            })?;

            Ok::<_, actix_web::Error>(ValidatedJson(body))
        })
    }
}
