//! Request/response bodies and the error type for the HTTP boundary.
//!
//! Request bodies use camelCase field names and also accept the snake_case
//! spellings older clients send (`user_id`, `client_user_id`,
//! `public_token`). Responses are always camelCase.
//!
//! # Error bodies
//!
//! Every error is rendered as:
//!
//! ```json
//! { "detail": "Failed to fetch transactions" }
//! ```
//!
//! Upstream failures always carry the fixed per-operation message; the
//! underlying Plaid error is logged but never serialised.

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use validator::Validate;

use crate::{services::PlaidError, session::AccessToken};

/// Body of `POST /get-credit-score`. The identifier is not interpreted.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    #[serde(alias = "user_id")]
    pub user_id: String,
}

/// Body of `POST /create_link_token`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LinkTokenRequest {
    #[validate(length(min = 1, message = "clientUserId must not be empty"))]
    #[serde(alias = "client_user_id")]
    pub client_user_id: String,
}

/// Body of `POST /exchange_public_token`.
#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PublicTokenRequest {
    #[validate(length(min = 1, message = "publicToken must not be empty"))]
    #[serde(alias = "public_token")]
    pub public_token: String,
}

impl fmt::Debug for PublicTokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicTokenRequest")
            .field("public_token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreditScoreResponse {
    pub credit_score: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTokenResponse {
    pub link_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: AccessToken,
}

#[derive(Debug, Serialize)]
pub struct AccountsResponse {
    pub accounts: Vec<Value>,
}

/// Only newly added transactions from a single sync page.
#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// The four proxied aggregator operations, used to pick the public
/// failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyOperation {
    CreateLinkToken,
    ExchangePublicToken,
    FetchBalances,
    FetchTransactions,
}

impl ProxyOperation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::CreateLinkToken => "Failed to create link token",
            Self::ExchangePublicToken => "Failed to exchange public token",
            Self::FetchBalances => "Failed to fetch account balances",
            Self::FetchTransactions => "Failed to fetch transactions",
        }
    }
}

impl fmt::Display for ProxyOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.failure_message())
    }
}

/// Everything a handler can fail with, mapped to a status code at the boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body could not be parsed or failed validation.
    #[error("{0}")]
    Validation(String),

    /// Balances/transactions requested before any token exchange.
    #[error("Access token not found")]
    MissingAccessToken,

    /// The aggregator call failed.
    #[error("{operation}")]
    Upstream {
        operation: ProxyOperation,
        source: PlaidError,
    },
}

impl ApiError {
    /// Logs `source` with full detail and wraps it behind the generic message.
    pub fn upstream(operation: ProxyOperation, source: PlaidError) -> Self {
        tracing::error!(
            operation = ?operation,
            error = %source,
            error.debug = ?source,
            "{}",
            operation
        );
        Self::Upstream { operation, source }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MissingAccessToken => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            detail: self.to_string(),
        })
    }
}
