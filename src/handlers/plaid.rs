//! Financial-data proxy endpoints.
//!
//! Each handler forwards one operation to the configured
//! [`FinancialDataClient`](crate::services::FinancialDataClient). The access
//! token from the last successful exchange lives in the shared
//! [`LinkSession`](crate::session::LinkSession); balance and transaction
//! requests made before any exchange are refused with `400` without calling
//! the aggregator.

use actix_web::{HttpResponse, web};

use super::{
    data::{
        AccessTokenResponse, AccountsResponse, ApiError, LinkTokenRequest, LinkTokenResponse,
        ProxyOperation, PublicTokenRequest, TransactionsResponse,
    },
    extract::ValidatedJson,
};
use crate::{AppState, session::AccessToken};

/// Creates a link token used by the frontend to open the bank-linking flow.
///
/// # Request Body (JSON)
/// ```json
/// { "clientUserId": "user-123" }
/// ```
///
/// # Responses
/// - `200 OK`: `{ "linkToken": "link-sandbox-..." }`
/// - `422 Unprocessable Entity`: missing or empty `clientUserId`
/// - `500 Internal Server Error`: `{ "detail": "Failed to create link token" }`
#[tracing::instrument(skip(state, payload), fields(client_user_id = %payload.client_user_id))]
pub async fn create_link_token(
    state: web::Data<AppState>,
    payload: ValidatedJson<LinkTokenRequest>,
) -> Result<HttpResponse, ApiError> {
    tracing::debug!("Creating link token");

    let link = state
        .plaid
        .create_link_token(&payload.client_user_id)
        .await
        .map_err(|e| ApiError::upstream(ProxyOperation::CreateLinkToken, e))?;

    Ok(HttpResponse::Ok().json(LinkTokenResponse {
        link_token: link.link_token,
    }))
}

/// Exchanges a public token for an access token and stores it in the session.
///
/// The stored token is replaced unconditionally on success; on failure the
/// previous token (if any) stays in place.
///
/// # Request Body (JSON)
/// ```json
/// { "publicToken": "public-sandbox-..." }
/// ```
///
/// # Responses
/// - `200 OK`: `{ "accessToken": "access-sandbox-..." }`
/// - `422 Unprocessable Entity`: missing or empty `publicToken`
/// - `500 Internal Server Error`: `{ "detail": "Failed to exchange public token" }`
#[tracing::instrument(skip_all)]
pub async fn exchange_public_token(
    state: web::Data<AppState>,
    payload: ValidatedJson<PublicTokenRequest>,
) -> Result<HttpResponse, ApiError> {
    tracing::debug!("Exchanging public token");

    let exchange = state
        .plaid
        .exchange_public_token(&payload.public_token)
        .await
        .map_err(|e| ApiError::upstream(ProxyOperation::ExchangePublicToken, e))?;

    let access_token = AccessToken::new(exchange.access_token);
    state.session.store(access_token.clone()).await;
    tracing::info!(item_id = ?exchange.item_id, "Stored access token for linked item");

    Ok(HttpResponse::Ok().json(AccessTokenResponse { access_token }))
}

/// Returns the linked item's accounts exactly as the aggregator reported them.
///
/// # Responses
/// - `200 OK`: `{ "accounts": [ ... ] }`
/// - `400 Bad Request`: `{ "detail": "Access token not found" }`
/// - `500 Internal Server Error`: `{ "detail": "Failed to fetch account balances" }`
#[tracing::instrument(skip_all)]
pub async fn get_accounts_balance(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let access_token = require_access_token(&state).await?;

    tracing::debug!("Fetching account balances");
    let accounts = state
        .plaid
        .get_balances(access_token.as_str())
        .await
        .map_err(|e| ApiError::upstream(ProxyOperation::FetchBalances, e))?;

    Ok(HttpResponse::Ok().json(AccountsResponse { accounts }))
}

/// Returns the transactions added in a single sync page.
///
/// Modified and removed entries, the cursor and any further pages are
/// dropped. Only one sync call is made per request.
///
/// # Responses
/// - `200 OK`: `{ "transactions": [ ... ] }`
/// - `400 Bad Request`: `{ "detail": "Access token not found" }`
/// - `500 Internal Server Error`: `{ "detail": "Failed to fetch transactions" }`
#[tracing::instrument(skip_all)]
pub async fn get_transactions(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let access_token = require_access_token(&state).await?;

    tracing::debug!("Fetching transactions");
    let page = state
        .plaid
        .sync_transactions(access_token.as_str())
        .await
        .map_err(|e| ApiError::upstream(ProxyOperation::FetchTransactions, e))?;

    tracing::debug!(
        added = page.added.len(),
        modified = page.modified.len(),
        removed = page.removed.len(),
        has_more = page.has_more,
        "Transactions sync page received"
    );

    Ok(HttpResponse::Ok().json(TransactionsResponse {
        transactions: page.added,
    }))
}

async fn require_access_token(state: &AppState) -> Result<AccessToken, ApiError> {
    state.session.access_token().await.ok_or_else(|| {
        tracing::warn!("Access token requested before any public token exchange");
        ApiError::MissingAccessToken
    })
}
