//! Plaid API client used by the financial-data proxy.
//!
//! [`FinancialDataClient`] exposes only the four operations the proxy needs,
//! so handlers can be exercised against a stand-in without touching the
//! network. [`PlaidClient`] is the production implementation over the Plaid
//! REST API.
//!
//! # Examples
//!
//! ```rust,no_run
//! use credlink_server::{FinancialDataClient, PlaidClient, Settings};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let settings = Settings::from_env()?;
//! let client = PlaidClient::new(&settings.plaid)?;
//! let link = client.create_link_token("user-123").await?;
//! println!("link token: {}", link.link_token);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;

use crate::config::PlaidSettings;

/// API version every request is pinned to.
const PLAID_VERSION: &str = "2020-09-14";

/// Errors returned by a [`FinancialDataClient`].
#[derive(Debug, Error)]
pub enum PlaidError {
    #[error("request to Plaid failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to parse Plaid response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Plaid error {status} {error_type}/{error_code}: {error_message}")]
    Api {
        status: u16,
        error_type: String,
        error_code: String,
        error_message: String,
        request_id: Option<String>,
    },

    #[error("unexpected Plaid response {status}: {body}")]
    Unexpected { status: u16, body: String },
}

/// Error body Plaid returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct PlaidErrorResponse {
    error_type: String,
    error_code: String,
    error_message: String,
    #[serde(default)]
    request_id: Option<String>,
}

/// Result of `/link/token/create`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkToken {
    pub link_token: String,
    #[serde(default)]
    pub expiration: Option<String>,
}

/// Result of `/item/public_token/exchange`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenExchange {
    pub access_token: String,
    #[serde(default)]
    pub item_id: Option<String>,
}

/// One page of `/transactions/sync`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TransactionsSync {
    #[serde(default)]
    pub added: Vec<Value>,
    #[serde(default)]
    pub modified: Vec<Value>,
    #[serde(default)]
    pub removed: Vec<Value>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    accounts: Vec<Value>,
}

/// The aggregator operations the proxy forwards.
#[async_trait]
pub trait FinancialDataClient: Send + Sync {
    /// Creates a link token for `client_user_id`, scoped to transactions, en/US.
    async fn create_link_token(&self, client_user_id: &str) -> Result<LinkToken, PlaidError>;

    /// Exchanges a public token from a finished link flow for an access token.
    async fn exchange_public_token(&self, public_token: &str) -> Result<TokenExchange, PlaidError>;

    /// Returns the item's accounts with real-time balances, untouched.
    async fn get_balances(&self, access_token: &str) -> Result<Vec<Value>, PlaidError>;

    /// Fetches a single page of transaction updates, starting from no cursor.
    async fn sync_transactions(&self, access_token: &str) -> Result<TransactionsSync, PlaidError>;
}

/// Plaid REST client.
///
/// Credentials travel in the `PLAID-CLIENT-ID` and `PLAID-SECRET` headers.
/// No retries are attempted and reqwest's default timeouts apply.
#[derive(Clone)]
pub struct PlaidClient {
    http: Client,
    base_url: String,
    client_id: String,
    secret: String,
    client_name: String,
}

impl PlaidClient {
    /// Builds a client for the environment selected in `settings`.
    pub fn new(settings: &PlaidSettings) -> Result<Self, PlaidError> {
        Self::with_base_url(settings, settings.environment.base_url())
    }

    /// Builds a client that talks to `base_url` instead of a Plaid host.
    pub fn with_base_url(
        settings: &PlaidSettings,
        base_url: impl Into<String>,
    ) -> Result<Self, PlaidError> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_id: settings.client_id.clone(),
            secret: settings.secret.clone(),
            client_name: settings.client_name.clone(),
        })
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, PlaidError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let res = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header("PLAID-CLIENT-ID", &self.client_id)
            .header("PLAID-SECRET", &self.secret)
            .header("Plaid-Version", PLAID_VERSION)
            .json(body)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        match serde_json::from_str::<PlaidErrorResponse>(&body) {
            Ok(e) => Err(PlaidError::Api {
                status: status.as_u16(),
                error_type: e.error_type,
                error_code: e.error_code,
                error_message: e.error_message,
                request_id: e.request_id,
            }),
            Err(_) => Err(PlaidError::Unexpected {
                status: status.as_u16(),
                body,
            }),
        }
    }
}

#[async_trait]
impl FinancialDataClient for PlaidClient {
    #[tracing::instrument(skip(self))]
    async fn create_link_token(&self, client_user_id: &str) -> Result<LinkToken, PlaidError> {
        let body = serde_json::json!({
            "client_name": self.client_name,
            "country_codes": ["US"],
            "language": "en",
            "user": { "client_user_id": client_user_id },
            "products": ["transactions"],
        });
        self.post("/link/token/create", &body).await
    }

    #[tracing::instrument(skip_all)]
    async fn exchange_public_token(&self, public_token: &str) -> Result<TokenExchange, PlaidError> {
        let body = serde_json::json!({ "public_token": public_token });
        self.post("/item/public_token/exchange", &body).await
    }

    #[tracing::instrument(skip_all)]
    async fn get_balances(&self, access_token: &str) -> Result<Vec<Value>, PlaidError> {
        let body = serde_json::json!({ "access_token": access_token });
        let res: BalanceResponse = self.post("/accounts/balance/get", &body).await?;
        Ok(res.accounts)
    }

    #[tracing::instrument(skip_all)]
    async fn sync_transactions(&self, access_token: &str) -> Result<TransactionsSync, PlaidError> {
        let body = serde_json::json!({ "access_token": access_token });
        let page: TransactionsSync = self.post("/transactions/sync", &body).await?;
        if page.has_more {
            tracing::debug!(
                added = page.added.len(),
                "Transactions sync reported more pages; only the first is fetched"
            );
        }
        Ok(page)
    }
}
