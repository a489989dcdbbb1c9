//! Shared helpers for the endpoint tests: a scripted stand-in for the Plaid
//! client and a helper to build the app around it.

#![allow(dead_code, unused_macros)]

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use credlink_server::{FinancialDataClient, LinkToken, PlaidError, TokenExchange, TransactionsSync};
use serde_json::Value;

/// Internal detail that must never reach a response body.
pub const INTERNAL_ERROR_TEXT: &str = "INTERNAL_SERVER_ERROR: upstream exploded at line 42";

pub fn upstream_failure() -> PlaidError {
    PlaidError::Api {
        status: 500,
        error_type: "API_ERROR".into(),
        error_code: "INTERNAL_SERVER_ERROR".into(),
        error_message: INTERNAL_ERROR_TEXT.into(),
        request_id: Some("req-test".into()),
    }
}

/// Stand-in client. Each operation either succeeds with the configured value
/// or fails when its `fail_*` flag is set. Calls are counted per operation.
#[derive(Default)]
pub struct StubClient {
    pub link_token: String,
    /// Access tokens handed out by successive exchanges; the last one repeats.
    pub access_tokens: Vec<String>,
    pub accounts: Vec<Value>,
    pub sync_page: TransactionsSync,

    pub fail_link: bool,
    pub fail_exchange: bool,
    pub fail_balances: bool,
    pub fail_transactions: bool,

    pub link_calls: AtomicUsize,
    pub exchange_calls: AtomicUsize,
    pub balance_calls: AtomicUsize,
    pub transaction_calls: AtomicUsize,

    /// Access tokens received by balance/transaction calls, in order.
    pub seen_access_tokens: Mutex<Vec<String>>,
}

impl StubClient {
    pub fn new() -> Self {
        Self {
            link_token: "link-sandbox-stub".into(),
            access_tokens: vec!["access-sandbox-stub".into()],
            ..Default::default()
        }
    }

    pub fn total_calls(&self) -> usize {
        self.link_calls.load(Ordering::SeqCst)
            + self.exchange_calls.load(Ordering::SeqCst)
            + self.balance_calls.load(Ordering::SeqCst)
            + self.transaction_calls.load(Ordering::SeqCst)
    }

    pub fn seen_access_tokens(&self) -> Vec<String> {
        self.seen_access_tokens.lock().unwrap().clone()
    }

    fn record_token(&self, access_token: &str) {
        self.seen_access_tokens
            .lock()
            .unwrap()
            .push(access_token.to_string());
    }
}

#[async_trait]
impl FinancialDataClient for StubClient {
    async fn create_link_token(&self, _client_user_id: &str) -> Result<LinkToken, PlaidError> {
        self.link_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_link {
            return Err(upstream_failure());
        }
        Ok(LinkToken {
            link_token: self.link_token.clone(),
            expiration: None,
        })
    }

    async fn exchange_public_token(&self, _public_token: &str) -> Result<TokenExchange, PlaidError> {
        let n = self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_exchange {
            return Err(upstream_failure());
        }
        let idx = n.min(self.access_tokens.len().saturating_sub(1));
        Ok(TokenExchange {
            access_token: self.access_tokens[idx].clone(),
            item_id: Some("item-stub".into()),
        })
    }

    async fn get_balances(&self, access_token: &str) -> Result<Vec<Value>, PlaidError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.record_token(access_token);
        if self.fail_balances {
            return Err(upstream_failure());
        }
        Ok(self.accounts.clone())
    }

    async fn sync_transactions(&self, access_token: &str) -> Result<TransactionsSync, PlaidError> {
        self.transaction_calls.fetch_add(1, Ordering::SeqCst);
        self.record_token(access_token);
        if self.fail_transactions {
            return Err(upstream_failure());
        }
        Ok(self.sync_page.clone())
    }
}

/// Builds the full app around a stand-in client; expands to an awaited
/// `test::init_service` call.
macro_rules! init_app {
    ($client:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(credlink_server::AppState::new(
                    $client,
                )))
                .configure(credlink_server::handlers::configure_routes),
        )
        .await
    };
}
