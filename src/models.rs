//! Shared application state.

use std::sync::Arc;

use crate::{services::FinancialDataClient, session::LinkSession};

/// State shared by all handlers and workers.
///
/// Cloning is cheap; every clone points at the same client and session.
#[derive(Clone)]
pub struct AppState {
    /// Aggregator client used by the proxy endpoints
    pub plaid: Arc<dyn FinancialDataClient>,
    /// Access token from the most recent public-token exchange
    pub session: Arc<LinkSession>,
}

impl AppState {
    /// Creates state around `plaid` with an empty session.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use std::sync::Arc;
    /// use credlink_server::{AppState, PlaidClient, Settings};
    ///
    /// # fn run() -> anyhow::Result<()> {
    /// let settings = Settings::from_env()?;
    /// let _state = AppState::new(Arc::new(PlaidClient::new(&settings.plaid)?));
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(plaid: Arc<dyn FinancialDataClient>) -> Self {
        Self {
            plaid,
            session: Arc::new(LinkSession::new()),
        }
    }
}
