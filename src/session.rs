//! Holder for the access token obtained from a completed bank-linking flow.
//!
//! The server is single-tenant: one [`LinkSession`] lives in the shared
//! application state and every handler sees the same token. A successful
//! public-token exchange overwrites whatever was stored before
//! (last write wins). Nothing is persisted; a restart clears the session.

use serde::Serialize;
use tokio::sync::RwLock;

/// Durable credential used to query balances and transactions for a linked item.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Process-wide link state: `NoToken` until the first successful exchange,
/// `HasToken` afterwards.
#[derive(Debug, Default)]
pub struct LinkSession {
    access_token: RwLock<Option<AccessToken>>,
}

impl LinkSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored token unconditionally.
    pub async fn store(&self, token: AccessToken) {
        let mut slot = self.access_token.write().await;
        if slot.is_some() {
            tracing::debug!("Replacing previously stored access token");
        }
        *slot = Some(token);
    }

    /// Returns a copy of the current token, if any.
    pub async fn access_token(&self) -> Option<AccessToken> {
        self.access_token.read().await.clone()
    }

    pub async fn is_linked(&self) -> bool {
        self.access_token.read().await.is_some()
    }
}
