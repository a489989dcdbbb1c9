//! Runtime configuration for the credlink backend.
//!
//! All settings come from environment variables (a `.env` file is loaded by
//! `main` before this runs). Plaid credentials are mandatory: the server
//! refuses to start without them.

use std::env;

use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CLIENT_NAME: &str = "Credlink";

/// Errors raised while reading configuration at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),

    #[error("APP_PORT is not a valid port: {0}")]
    InvalidPort(String),
}

/// Plaid deployment tier the server talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaidEnvironment {
    #[default]
    Sandbox,
    /// Plaid retired the development host; requests go to sandbox.
    Development,
    Production,
}

impl PlaidEnvironment {
    /// Parses `PLAID_ENV`, falling back to sandbox for unknown values.
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "sandbox" => Self::Sandbox,
            "development" => Self::Development,
            "production" => Self::Production,
            other => {
                tracing::warn!(plaid_env = %other, "Unrecognised PLAID_ENV, using sandbox");
                Self::Sandbox
            }
        }
    }

    /// Base URL of the Plaid API for this tier.
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Sandbox | Self::Development => "https://sandbox.plaid.com",
            Self::Production => "https://production.plaid.com",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

/// Credentials and options for the Plaid client.
#[derive(Clone)]
pub struct PlaidSettings {
    pub client_id: String,
    pub secret: String,
    pub environment: PlaidEnvironment,
    /// Name shown to end users in the bank-linking flow
    pub client_name: String,
}

// Keeps the secret out of logs.
impl std::fmt::Debug for PlaidSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaidSettings")
            .field("client_id", &self.client_id)
            .field("secret", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("client_name", &self.client_name)
            .finish()
    }
}

/// Address the HTTP server binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Complete application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub plaid: PlaidSettings,
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `PLAID_CLIENT_ID`, `PLAID_SECRET`: required, non-empty
    /// - `PLAID_ENV`: `sandbox` (default), `development` or `production`
    /// - `PLAID_CLIENT_NAME`: defaults to `Credlink`
    /// - `APP_HOST` / `APP_PORT`: default to `127.0.0.1:8080`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] when a credential is absent or
    /// empty, and [`ConfigError::InvalidPort`] when `APP_PORT` is not a u16.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Settings::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_id =
            non_empty("PLAID_CLIENT_ID").ok_or(ConfigError::MissingVar("PLAID_CLIENT_ID"))?;
        let secret = non_empty("PLAID_SECRET").ok_or(ConfigError::MissingVar("PLAID_SECRET"))?;
        let environment = non_empty("PLAID_ENV")
            .map(|v| PlaidEnvironment::parse_lossy(&v))
            .unwrap_or_default();
        let client_name =
            non_empty("PLAID_CLIENT_NAME").unwrap_or_else(|| DEFAULT_CLIENT_NAME.to_string());

        let host = non_empty("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match non_empty("APP_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            server: ServerSettings { host, port },
            plaid: PlaidSettings {
                client_id,
                secret,
                environment,
                client_name,
            },
        })
    }
}
