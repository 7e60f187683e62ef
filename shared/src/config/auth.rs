//! Token issuance configuration

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Configuration for signed access tokens and opaque refresh tokens
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Issuer claim stamped into every access token
    pub issuer: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            issuer: String::from("keygate"),
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
        }
    }
}

impl TokenConfig {
    /// Create a new token configuration with an issuer
    pub fn new(issuer: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in seconds
    pub fn with_access_expiry_seconds(mut self, seconds: i64) -> Self {
        self.access_token_expiry = seconds;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Access token lifetime as a `chrono::Duration`
    pub fn access_ttl(&self) -> Duration {
        Duration::seconds(self.access_token_expiry)
    }

    /// Refresh token lifetime as a `std::time::Duration` for store TTLs
    pub fn refresh_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.refresh_token_expiry.max(0) as u64)
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let issuer = std::env::var("TOKEN_ISSUER").unwrap_or_else(|_| "keygate".to_string());
        let access_token_expiry = std::env::var("ACCESS_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "900".to_string())
            .parse()
            .unwrap_or(900);
        let refresh_token_expiry = std::env::var("REFRESH_TOKEN_EXPIRY")
            .unwrap_or_else(|_| "604800".to_string())
            .parse()
            .unwrap_or(604800);

        Self {
            issuer,
            access_token_expiry,
            refresh_token_expiry,
        }
    }
}
