//! Token entities for signed access tokens.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::principal::Principal;

/// Token type reported alongside every issued pair
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Claims structure for the signed access token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (principal identifier)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Issued at timestamp (seconds)
    pub iat: i64,

    /// Expiration timestamp (seconds)
    pub exp: i64,

    /// Unique token identifier, used as the denylist key
    pub jti: String,

    /// Granted authorities joined by comma
    pub scope: String,
}

impl Claims {
    /// Creates claims for an access token minted at `now` with lifetime `ttl`.
    ///
    /// The `jti` is a fresh UUID, so two tokens minted for the same principal
    /// at the same instant are still distinct.
    pub fn new(principal: &Principal, issuer: &str, now: DateTime<Utc>, ttl: Duration) -> Self {
        let expiry = now + ttl;

        Self {
            sub: principal.subject.clone(),
            iss: issuer.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            jti: Uuid::new_v4().to_string(),
            scope: principal.scope(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Lifetime remaining at `now`; zero or negative once expired
    pub fn remaining_lifetime(&self, now: DateTime<Utc>) -> Duration {
        Duration::seconds(self.exp - now.timestamp())
    }

    /// The authorities carried in the scope claim
    pub fn authorities(&self) -> Vec<String> {
        if self.scope.is_empty() {
            return Vec::new();
        }
        self.scope.split(',').map(str::to_string).collect()
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// Opaque refresh token
    pub refresh_token: String,

    /// Token type ("Bearer")
    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Access token expiry time in seconds
    pub expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair with the standard bearer token type
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: default_token_type(),
            expires_in,
        }
    }
}

fn default_token_type() -> String {
    TOKEN_TYPE_BEARER.to_string()
}
