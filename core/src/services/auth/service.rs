//! Authentication flow coordinator.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::entities::token::TokenPair;
use crate::errors::CoreResult;
use crate::services::token::TokenService;
use crate::store::SessionStore;

use super::authenticator::Authenticator;

/// Coordinates credential verification with token issuance.
///
/// This is the API an HTTP layer would call: three operations, each
/// returning a token-pair payload or a typed failure.
pub struct AuthService<A, S>
where
    A: Authenticator,
    S: SessionStore,
{
    /// External credential verifier
    authenticator: Arc<A>,
    /// Token lifecycle service
    tokens: Arc<TokenService<S>>,
}

impl<A, S> AuthService<A, S>
where
    A: Authenticator,
    S: SessionStore,
{
    /// Creates a new authentication service
    pub fn new(authenticator: Arc<A>, tokens: Arc<TokenService<S>>) -> Self {
        Self {
            authenticator,
            tokens,
        }
    }

    /// Verifies credentials and issues a token pair.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Credentials verified, tokens issued
    /// * `Err(CoreError::Auth(InvalidCredentials))` - Verification failed
    pub async fn login(&self, username: &str, password: &str) -> CoreResult<TokenPair> {
        let principal = match self.authenticator.authenticate(username, password).await {
            Ok(principal) => principal,
            Err(err) => {
                warn!(username, "authentication failed");
                return Err(err);
            }
        };

        info!(subject = %principal.subject, "login succeeded");
        self.tokens.issue_token_pair(&principal).await
    }

    /// Exchanges a refresh token for a new pair, rotating it
    pub async fn refresh(&self, refresh_token: &str) -> CoreResult<TokenPair> {
        self.tokens.refresh(refresh_token).await
    }

    /// Revokes the presented access token, best-effort
    pub async fn logout(&self, bearer_token: &str) {
        self.tokens.logout(bearer_token).await;
    }
}
