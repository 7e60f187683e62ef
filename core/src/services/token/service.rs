//! Token lifecycle service: issuance, refresh rotation, and revocation.

use chrono::Utc;
use kg_shared::config::TokenConfig;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::entities::principal::Principal;
use crate::domain::entities::token::{Claims, TokenPair};
use crate::errors::{CoreError, CoreResult, StoreError, TokenError};
use crate::store::SessionStore;

use super::codec::TokenCodec;
use super::key_manager::SigningKeyManager;

/// Store namespace for refresh-token -> subject mappings
pub(crate) const REFRESH_TOKEN_PREFIX: &str = "refresh_token:";

/// Store namespace for revoked token identifiers
pub(crate) const BLACKLIST_PREFIX: &str = "blacklist:";

/// Marker value written under a blacklisted jti
const BLACKLIST_MARKER: &str = "blacklisted";

/// Service managing access and refresh tokens for authenticated principals.
///
/// Access tokens are signed and stateless; their validity is proven by
/// signature, expiry, and absence from the denylist. Refresh tokens are
/// opaque random identifiers whose only server-side state is a
/// `refresh_token:<value> -> subject` entry with the configured TTL.
pub struct TokenService<S: SessionStore> {
    store: S,
    codec: TokenCodec,
    config: TokenConfig,
}

impl<S: SessionStore> TokenService<S> {
    /// Creates a new token service.
    ///
    /// # Arguments
    ///
    /// * `store` - Expiring key-value store for refresh tokens and the denylist
    /// * `keys` - Process signing keypair, held by the caller for its lifetime
    /// * `config` - Issuer and token lifetimes
    pub fn new(store: S, keys: &SigningKeyManager, config: TokenConfig) -> Self {
        let codec = TokenCodec::new(keys, &config);
        Self {
            store,
            codec,
            config,
        }
    }

    /// The codec used for minting and parsing access tokens
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Issues a fresh access + refresh token pair for a principal.
    ///
    /// The refresh token is a random identifier mapped to the principal's
    /// subject with the configured refresh lifetime. No relationship is
    /// recorded between the access token's `jti` and the refresh token.
    pub async fn issue_token_pair(&self, principal: &Principal) -> CoreResult<TokenPair> {
        let minted = self.codec.mint(principal)?;

        let refresh_token = Uuid::new_v4().to_string();
        self.store
            .put(
                &refresh_key(&refresh_token),
                &principal.subject,
                self.config.refresh_ttl(),
            )
            .await?;

        debug!(subject = %principal.subject, "issued token pair");
        Ok(TokenPair::new(
            minted.token,
            refresh_token,
            self.config.access_token_expiry,
        ))
    }

    /// Exchanges a refresh token for a new token pair, rotating it.
    ///
    /// The presented token is single-use: its mapping is deleted once the
    /// replacement is durably stored, so a second presentation fails with
    /// [`TokenError::InvalidRefreshToken`]. An expired, revoked, or
    /// never-issued token is indistinguishable from the caller's side.
    ///
    /// The reconstructed principal carries only the subject; granted
    /// authorities are not recoverable from the refresh-token mapping, so
    /// access tokens minted here have an empty scope claim.
    pub async fn refresh(&self, refresh_token: &str) -> CoreResult<TokenPair> {
        let old_key = refresh_key(refresh_token);

        let subject = self
            .store
            .get(&old_key)
            .await?
            .ok_or(TokenError::InvalidRefreshToken)?;

        let principal = Principal::from_subject(subject);
        let minted = self.codec.mint(&principal)?;

        let new_refresh = Uuid::new_v4().to_string();
        self.store
            .put(
                &refresh_key(&new_refresh),
                &principal.subject,
                self.config.refresh_ttl(),
            )
            .await?;

        // Rotation order: the old mapping goes away only after the new one
        // is stored, so there is no window where neither token is valid.
        self.store.delete(&old_key).await?;

        debug!(subject = %principal.subject, "rotated refresh token");
        Ok(TokenPair::new(
            minted.token,
            new_refresh,
            self.config.access_token_expiry,
        ))
    }

    /// Revokes an access token by blacklisting its identity.
    ///
    /// Best-effort: a malformed token or a store failure is logged and
    /// swallowed, never surfaced, so a client can always consider itself
    /// logged out. The denylist entry lives exactly as long as the token
    /// would have; an already-expired token needs no entry at all.
    pub async fn logout(&self, access_token: &str) {
        let claims = match self.codec.peek(access_token) {
            Ok(claims) => claims,
            Err(err) => {
                warn!(%err, "logout with unparseable token, nothing to revoke");
                return;
            }
        };

        let remaining = claims.remaining_lifetime(Utc::now());
        if remaining <= chrono::Duration::zero() {
            debug!(jti = %claims.jti, "logout with expired token, nothing to revoke");
            return;
        }

        let ttl = remaining.to_std().unwrap_or_default();
        if let Err(err) = self
            .store
            .put(&blacklist_key(&claims.jti), BLACKLIST_MARKER, ttl)
            .await
        {
            warn!(jti = %claims.jti, %err, "failed to blacklist token on logout");
        }
    }

    /// Checks whether a token's identity is on the denylist.
    ///
    /// A token that does not parse has no `jti` and is reported as not
    /// revoked; this check alone says nothing about validity, which still
    /// requires the signature and expiry checks.
    pub async fn is_revoked(&self, access_token: &str) -> Result<bool, StoreError> {
        match self.codec.peek(access_token) {
            Ok(claims) => self.is_jti_revoked(&claims.jti).await,
            Err(_) => Ok(false),
        }
    }

    /// Verifies an access token and returns its claims.
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - Signature and expiry check out and the token is not
    ///   revoked
    /// * `Err(CoreError::Token(..))` - Invalid for any token-shaped reason
    /// * `Err(CoreError::Store(..))` - The denylist could not be consulted
    pub async fn verify(&self, access_token: &str) -> CoreResult<Claims> {
        let claims = self.codec.verify(access_token)?;

        if self.is_jti_revoked(&claims.jti).await? {
            return Err(TokenError::TokenRevoked.into());
        }

        Ok(claims)
    }

    /// Boolean validity check, failing closed.
    ///
    /// Any token-level failure is `Ok(false)`. Store unavailability is the
    /// one condition surfaced as an error, so callers can distinguish
    /// "token invalid" from "cannot currently verify".
    pub async fn validate(&self, access_token: &str) -> CoreResult<bool> {
        match self.verify(access_token).await {
            Ok(_) => Ok(true),
            Err(CoreError::Store(err)) => Err(CoreError::Store(err)),
            Err(_) => Ok(false),
        }
    }

    /// Explicitly revokes a refresh token.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The mapping existed and was removed
    /// * `Ok(false)` - No live mapping for this token
    pub async fn revoke_refresh_token(&self, refresh_token: &str) -> Result<bool, StoreError> {
        self.store.delete(&refresh_key(refresh_token)).await
    }

    async fn is_jti_revoked(&self, jti: &str) -> Result<bool, StoreError> {
        self.store.exists(&blacklist_key(jti)).await
    }
}

fn refresh_key(token: &str) -> String {
    format!("{}{}", REFRESH_TOKEN_PREFIX, token)
}

fn blacklist_key(jti: &str) -> String {
    format!("{}{}", BLACKLIST_PREFIX, jti)
}
