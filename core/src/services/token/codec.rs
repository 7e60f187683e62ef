//! Codec for building and parsing signed access tokens.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use kg_shared::config::TokenConfig;

use crate::domain::entities::principal::Principal;
use crate::domain::entities::token::Claims;
use crate::errors::TokenError;

use super::key_manager::SigningKeyManager;

/// A freshly minted access token together with its decoded claims
#[derive(Debug, Clone)]
pub struct MintedToken {
    /// Compact serialized token string
    pub token: String,
    /// The claims that were signed into it
    pub claims: Claims,
}

/// Builds and parses signed access tokens.
///
/// The codec holds copies of the process signing keys, injected explicitly
/// from the [`SigningKeyManager`] at construction. Verification fails closed:
/// any parse error, signature mismatch, or expired timestamp comes back as a
/// [`TokenError`] value, never a panic.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    key_id: String,
    issuer: String,
    access_ttl: Duration,
    validation: Validation,
    peek_validation: Validation,
}

impl TokenCodec {
    /// Creates a codec bound to the given keypair and token configuration
    pub fn new(keys: &SigningKeyManager, config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_exp = true;
        // Expiry is checked to the second; the default leeway would keep
        // short-lived tokens alive past their exp claim.
        validation.leeway = 0;

        // Signature-only validation for paths that need the claims of an
        // already-expired token (logout, revocation lookup).
        let mut peek_validation = Validation::new(Algorithm::EdDSA);
        peek_validation.set_required_spec_claims::<&str>(&[]);
        peek_validation.validate_exp = false;
        peek_validation.leeway = 0;

        Self {
            encoding_key: keys.encoding_key().clone(),
            decoding_key: keys.decoding_key().clone(),
            key_id: keys.key_id().to_string(),
            issuer: config.issuer.clone(),
            access_ttl: config.access_ttl(),
            validation,
            peek_validation,
        }
    }

    /// Mints an access token for a principal with the configured lifetime.
    ///
    /// Two calls with identical inputs produce distinct tokens: the `jti`
    /// claim is a fresh random identifier each time.
    pub fn mint(&self, principal: &Principal) -> Result<MintedToken, TokenError> {
        self.mint_at(principal, Utc::now())
    }

    /// Mints an access token with an explicit issue time
    pub(crate) fn mint_at(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<MintedToken, TokenError> {
        let claims = Claims::new(principal, &self.issuer, now, self.access_ttl);

        let mut header = Header::new(Algorithm::EdDSA);
        header.kid = Some(self.key_id.clone());

        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|_| TokenError::TokenGenerationFailed)?;

        Ok(MintedToken { token, claims })
    }

    /// Verifies signature, structure, issuer, and expiry.
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if the token is valid
    /// * `Err(TokenError)` - Expired, bad signature, or malformed
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(map_decode_error)
    }

    /// Decodes a token checking only its signature, ignoring expiry.
    ///
    /// Logout and revocation lookups need the `jti` and `exp` of tokens
    /// that may already be past their lifetime.
    pub fn peek(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.peek_validation)
            .map(|data| data.claims)
            .map_err(map_decode_error)
    }

    /// Lifetime the token has left at `now`; zero or negative once expired
    pub fn expiry_remaining(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Duration, TokenError> {
        let claims = self.peek(token)?;
        Ok(claims.remaining_lifetime(now))
    }
}

fn map_decode_error(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::TokenExpired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::TokenMalformed,
    }
}
