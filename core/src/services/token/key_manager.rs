//! Signing key management for access token signing and verification.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use ed25519_dalek::pkcs8::EncodePrivateKey;
use ed25519_dalek::SigningKey;
use jsonwebtoken::{DecodingKey, EncodingKey};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::TokenError;

/// Manager for the process-lifetime Ed25519 signing keypair.
///
/// The keypair is generated once at process start and never rotated or
/// persisted, so every token the process signs can be verified by the same
/// process for as long as it runs. A restart regenerates the keypair and
/// invalidates verification of previously issued tokens by any instance
/// that does not share a key source; multi-instance deployments need an
/// external shared key source, which is out of scope here.
pub struct SigningKeyManager {
    /// Private key for signing tokens
    encoding_key: EncodingKey,
    /// Public key for verifying tokens
    decoding_key: DecodingKey,
    /// Key identifier, unique per process run
    key_id: String,
    /// Raw public key, base64url without padding
    public_key: String,
}

impl std::fmt::Debug for SigningKeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeyManager")
            .field("key_id", &self.key_id)
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl SigningKeyManager {
    /// Generates a fresh signing keypair.
    ///
    /// Call exactly once at process start. A failure here is an
    /// unrecoverable startup error: callers should abort rather than retry.
    ///
    /// # Returns
    ///
    /// * `Ok(SigningKeyManager)` - Keypair generated and ready for use
    /// * `Err(TokenError::KeyInitializationFailed)` - Key material could not
    ///   be produced or encoded
    pub fn generate() -> Result<Self, TokenError> {
        let signing_key = SigningKey::generate(&mut OsRng);
        let verifying_key = signing_key.verifying_key();

        let pkcs8 = signing_key
            .to_pkcs8_der()
            .map_err(|e| TokenError::KeyInitializationFailed {
                message: format!("private key encoding failed: {}", e),
            })?;
        let encoding_key = EncodingKey::from_ed_der(pkcs8.as_bytes());

        let public_key = URL_SAFE_NO_PAD.encode(verifying_key.as_bytes());
        let decoding_key = DecodingKey::from_ed_components(&public_key).map_err(|e| {
            TokenError::KeyInitializationFailed {
                message: format!("public key decoding failed: {}", e),
            }
        })?;

        let key_id = Uuid::new_v4().to_string();
        info!(kid = %key_id, "signing keypair initialized");

        Ok(Self {
            encoding_key,
            decoding_key,
            key_id,
            public_key,
        })
    }

    /// Returns the encoding key for signing tokens
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// Returns the decoding key for verifying tokens
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// Returns the key identifier for this process run
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Public key material for external publication (e.g. a key-discovery
    /// endpoint hosted elsewhere)
    pub fn public_key_material(&self) -> PublicKeyMaterial {
        PublicKeyMaterial {
            kty: "OKP".to_string(),
            crv: "Ed25519".to_string(),
            alg: "EdDSA".to_string(),
            kid: self.key_id.clone(),
            x: self.public_key.clone(),
        }
    }
}

/// Published verification key: an Ed25519 public key in JWK field layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyMaterial {
    /// Key type
    pub kty: String,
    /// Curve name
    pub crv: String,
    /// Signature algorithm
    pub alg: String,
    /// Key identifier
    pub kid: String,
    /// Public key bytes, base64url without padding
    pub x: String,
}
