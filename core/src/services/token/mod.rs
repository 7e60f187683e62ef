//! Token service module for access and refresh token management
//!
//! This module handles all token-related operations including:
//! - Signing keypair generation and public key publication
//! - Access token minting and verification
//! - Refresh token issuance and single-use rotation
//! - Logout blacklisting keyed by token identity

mod codec;
mod key_manager;
mod service;

#[cfg(test)]
mod tests;

pub use codec::{MintedToken, TokenCodec};
pub use key_manager::{PublicKeyMaterial, SigningKeyManager};
pub use service::TokenService;
