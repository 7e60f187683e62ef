//! # KeyGate Core
//!
//! Core token issuance and lifecycle logic for the KeyGate backend.
//! This crate contains the domain entities, the session-store port, the
//! token codec and key material manager, and the services that orchestrate
//! issuance, refresh rotation, and revocation.

pub mod domain;
pub mod errors;
pub mod services;
pub mod store;

// Re-export commonly used types for convenience
pub use domain::entities::{Claims, Principal, TokenPair};
pub use errors::{AuthError, CoreError, CoreResult, StoreError, TokenError};
pub use services::{
    AuthService, Authenticator, MintedToken, PublicKeyMaterial, SigningKeyManager, TokenCodec,
    TokenService,
};
pub use store::{MemorySessionStore, SessionStore};
