//! Credential verification port.

use async_trait::async_trait;

use crate::domain::entities::principal::Principal;
use crate::errors::CoreResult;

/// External credential verifier.
///
/// Implementations check a username/password pair against whatever identity
/// backend they wrap and return the authenticated principal with its
/// granted authorities. Failed verification is
/// [`AuthError::InvalidCredentials`](crate::errors::AuthError::InvalidCredentials).
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Verify credentials and return the authenticated principal
    async fn authenticate(&self, username: &str, password: &str) -> CoreResult<Principal>;
}
