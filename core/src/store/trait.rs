//! Session store trait defining the expiring key-value interface.

use std::time::Duration;

use async_trait::async_trait;

use crate::errors::StoreError;

/// Expiring key-value store used for refresh-token mappings and the token
/// denylist.
///
/// Entries vanish on their own once the TTL elapses. Implementations must
/// report connectivity failures (including timeouts) as
/// [`StoreError::Unavailable`] rather than treating them as "not found".
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store `value` under `key`, expiring after `ttl`.
    ///
    /// Overwrites any existing entry, resetting its TTL.
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Fetch the value under `key`.
    ///
    /// # Returns
    /// * `Ok(Some(value))` - Entry present and not yet expired
    /// * `Ok(None)` - No live entry; expired, deleted, and never-written
    ///   keys are indistinguishable
    /// * `Err(StoreError)` - Store unreachable
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Remove the entry under `key`.
    ///
    /// # Returns
    /// * `Ok(true)` - An entry existed and was removed
    /// * `Ok(false)` - Nothing to remove
    /// * `Err(StoreError)` - Store unreachable
    async fn delete(&self, key: &str) -> Result<bool, StoreError>;

    /// Check whether a live entry exists under `key`.
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;
}
