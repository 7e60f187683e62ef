//! Redis-backed session store implementation.

use std::time::Duration;

use async_trait::async_trait;

use kg_core::errors::StoreError;
use kg_core::store::SessionStore;

use super::redis_client::RedisClient;

/// [`SessionStore`] backed by Redis.
///
/// TTL enforcement is native: entries are written with SETEX and vanish at
/// expiry without any sweep logic on this side. An optional key prefix from
/// the cache configuration is applied to every key, so several deployments
/// can share one Redis database.
#[derive(Clone, Debug)]
pub struct RedisSessionStore {
    client: RedisClient,
}

impl RedisSessionStore {
    /// Creates a session store over an established Redis client
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// The underlying client, e.g. for health checks
    pub fn client(&self) -> &RedisClient {
        &self.client
    }

    fn storage_key(&self, key: &str) -> String {
        self.client.config().make_key(key)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
        // SETEX rejects a zero expiry; sub-second TTLs round up to one second
        let seconds = ttl.as_secs().max(1);
        self.client
            .set_with_expiry(&self.storage_key(key), value, seconds)
            .await
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.client.get(&self.storage_key(key)).await
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        self.client.delete(&self.storage_key(key)).await
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.client.exists(&self.storage_key(key)).await
    }
}
