//! Redis client with connection management, timeouts, and retry.

use std::future::Future;
use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::{Client, ErrorKind, RedisError};
use tracing::{debug, info};

use kg_core::errors::StoreError;
use kg_shared::config::CacheConfig;

/// Redis client wrapping a multiplexed connection.
///
/// Every command runs under the configured response timeout; I/O-class
/// failures are retried a bounded number of times before surfacing as
/// [`StoreError::Unavailable`]. A command never hangs indefinitely.
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
    config: CacheConfig,
}

impl RedisClient {
    /// Connect to Redis with the given configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(RedisClient)` - Connection established
    /// * `Err(StoreError)` - Invalid URL or the server is unreachable
    ///   within the connection timeout
    pub async fn new(config: CacheConfig) -> Result<Self, StoreError> {
        let client = Client::open(config.url.as_str()).map_err(StoreError::unavailable)?;

        let connect = ConnectionManager::new(client);
        let manager = tokio::time::timeout(Duration::from_secs(config.connection_timeout), connect)
            .await
            .map_err(|_| StoreError::unavailable("connection timed out"))?
            .map_err(StoreError::unavailable)?;

        info!(url = %mask_url(&config.url), "connected to Redis");
        Ok(Self { manager, config })
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// SETEX: store a value with an expiry in seconds
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        seconds: u64,
    ) -> Result<(), StoreError> {
        self.run(|mut conn| {
            let key = key.to_string();
            let value = value.to_string();
            async move {
                redis::cmd("SETEX")
                    .arg(key)
                    .arg(seconds)
                    .arg(value)
                    .query_async(&mut conn)
                    .await
            }
        })
        .await
    }

    /// GET: fetch a value, `None` when the key does not exist
    pub async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.run(|mut conn| {
            let key = key.to_string();
            async move { redis::cmd("GET").arg(key).query_async(&mut conn).await }
        })
        .await
    }

    /// DEL: remove a key, reporting whether anything was removed
    pub async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let removed: i64 = self
            .run(|mut conn| {
                let key = key.to_string();
                async move { redis::cmd("DEL").arg(key).query_async(&mut conn).await }
            })
            .await?;
        Ok(removed > 0)
    }

    /// EXISTS: check for a key
    pub async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let count: i64 = self
            .run(|mut conn| {
                let key = key.to_string();
                async move { redis::cmd("EXISTS").arg(key).query_async(&mut conn).await }
            })
            .await?;
        Ok(count > 0)
    }

    /// TTL: seconds a key has left, `None` when it has no expiry or is gone
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>, StoreError> {
        let ttl: i64 = self
            .run(|mut conn| {
                let key = key.to_string();
                async move { redis::cmd("TTL").arg(key).query_async(&mut conn).await }
            })
            .await?;
        Ok((ttl >= 0).then_some(ttl))
    }

    /// PING: check connectivity
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        let pong: String = self
            .run(|mut conn| async move { redis::cmd("PING").query_async(&mut conn).await })
            .await?;
        Ok(pong == "PONG")
    }

    /// Runs a command with response timeout and bounded retry
    async fn run<T, F, Fut>(&self, mut command: F) -> Result<T, StoreError>
    where
        F: FnMut(ConnectionManager) -> Fut,
        Fut: Future<Output = Result<T, RedisError>>,
    {
        let timeout = Duration::from_secs(self.config.response_timeout);
        let mut attempt: u32 = 0;

        loop {
            let outcome = tokio::time::timeout(timeout, command(self.manager.clone())).await;

            let err_text = match outcome {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(err)) if is_retriable_error(&err) => err.to_string(),
                Ok(Err(err)) => return Err(StoreError::unavailable(err)),
                Err(_) => "response timed out".to_string(),
            };

            if attempt >= self.config.max_retries {
                return Err(StoreError::unavailable(err_text));
            }

            attempt += 1;
            debug!(attempt, error = %err_text, "retrying Redis command");
            tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
        }
    }
}

impl std::fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisClient")
            .field("url", &mask_url(&self.config.url))
            .finish()
    }
}

/// Masks credentials in a Redis URL for logging
pub fn mask_url(url: &str) -> String {
    match (url.find("//"), url.find('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}****{}", &url[..scheme_end + 2], &url[at..])
        }
        _ => url.to_string(),
    }
}

/// Whether an error is worth retrying (transient I/O or server busy states)
pub fn is_retriable_error(err: &RedisError) -> bool {
    if err.is_io_error() || err.is_timeout() || err.is_connection_dropped() {
        return true;
    }
    matches!(
        err.kind(),
        ErrorKind::BusyLoadingError | ErrorKind::TryAgain | ErrorKind::MasterDown | ErrorKind::ClusterDown
    )
}
