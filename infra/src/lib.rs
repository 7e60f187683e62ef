//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the KeyGate backend.
//! It provides the Redis-backed session store consumed by `kg_core` for
//! refresh-token mappings and the token denylist.

pub mod cache;

pub use cache::{RedisClient, RedisSessionStore};

use kg_core::errors::StoreError;
use kg_shared::config::CacheConfig;

/// Load session store configuration from the environment.
///
/// Reads a `.env` file when present, then `REDIS_URL` and friends.
pub fn load_config() -> CacheConfig {
    dotenvy::dotenv().ok();
    CacheConfig::from_env()
}

/// Connect a Redis-backed session store with the given configuration
pub async fn connect(config: CacheConfig) -> Result<RedisSessionStore, StoreError> {
    let client = RedisClient::new(config).await?;
    Ok(RedisSessionStore::new(client))
}
