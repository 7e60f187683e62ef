//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Token issuance configuration (issuer, lifetimes)
//! - `cache` - Session store (Redis) configuration
//! - `environment` - Environment detection and logging configuration

pub mod auth;
pub mod cache;
pub mod environment;

// Re-export commonly used types
pub use auth::TokenConfig;
pub use cache::CacheConfig;
pub use environment::{Environment, LoggingConfig};
