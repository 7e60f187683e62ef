//! Shared utilities and common types for KeyGate server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Environment detection and logging configuration

pub mod config;

// Re-export commonly used items at crate root
pub use config::{CacheConfig, Environment, LoggingConfig, TokenConfig};
