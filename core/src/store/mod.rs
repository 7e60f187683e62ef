//! Session store port for refresh-token mappings and denylist entries.
//!
//! The store is an expiring key-value abstraction: TTL enforcement belongs
//! to the store itself, and the core never runs its own sweep logic.

mod memory;
mod r#trait;

#[cfg(test)]
mod tests;

pub use memory::MemorySessionStore;
pub use r#trait::SessionStore;
