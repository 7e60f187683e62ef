//! Authentication flow module
//!
//! Wraps external credential verification around the token lifecycle
//! service to provide the login/refresh/logout API.

mod authenticator;
mod service;

#[cfg(test)]
mod tests;

pub use authenticator::Authenticator;
pub use service::AuthService;
