//! Authenticated principal entity.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// An authenticated principal as supplied by an external authenticator.
///
/// A principal is immutable per token issuance. The authorities are kept in
/// an ordered set so the comma-joined scope claim is deterministic for a
/// given principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Unique subject identifier (username)
    pub subject: String,

    /// Granted authorities (role strings)
    pub authorities: BTreeSet<String>,
}

impl Principal {
    /// Creates a principal with subject and authorities
    pub fn new(
        subject: impl Into<String>,
        authorities: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            subject: subject.into(),
            authorities: authorities.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a principal carrying only a subject.
    ///
    /// This is the shape reconstructed from a refresh-token lookup, where
    /// the granted authorities are not recoverable from the store. Access
    /// tokens minted for such a principal carry an empty scope claim.
    pub fn from_subject(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            authorities: BTreeSet::new(),
        }
    }

    /// The scope claim value: authorities joined by comma
    pub fn scope(&self) -> String {
        self.authorities
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}
