//! Session identity
//!
//! An opaque identifier for the authenticated user, or absent for anonymous
//! sessions. The binders compare identities by value to decide whether a
//! client needs re-initialization, so equality here is the change-detection
//! contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque user identity driving analytics and monitoring sessions.
///
/// `SessionIdentity::anonymous()` is a real value, distinct from "never
/// reconciled": an anonymous session still initializes the clients once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct SessionIdentity(Option<String>);

impl SessionIdentity {
    /// Identity for an authenticated user.
    pub fn user(id: impl Into<String>) -> Self {
        Self(Some(id.into()))
    }

    /// Identity for an unauthenticated session.
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn is_anonymous(&self) -> bool {
        self.0.is_none()
    }

    /// The raw identifier, if any, for handing to collaborator clients.
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl From<Option<String>> for SessionIdentity {
    fn from(id: Option<String>) -> Self {
        Self(id)
    }
}

impl fmt::Display for SessionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(id) => f.write_str(id),
            None => f.write_str("<anonymous>"),
        }
    }
}
