//! Typed identifiers for domain entities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::errors::{DomainError, ErrorCode};

/// Identifier for a user.
///
/// Users are keyed by a slug derived from the name extracted from their
/// assessment report, so re-uploading a report maps back to the same user.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user id from a raw string.
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::validation("user_id", "User id cannot be empty"));
        }
        Ok(Self(id))
    }

    /// Derives a user id from a display name: `"Amyn P"` -> `"user_amyn_p"`.
    pub fn from_name(name: &str) -> Self {
        let slug = name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase();
        Self(format!("user_{}", slug))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident, $code:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|_| DomainError::new($code, format!("Invalid id: {}", s)))
            }
        }
    };
}

uuid_id!(
    /// Identifier for a stored strengths assessment.
    AssessmentId,
    ErrorCode::AssessmentNotFound
);

uuid_id!(
    /// Identifier for a coaching chat session.
    SessionId,
    ErrorCode::SessionNotFound
);

uuid_id!(
    /// Identifier for a single chat message.
    MessageId,
    ErrorCode::ValidationFailed
);
