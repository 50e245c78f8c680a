//! Deterministic entity IDs derived from content hashes.
//!
//! Submissions imported from upstream dumps carry no stable primary key, so
//! IDs are derived from the identifying fields instead. Re-importing the same
//! dump yields the same IDs, which makes moderation and dedup idempotent.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// An opaque entity identifier.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    /// Wrap an existing identifier string.
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Derive an ID from identifying fields. SHA256 over the fields joined
    /// with `|`, truncated to 16 hex characters.
    pub fn derive(fields: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(field.as_bytes());
        }
        let digest = hex::encode(hasher.finalize());
        Self(digest[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Type alias for user profile IDs
pub type ProfileId = EntityId;

/// Type alias for level IDs
pub type LevelId = EntityId;

/// Type alias for category IDs
pub type CategoryId = EntityId;

/// Type alias for submission IDs
pub type SubmissionId = EntityId;
