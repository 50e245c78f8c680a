//! User profile model.

use serde::{Deserialize, Serialize};

use super::ProfileId;

/// A community member who submits runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,

    pub username: String,

    /// ISO country code, if the user set one.
    pub country: Option<String>,

    /// Avatar image URL, if the user uploaded one.
    pub avatar: Option<String>,
}

impl Profile {
    pub fn new(id: ProfileId, username: String) -> Self {
        Self {
            id,
            username,
            country: None,
            avatar: None,
        }
    }

    /// Builder method to set the country code.
    pub fn with_country(mut self, country: String) -> Self {
        self.country = Some(country);
        self
    }

    /// Builder method to set the avatar URL.
    pub fn with_avatar(mut self, avatar: String) -> Self {
        self.avatar = Some(avatar);
        self
    }
}
