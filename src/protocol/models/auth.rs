use serde::{Deserialize, Serialize};
use url::Url;

use crate::Result;

/// Credentials for joining a room. Passed to the call session as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthBundle {
    pub room_url: Url,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl AuthBundle {
    /// # Errors
    /// Returns an error if `room_url` is not a valid URL.
    pub fn new(room_url: &str) -> Result<Self> {
        Ok(Self {
            room_url: Url::parse(room_url)?,
            token: None,
        })
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}
