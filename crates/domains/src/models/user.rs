use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::UserId;

/// A registered author or reader, as seen by the engagement core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            display_name: display_name.into(),
            created_at: Utc::now(),
        }
    }
}
