use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::{PostId, UserId};

/// The slice of a blog post the engagement core needs.
///
/// Posts are owned by the post collaborator; the core only reads them and
/// moves `like_count`, a cached projection of the post's like records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub author_id: UserId,
    /// Cached count of like records; the like store is authoritative
    pub like_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(id: PostId, title: impl Into<String>, author_id: UserId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: title.into(),
            author_id,
            like_count: 0,
            created_at,
            updated_at: created_at,
        }
    }

    /// Returns a copy with the cached counter replaced.
    pub fn with_like_count(&self, like_count: u64) -> Self {
        Self {
            like_count,
            ..self.clone()
        }
    }
}
