use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::{CommentId, PostId, UserId};
use crate::errors::{DomainError, Result};

/// Upper bound on comment content, counted in UTF-16 code units.
pub const MAX_CONTENT_LENGTH: usize = 1000;

/// A comment on a post, either a root comment or a reply to one.
///
/// Fields are private so the hierarchy rules checked by [`Comment::root`] and
/// [`Comment::reply`] cannot be bypassed. A comment never changes between the
/// root and reply states after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    id: CommentId,
    content: String,
    author_id: UserId,
    post_id: PostId,
    /// `None` for root comments
    parent_comment_id: Option<CommentId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Comment {
    /// Builds a root comment attached directly to `post_id`.
    pub fn root(
        id: CommentId,
        content: impl Into<String>,
        author_id: UserId,
        post_id: PostId,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let content = content.into();
        validate_content(&content)?;
        Ok(Self {
            id,
            content,
            author_id,
            post_id,
            parent_comment_id: None,
            created_at,
            updated_at: created_at,
        })
    }

    /// Builds a reply to `parent`.
    ///
    /// Fails with [`DomainError::InvalidReply`] when the parent is itself a
    /// reply or belongs to a different post.
    pub fn reply(
        id: CommentId,
        content: impl Into<String>,
        author_id: UserId,
        post_id: PostId,
        parent: &Comment,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        if parent.is_reply() {
            return Err(DomainError::InvalidReply(format!(
                "comment {} is already a reply; only one level of replies is allowed",
                parent.id
            )));
        }
        if parent.post_id != post_id {
            return Err(DomainError::InvalidReply(format!(
                "parent comment {} belongs to post {}, not {}",
                parent.id, parent.post_id, post_id
            )));
        }

        let content = content.into();
        validate_content(&content)?;
        Ok(Self {
            id,
            content,
            author_id,
            post_id,
            parent_comment_id: Some(parent.id),
            created_at,
            updated_at: created_at,
        })
    }

    /// Returns a copy carrying `new_content` and a refreshed update timestamp.
    pub fn with_content(&self, new_content: impl Into<String>, updated_at: DateTime<Utc>) -> Result<Self> {
        let content = new_content.into();
        validate_content(&content)?;
        Ok(Self {
            content,
            updated_at,
            ..self.clone()
        })
    }

    pub fn id(&self) -> CommentId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    pub fn parent_comment_id(&self) -> Option<CommentId> {
        self.parent_comment_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_root(&self) -> bool {
        self.parent_comment_id.is_none()
    }

    pub fn is_reply(&self) -> bool {
        self.parent_comment_id.is_some()
    }

    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.author_id == user_id
    }
}

/// A root comment together with its replies, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentThread {
    pub comment: Comment,
    pub replies: Vec<Comment>,
}

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(DomainError::Validation("comment content cannot be blank".into()));
    }
    let units = content.encode_utf16().count();
    if units > MAX_CONTENT_LENGTH {
        return Err(DomainError::Validation(format!(
            "comment content cannot exceed {MAX_CONTENT_LENGTH} characters (got {units})"
        )));
    }
    Ok(())
}
