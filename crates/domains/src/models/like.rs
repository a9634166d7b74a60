use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ids::{CommentId, LikeId, PostId, UserId};
use crate::errors::{DomainError, Result};

/// What kind of entity a like points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Post,
    Comment,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Post => "post",
            Self::Comment => "comment",
        })
    }
}

/// One user's endorsement of one target. `T` is the target's id type.
///
/// The pair `(target_id, user_id)` is the record's natural key: at most one
/// like exists per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Like<T> {
    id: LikeId,
    target_id: T,
    user_id: UserId,
    created_at: DateTime<Utc>,
}

pub type PostLike = Like<PostId>;
pub type CommentLike = Like<CommentId>;

impl<T: Copy> Like<T> {
    pub fn new(id: LikeId, target_id: T, user_id: UserId, created_at: DateTime<Utc>) -> Result<Self> {
        if created_at > Utc::now() {
            return Err(DomainError::Validation(
                "like creation date cannot be in the future".into(),
            ));
        }
        Ok(Self {
            id,
            target_id,
            user_id,
            created_at,
        })
    }

    pub fn id(&self) -> LikeId {
        self.id
    }

    pub fn target_id(&self) -> T {
        self.target_id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The natural key the like store is indexed by.
    pub fn key(&self) -> (T, UserId) {
        (self.target_id, self.user_id)
    }
}
