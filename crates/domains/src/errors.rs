//! # DomainError
//!
//! Centralized error handling for the Inkwell engagement core.
//! Every expected outcome of a comment or like operation has its own variant;
//! failures raised by collaborators pass through `Backend` untouched.

use thiserror::Error;

use crate::models::{CommentId, PostId, TargetKind, UserId};

/// The primary error type for all domain and service operations.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("post not found with ID {0}")]
    PostNotFound(PostId),

    #[error("user not found with ID {0}")]
    UserNotFound(UserId),

    #[error("comment not found with ID {0}")]
    CommentNotFound(CommentId),

    /// The like target (post or comment) does not exist.
    #[error("{kind} not found with ID {id}")]
    TargetNotFound { kind: TargetKind, id: String },

    /// The acting user is not the author of the resource.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("conflict: user {user_id} has already liked {kind} {target_id}")]
    DuplicateLike {
        kind: TargetKind,
        target_id: String,
        user_id: UserId,
    },

    /// A reply that breaks the two-level hierarchy or crosses posts.
    #[error("invalid reply: {0}")]
    InvalidReply(String),

    #[error("user {user_id} has not liked {kind} {target_id}")]
    LikeNotFound {
        kind: TargetKind,
        target_id: String,
        user_id: UserId,
    },

    /// Value-level constraint failure (e.g. blank comment, timestamp in the future)
    #[error("validation error: {0}")]
    Validation(String),

    /// Collaborator or storage failure, propagated as-is.
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Coarse error families, for callers that map errors onto a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    Conflict,
    Validation,
    Internal,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PostNotFound(_)
            | Self::UserNotFound(_)
            | Self::CommentNotFound(_)
            | Self::TargetNotFound { .. }
            | Self::LikeNotFound { .. } => ErrorKind::NotFound,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::DuplicateLike { .. } | Self::InvalidReply(_) => ErrorKind::Conflict,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Backend(_) => ErrorKind::Internal,
        }
    }
}

/// A specialized Result type for Inkwell domain logic.
pub type Result<T> = std::result::Result<T, DomainError>;
