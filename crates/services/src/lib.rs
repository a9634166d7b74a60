//! # services
//!
//! Application services for comment threads and likes. Each operation checks
//! its preconditions against the collaborator ports, then reads and writes the
//! stores one key at a time. Expected outcomes come back as
//! [`domains::DomainError`] variants; collaborator failures pass through as
//! `DomainError::Backend`.

pub mod comment_service;
pub mod like_service;
pub mod like_targets;

pub use comment_service::CommentService;
pub use like_service::{CommentLikeService, LikeService, PostLikeService};
pub use like_targets::{CommentTargets, PostTargets};
