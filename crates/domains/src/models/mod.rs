//! # Domain Models
//!
//! These structs represent the core entities of Inkwell.
//! We use UUID v7 for time-ordered, globally unique identification.
//! Every value here is immutable: changes produce a new value through a
//! `with_*` constructor and are stored by whole-key replacement.

mod comment;
mod ids;
mod like;
mod post;
mod user;

pub use comment::{Comment, CommentThread, MAX_CONTENT_LENGTH};
pub use ids::{CommentId, LikeId, PostId, UserId};
pub use like::{CommentLike, Like, PostLike, TargetKind};
pub use post::Post;
pub use user::User;
