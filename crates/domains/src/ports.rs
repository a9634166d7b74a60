//! # Core Traits (Ports)
//!
//! Storage and collaborator contracts consumed by the services. Any backend
//! (the in-memory adapters, or a durable store later) must implement these.
//!
//! Every store guarantees atomic single-key operations only. Nothing here
//! promises atomicity across keys or across stores; the services are written
//! against that.

use std::fmt;
use std::hash::Hash;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use crate::models::{Comment, CommentId, Like, Post, PostId, TargetKind, User, UserId};

/// Persistence contract for comments and replies.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait CommentRepository: Send + Sync {
    /// Stores a comment under its id.
    fn insert(&self, comment: Comment) -> anyhow::Result<()>;

    fn get(&self, id: CommentId) -> anyhow::Result<Option<Comment>>;

    /// Replaces an existing comment. Returns `false`, storing nothing, when the
    /// id is no longer present.
    fn replace(&self, comment: Comment) -> anyhow::Result<bool>;

    fn remove(&self, id: CommentId) -> anyhow::Result<Option<Comment>>;

    /// All comments of a post, roots and replies, in insertion order.
    fn list_by_post(&self, post_id: PostId) -> anyhow::Result<Vec<Comment>>;

    /// Replies whose parent is `parent_id`, in insertion order.
    fn list_replies(&self, parent_id: CommentId) -> anyhow::Result<Vec<Comment>>;

    fn count_by_post(&self, post_id: PostId) -> anyhow::Result<u64>;
}

/// Persistence contract for like records on targets identified by `T`.
///
/// Records are keyed by `(target, user)`; `insert_if_absent` is the only way
/// in, which makes the store itself the uniqueness gate.
pub trait LikeRepository<T>: Send + Sync {
    /// Inserts `like` unless a record for its `(target, user)` pair exists.
    /// Returns whether the insert happened.
    fn insert_if_absent(&self, like: Like<T>) -> anyhow::Result<bool>;

    fn find(&self, target_id: T, user_id: UserId) -> anyhow::Result<Option<Like<T>>>;

    fn remove(&self, target_id: T, user_id: UserId) -> anyhow::Result<Option<Like<T>>>;

    /// Likes of one target, most recent first.
    fn list_for_target(&self, target_id: T) -> anyhow::Result<Vec<Like<T>>>;

    /// Likes given by one user, most recent first.
    fn list_by_user(&self, user_id: UserId) -> anyhow::Result<Vec<Like<T>>>;

    fn count_for_target(&self, target_id: T) -> anyhow::Result<u64>;

    fn count_by_user(&self, user_id: UserId) -> anyhow::Result<u64>;
}

/// Lookup and counter contract offered by the post collaborator.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait PostDirectory: Send + Sync {
    fn find_post(&self, id: PostId) -> anyhow::Result<Option<Post>>;

    fn post_exists(&self, id: PostId) -> anyhow::Result<bool> {
        Ok(self.find_post(id)?.is_some())
    }

    /// Atomically adds `delta` to the post's running like total. The total is
    /// exact, so paired adjustments cancel in any order; it may dip below zero
    /// while a decrement runs ahead of its increment, and `like_count` reads
    /// it floored at zero. Returns the new `like_count`, or `None` if the post
    /// does not exist.
    fn adjust_like_count(&self, id: PostId, delta: i64) -> anyhow::Result<Option<u64>>;

    /// Overwrites the post's `like_count`. Returns the previous value, or
    /// `None` if the post does not exist.
    fn set_like_count(&self, id: PostId, like_count: u64) -> anyhow::Result<Option<u64>>;
}

/// Lookup contract offered by the user collaborator.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait UserDirectory: Send + Sync {
    fn find_user(&self, id: UserId) -> anyhow::Result<Option<User>>;

    fn user_exists(&self, id: UserId) -> anyhow::Result<bool> {
        Ok(self.find_user(id)?.is_some())
    }
}

/// Outcome of touching a target's cached like counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterUpdate {
    /// The counter now holds this value.
    Updated(u64),
    /// The target vanished between the record write and the counter write.
    TargetMissing,
    /// This kind of target keeps no cached counter.
    Untracked,
}

/// An entity that can be liked: posts, comments.
///
/// Implementations answer existence checks and own the cached counter, if
/// the target keeps one. The defaults describe a target without a counter.
pub trait LikeTarget: Send + Sync {
    type Id: Copy + Eq + Hash + fmt::Display + fmt::Debug + Send + Sync + 'static;

    const KIND: TargetKind;

    fn exists(&self, id: Self::Id) -> anyhow::Result<bool>;

    /// Atomic per-target increment (`delta > 0`) or decrement.
    fn adjust_like_count(&self, _id: Self::Id, _delta: i64) -> anyhow::Result<CounterUpdate> {
        Ok(CounterUpdate::Untracked)
    }

    fn cached_like_count(&self, _id: Self::Id) -> anyhow::Result<Option<u64>> {
        Ok(None)
    }

    fn store_like_count(&self, _id: Self::Id, _like_count: u64) -> anyhow::Result<CounterUpdate> {
        Ok(CounterUpdate::Untracked)
    }
}
