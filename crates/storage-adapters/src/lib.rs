//! # storage-adapters
//!
//! Implementations of the `domains` persistence and collaborator ports.
//! Only the in-memory backend exists: state lives for the lifetime of the
//! process, starts empty and is discarded at shutdown.

pub mod memory;

pub use memory::{InMemoryCommentStore, InMemoryLikeStore, InMemoryPostStore, InMemoryUserStore};
