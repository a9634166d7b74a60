//! `DashMap`-backed stores.
//!
//! Each store gives atomic get/put/delete per key through DashMap's sharded
//! locks; secondary lookups (by post, by parent, by user) are linear scans.
//! Entries carry an insertion sequence number so scans come back in a
//! stable order even though the map itself is unordered.

use std::sync::atomic::{AtomicU64, Ordering};

mod comment_store;
mod like_store;
mod post_store;
mod user_store;

pub use comment_store::InMemoryCommentStore;
pub use like_store::InMemoryLikeStore;
pub use post_store::InMemoryPostStore;
pub use user_store::InMemoryUserStore;

/// A stored value tagged with the order it was first inserted in.
#[derive(Debug, Clone)]
struct Sequenced<V> {
    seq: u64,
    value: V,
}

/// Monotonic source of insertion sequence numbers.
#[derive(Debug, Default)]
struct SequenceCounter(AtomicU64);

impl SequenceCounter {
    fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// Strips sequence numbers after ordering by them, oldest first.
fn in_insertion_order<V>(mut hits: Vec<(u64, V)>) -> Vec<V> {
    hits.sort_unstable_by_key(|(seq, _)| *seq);
    hits.into_iter().map(|(_, value)| value).collect()
}
