use std::hash::Hash;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use domains::{Like, LikeRepository, UserId};

use super::{in_insertion_order, SequenceCounter, Sequenced};

/// Thread-safe like store, generic over the target id type.
///
/// Keyed by the natural key `(target, user)`, so the uniqueness of a like
/// is decided by a single-key insert-if-absent rather than a separate check.
#[derive(Debug)]
pub struct InMemoryLikeStore<T: Eq + Hash> {
    likes: DashMap<(T, UserId), Sequenced<Like<T>>>,
    seq: SequenceCounter,
}

impl<T: Eq + Hash> Default for InMemoryLikeStore<T> {
    fn default() -> Self {
        Self {
            likes: DashMap::new(),
            seq: SequenceCounter::default(),
        }
    }
}

impl<T> InMemoryLikeStore<T>
where
    T: Copy + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.likes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.likes.is_empty()
    }

    /// Matching likes, most recent first.
    fn scan(&self, keep: impl Fn(&(T, UserId)) -> bool) -> Vec<Like<T>> {
        let hits = self
            .likes
            .iter()
            .filter(|entry| keep(entry.key()))
            .map(|entry| (entry.seq, entry.value.clone()))
            .collect();
        let mut likes = in_insertion_order(hits);
        likes.reverse();
        likes
    }
}

impl<T> LikeRepository<T> for InMemoryLikeStore<T>
where
    T: Copy + Eq + Hash + Send + Sync,
{
    fn insert_if_absent(&self, like: Like<T>) -> anyhow::Result<bool> {
        match self.likes.entry(like.key()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(Sequenced {
                    seq: self.seq.next(),
                    value: like,
                });
                Ok(true)
            }
        }
    }

    fn find(&self, target_id: T, user_id: UserId) -> anyhow::Result<Option<Like<T>>> {
        Ok(self
            .likes
            .get(&(target_id, user_id))
            .map(|entry| entry.value.clone()))
    }

    fn remove(&self, target_id: T, user_id: UserId) -> anyhow::Result<Option<Like<T>>> {
        Ok(self
            .likes
            .remove(&(target_id, user_id))
            .map(|(_, entry)| entry.value))
    }

    fn list_for_target(&self, target_id: T) -> anyhow::Result<Vec<Like<T>>> {
        Ok(self.scan(|(target, _)| *target == target_id))
    }

    fn list_by_user(&self, user_id: UserId) -> anyhow::Result<Vec<Like<T>>> {
        Ok(self.scan(|(_, user)| *user == user_id))
    }

    fn count_for_target(&self, target_id: T) -> anyhow::Result<u64> {
        let count = self.likes.iter().filter(|entry| entry.key().0 == target_id).count();
        Ok(count as u64)
    }

    fn count_by_user(&self, user_id: UserId) -> anyhow::Result<u64> {
        let count = self.likes.iter().filter(|entry| entry.key().1 == user_id).count();
        Ok(count as u64)
    }
}
