use dashmap::DashMap;
use domains::{Post, PostDirectory, PostId};
use tracing::debug;

/// In-memory stand-in for the post collaborator.
///
/// Counter changes happen under the post's shard lock, so concurrent
/// increments and decrements of one post never lose updates.
#[derive(Debug, Default)]
pub struct InMemoryPostStore {
    posts: DashMap<PostId, CountedPost>,
}

/// A post next to the signed running total of its like adjustments.
///
/// A decrement can land before the increment it pairs with, so the total may
/// dip below zero while operations are in flight. It is never clamped; the
/// post's `like_count` shows it floored at zero.
#[derive(Debug)]
struct CountedPost {
    post: Post,
    likes: i64,
}

impl CountedPost {
    fn new(post: Post) -> Self {
        let likes = i64::try_from(post.like_count).unwrap_or(i64::MAX);
        Self { post, likes }
    }

    fn store(&mut self, likes: i64) -> u64 {
        self.likes = likes;
        let like_count = u64::try_from(likes).unwrap_or(0);
        self.post = self.post.with_like_count(like_count);
        like_count
    }
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, post: Post) {
        self.posts.insert(post.id, CountedPost::new(post));
    }

    pub fn remove(&self, id: PostId) -> Option<Post> {
        self.posts.remove(&id).map(|(_, counted)| counted.post)
    }

    pub fn ids(&self) -> Vec<PostId> {
        self.posts.iter().map(|entry| *entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

impl PostDirectory for InMemoryPostStore {
    fn find_post(&self, id: PostId) -> anyhow::Result<Option<Post>> {
        Ok(self.posts.get(&id).map(|entry| entry.post.clone()))
    }

    fn post_exists(&self, id: PostId) -> anyhow::Result<bool> {
        Ok(self.posts.contains_key(&id))
    }

    fn adjust_like_count(&self, id: PostId, delta: i64) -> anyhow::Result<Option<u64>> {
        let Some(mut entry) = self.posts.get_mut(&id) else {
            return Ok(None);
        };
        let likes = entry.likes.saturating_add(delta);
        Ok(Some(entry.store(likes)))
    }

    fn set_like_count(&self, id: PostId, like_count: u64) -> anyhow::Result<Option<u64>> {
        let Some(mut entry) = self.posts.get_mut(&id) else {
            return Ok(None);
        };
        let previous = entry.post.like_count;
        if previous != like_count || entry.likes < 0 {
            debug!(post_id = %id, previous, like_count, running = entry.likes, "overwriting cached like count");
        }
        entry.store(i64::try_from(like_count).unwrap_or(i64::MAX));
        Ok(Some(previous))
    }
}
