//! Adapters that make posts and comments likeable.

use std::sync::Arc;

use domains::{CommentId, CommentRepository, CounterUpdate, LikeTarget, PostDirectory, PostId, TargetKind};

/// Posts as like targets. Their cached `like_count` is kept in step through
/// the post collaborator's atomic counter operations.
#[derive(Clone)]
pub struct PostTargets {
    posts: Arc<dyn PostDirectory>,
}

impl PostTargets {
    pub fn new(posts: Arc<dyn PostDirectory>) -> Self {
        Self { posts }
    }
}

impl LikeTarget for PostTargets {
    type Id = PostId;

    const KIND: TargetKind = TargetKind::Post;

    fn exists(&self, id: PostId) -> anyhow::Result<bool> {
        self.posts.post_exists(id)
    }

    fn adjust_like_count(&self, id: PostId, delta: i64) -> anyhow::Result<CounterUpdate> {
        Ok(match self.posts.adjust_like_count(id, delta)? {
            Some(like_count) => CounterUpdate::Updated(like_count),
            None => CounterUpdate::TargetMissing,
        })
    }

    fn cached_like_count(&self, id: PostId) -> anyhow::Result<Option<u64>> {
        Ok(self.posts.find_post(id)?.map(|post| post.like_count))
    }

    fn store_like_count(&self, id: PostId, like_count: u64) -> anyhow::Result<CounterUpdate> {
        Ok(match self.posts.set_like_count(id, like_count)? {
            Some(_) => CounterUpdate::Updated(like_count),
            None => CounterUpdate::TargetMissing,
        })
    }
}

/// Comments as like targets. Comments keep no cached counter, so the
/// counter hooks fall back to the trait defaults.
#[derive(Clone)]
pub struct CommentTargets {
    comments: Arc<dyn CommentRepository>,
}

impl CommentTargets {
    pub fn new(comments: Arc<dyn CommentRepository>) -> Self {
        Self { comments }
    }
}

impl LikeTarget for CommentTargets {
    type Id = CommentId;

    const KIND: TargetKind = TargetKind::Comment;

    fn exists(&self, id: CommentId) -> anyhow::Result<bool> {
        Ok(self.comments.get(id)?.is_some())
    }
}
