use std::sync::Arc;

use domains::{CommentId, PostId};
use services::{CommentLikeService, CommentService, CommentTargets, LikeService, PostLikeService, PostTargets};
use storage_adapters::{InMemoryCommentStore, InMemoryLikeStore, InMemoryPostStore, InMemoryUserStore};

/// The wired application: collaborator stores plus the three services.
pub struct Inkwell {
    pub posts: Arc<InMemoryPostStore>,
    pub users: Arc<InMemoryUserStore>,
    pub comments: CommentService,
    pub post_likes: PostLikeService,
    pub comment_likes: CommentLikeService,
}

impl Inkwell {
    /// Everything in process memory, empty at start.
    pub fn in_memory() -> Self {
        let posts = Arc::new(InMemoryPostStore::new());
        let users = Arc::new(InMemoryUserStore::new());
        let comment_store = Arc::new(InMemoryCommentStore::new());

        let comments = CommentService::new(comment_store.clone(), posts.clone(), users.clone());
        let post_likes = LikeService::new(
            Arc::new(InMemoryLikeStore::<PostId>::new()),
            PostTargets::new(posts.clone()),
            users.clone(),
        );
        let comment_likes = LikeService::new(
            Arc::new(InMemoryLikeStore::<CommentId>::new()),
            CommentTargets::new(comment_store),
            users.clone(),
        );

        Self {
            posts,
            users,
            comments,
            post_likes,
            comment_likes,
        }
    }
}
