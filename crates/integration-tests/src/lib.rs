//! Shared fixtures for the cross-crate tests: a fully wired in-memory world
//! with helpers to add users and posts.

use std::sync::Arc;

use chrono::Utc;
use domains::{CommentId, Post, PostDirectory, PostId, User, UserId};
use fake::faker::internet::en::Username;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use services::{CommentLikeService, CommentService, CommentTargets, LikeService, PostLikeService, PostTargets};
use storage_adapters::{InMemoryCommentStore, InMemoryLikeStore, InMemoryPostStore, InMemoryUserStore};

pub struct World {
    pub posts: Arc<InMemoryPostStore>,
    pub users: Arc<InMemoryUserStore>,
    pub comment_store: Arc<InMemoryCommentStore>,
    pub post_like_store: Arc<InMemoryLikeStore<PostId>>,
    pub comments: CommentService,
    pub post_likes: PostLikeService,
    pub comment_likes: CommentLikeService,
}

impl World {
    pub fn new() -> Self {
        let posts = Arc::new(InMemoryPostStore::new());
        let users = Arc::new(InMemoryUserStore::new());
        let comment_store = Arc::new(InMemoryCommentStore::new());
        let post_like_store = Arc::new(InMemoryLikeStore::<PostId>::new());

        Self {
            comments: CommentService::new(comment_store.clone(), posts.clone(), users.clone()),
            post_likes: LikeService::new(post_like_store.clone(), PostTargets::new(posts.clone()), users.clone()),
            comment_likes: LikeService::new(
                Arc::new(InMemoryLikeStore::<CommentId>::new()),
                CommentTargets::new(comment_store.clone()),
                users.clone(),
            ),
            posts,
            users,
            comment_store,
            post_like_store,
        }
    }

    pub fn add_user(&self) -> UserId {
        let username: String = Username().fake();
        let user = User::new(UserId::new(), username.clone(), username);
        let id = user.id;
        self.users.insert(user);
        id
    }

    pub fn add_users(&self, n: usize) -> Vec<UserId> {
        (0..n).map(|_| self.add_user()).collect()
    }

    pub fn add_post(&self, author: UserId) -> PostId {
        let title: String = Sentence(3..6).fake();
        let post = Post::new(PostId::new(), title, author, Utc::now());
        let id = post.id;
        self.posts.insert(post);
        id
    }

    /// The counter cached on the post itself.
    pub fn cached_likes(&self, post_id: PostId) -> u64 {
        self.posts
            .find_post(post_id)
            .ok()
            .flatten()
            .map(|post| post.like_count)
            .unwrap_or_default()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Some filler comment text.
pub fn sentence() -> String {
    Sentence(3..10).fake()
}
