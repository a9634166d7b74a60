//! # Comment Service
//!
//! Owns the write path for comments: creation of root comments and replies,
//! author-only edits and deletes, and the threaded read view of a post.
//!
//! The store is only atomic per key. Two multi-key operations need care:
//!
//! - Deleting a root comment removes its replies, then the parent, then
//!   sweeps once more for replies that landed while the delete was running.
//! - Creating a reply re-reads the parent after inserting; if the parent is
//!   gone by then, the reply is withdrawn and the caller gets
//!   `CommentNotFound`. Together with the sweep this means no reply outlives
//!   its parent.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use domains::{
    Comment, CommentId, CommentRepository, CommentThread, DomainError, PostDirectory, PostId, Result,
    UserDirectory, UserId,
};
use tracing::{debug, info, warn};

pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostDirectory>,
    users: Arc<dyn UserDirectory>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostDirectory>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self { comments, posts, users }
    }

    /// Creates a root comment on `post_id`.
    pub fn create_comment(&self, content: &str, author_id: UserId, post_id: PostId) -> Result<Comment> {
        self.require_post(post_id)?;
        self.require_user(author_id)?;

        let comment = Comment::root(CommentId::new(), content, author_id, post_id, Utc::now())?;
        self.comments.insert(comment.clone())?;

        info!(comment_id = %comment.id(), %post_id, %author_id, "comment created");
        Ok(comment)
    }

    /// Creates a reply to the root comment `parent_comment_id`.
    pub fn create_reply(
        &self,
        content: &str,
        author_id: UserId,
        post_id: PostId,
        parent_comment_id: CommentId,
    ) -> Result<Comment> {
        self.require_post(post_id)?;
        self.require_user(author_id)?;
        let parent = self.get_comment(parent_comment_id)?;

        let reply = Comment::reply(CommentId::new(), content, author_id, post_id, &parent, Utc::now())?;
        self.comments.insert(reply.clone())?;

        // a concurrent delete may have taken the parent since the lookup above
        if self.comments.get(parent_comment_id)?.is_none() {
            self.comments.remove(reply.id())?;
            warn!(
                reply_id = %reply.id(),
                %parent_comment_id,
                "parent deleted while replying; reply withdrawn"
            );
            return Err(DomainError::CommentNotFound(parent_comment_id));
        }

        info!(comment_id = %reply.id(), %post_id, %parent_comment_id, %author_id, "reply created");
        Ok(reply)
    }

    /// Replaces the content of a comment. Only its author may do this.
    pub fn update_comment(&self, comment_id: CommentId, new_content: &str, author_id: UserId) -> Result<Comment> {
        let current = self.get_comment(comment_id)?;
        ensure_author(&current, author_id)?;

        let updated = current.with_content(new_content, Utc::now())?;
        if !self.comments.replace(updated.clone())? {
            // deleted between the read and the write
            return Err(DomainError::CommentNotFound(comment_id));
        }

        info!(%comment_id, %author_id, "comment updated");
        Ok(updated)
    }

    /// Deletes a comment and, for a root comment, all of its replies.
    ///
    /// Returns the number of records removed (1 + replies).
    pub fn delete_comment(&self, comment_id: CommentId, author_id: UserId) -> Result<usize> {
        let comment = self.get_comment(comment_id)?;
        ensure_author(&comment, author_id)?;

        let mut removed = 0;
        if comment.is_root() {
            removed += self.remove_replies(comment_id)?;
        }
        if self.comments.remove(comment_id)?.is_none() {
            debug!(%comment_id, "comment already removed by a concurrent delete");
            return Err(DomainError::CommentNotFound(comment_id));
        }
        removed += 1;
        if comment.is_root() {
            // replies inserted after the first scan but before the parent went away
            removed += self.remove_replies(comment_id)?;
        }

        info!(%comment_id, %author_id, removed, "comment deleted");
        Ok(removed)
    }

    /// Root comments of a post, each with its replies, in insertion order.
    pub fn comments_for_post(&self, post_id: PostId) -> Result<Vec<CommentThread>> {
        self.require_post(post_id)?;

        let (roots, replies): (Vec<_>, Vec<_>) = self
            .comments
            .list_by_post(post_id)?
            .into_iter()
            .partition(Comment::is_root);

        let mut replies_by_parent: HashMap<CommentId, Vec<Comment>> = HashMap::new();
        for reply in replies {
            if let Some(parent_id) = reply.parent_comment_id() {
                replies_by_parent.entry(parent_id).or_default().push(reply);
            }
        }

        let threads = roots
            .into_iter()
            .map(|comment| CommentThread {
                replies: replies_by_parent.remove(&comment.id()).unwrap_or_default(),
                comment,
            })
            .collect();
        Ok(threads)
    }

    pub fn root_comments_for_post(&self, post_id: PostId) -> Result<Vec<Comment>> {
        self.require_post(post_id)?;
        let mut roots = self.comments.list_by_post(post_id)?;
        roots.retain(Comment::is_root);
        Ok(roots)
    }

    pub fn replies_to(&self, comment_id: CommentId) -> Result<Vec<Comment>> {
        let comment = self.get_comment(comment_id)?;
        if comment.is_reply() {
            return Ok(Vec::new());
        }
        Ok(self.comments.list_replies(comment_id)?)
    }

    pub fn get_comment(&self, comment_id: CommentId) -> Result<Comment> {
        self.comments
            .get(comment_id)?
            .ok_or(DomainError::CommentNotFound(comment_id))
    }

    pub fn comment_exists(&self, comment_id: CommentId) -> Result<bool> {
        Ok(self.comments.get(comment_id)?.is_some())
    }

    /// Counts root comments and replies alike.
    pub fn comment_count_for_post(&self, post_id: PostId) -> Result<u64> {
        Ok(self.comments.count_by_post(post_id)?)
    }

    /// Removes every comment of a post, replies before roots. Called by the
    /// post-deletion flow; the post itself may already be gone.
    pub fn delete_comments_for_post(&self, post_id: PostId) -> Result<usize> {
        let (roots, replies): (Vec<_>, Vec<_>) = self
            .comments
            .list_by_post(post_id)?
            .into_iter()
            .partition(Comment::is_root);

        let mut removed = 0;
        for comment in replies.iter().chain(roots.iter()) {
            if self.comments.remove(comment.id())?.is_some() {
                removed += 1;
            }
        }

        info!(%post_id, removed, "comments of post deleted");
        Ok(removed)
    }

    fn remove_replies(&self, parent_id: CommentId) -> Result<usize> {
        let mut removed = 0;
        for reply in self.comments.list_replies(parent_id)? {
            if self.comments.remove(reply.id())?.is_some() {
                removed += 1;
            }
        }
        Ok(removed)
    }

    fn require_post(&self, post_id: PostId) -> Result<()> {
        if self.posts.post_exists(post_id)? {
            Ok(())
        } else {
            debug!(%post_id, "post not found");
            Err(DomainError::PostNotFound(post_id))
        }
    }

    fn require_user(&self, user_id: UserId) -> Result<()> {
        if self.users.user_exists(user_id)? {
            Ok(())
        } else {
            debug!(%user_id, "user not found");
            Err(DomainError::UserNotFound(user_id))
        }
    }
}

fn ensure_author(comment: &Comment, user_id: UserId) -> Result<()> {
    if comment.is_authored_by(user_id) {
        return Ok(());
    }
    debug!(comment_id = %comment.id(), %user_id, "rejected modification by non-author");
    Err(DomainError::Unauthorized(format!(
        "user {user_id} is not the author of comment {}",
        comment.id()
    )))
}
