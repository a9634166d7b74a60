//! # Like Service
//!
//! Like, unlike and toggle for any [`LikeTarget`], plus read queries that go
//! to the like-record store (never to the cached counter).
//!
//! Uniqueness of `(target, user)` is decided by the store's insert-if-absent,
//! and only the caller whose insert or remove went through touches the
//! target's counter, with a single atomic adjust. Once no operation is in
//! flight, the counter equals the number of like records.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    CounterUpdate, DomainError, Like, LikeId, LikeRepository, LikeTarget, Result, UserDirectory, UserId,
};
use tracing::{debug, info, warn};

use crate::like_targets::{CommentTargets, PostTargets};

pub type PostLikeService = LikeService<PostTargets>;
pub type CommentLikeService = LikeService<CommentTargets>;

pub struct LikeService<T: LikeTarget> {
    likes: Arc<dyn LikeRepository<T::Id>>,
    targets: T,
    users: Arc<dyn UserDirectory>,
}

impl<T: LikeTarget> LikeService<T> {
    pub fn new(likes: Arc<dyn LikeRepository<T::Id>>, targets: T, users: Arc<dyn UserDirectory>) -> Self {
        Self { likes, targets, users }
    }

    /// Records that `user_id` likes `target_id` and bumps the cached counter.
    pub fn like(&self, target_id: T::Id, user_id: UserId) -> Result<Like<T::Id>> {
        self.require_target(target_id)?;
        self.require_user(user_id)?;

        let like = Like::new(LikeId::new(), target_id, user_id, Utc::now())?;
        if !self.likes.insert_if_absent(like.clone())? {
            debug!(kind = %T::KIND, target = %target_id, %user_id, "duplicate like rejected");
            return Err(DomainError::DuplicateLike {
                kind: T::KIND,
                target_id: target_id.to_string(),
                user_id,
            });
        }

        if self.adjust_counter(target_id, 1)? == CounterUpdate::TargetMissing {
            // the target was deleted under us; don't leave a dangling record
            self.likes.remove(target_id, user_id)?;
            return Err(self.target_not_found(target_id));
        }

        info!(kind = %T::KIND, target = %target_id, %user_id, "liked");
        Ok(like)
    }

    /// Removes the like of `user_id` on `target_id` and returns it.
    pub fn unlike(&self, target_id: T::Id, user_id: UserId) -> Result<Like<T::Id>> {
        self.require_target(target_id)?;
        self.require_user(user_id)?;

        let Some(removed) = self.likes.remove(target_id, user_id)? else {
            debug!(kind = %T::KIND, target = %target_id, %user_id, "unlike without a like");
            return Err(DomainError::LikeNotFound {
                kind: T::KIND,
                target_id: target_id.to_string(),
                user_id,
            });
        };
        self.adjust_counter(target_id, -1)?;

        info!(kind = %T::KIND, target = %target_id, %user_id, "unliked");
        Ok(removed)
    }

    /// Flips the like state of the pair. Returns `true` if the target is now
    /// liked by the user.
    ///
    /// Each attempt is a single-key remove or insert, so racing toggles on the
    /// same pair serialize; losing an insert race just means the record now
    /// exists and the next attempt removes it.
    pub fn toggle(&self, target_id: T::Id, user_id: UserId) -> Result<bool> {
        self.require_target(target_id)?;
        self.require_user(user_id)?;

        loop {
            if self.likes.remove(target_id, user_id)?.is_some() {
                self.adjust_counter(target_id, -1)?;
                info!(kind = %T::KIND, target = %target_id, %user_id, "toggled off");
                return Ok(false);
            }

            let like = Like::new(LikeId::new(), target_id, user_id, Utc::now())?;
            if self.likes.insert_if_absent(like)? {
                if self.adjust_counter(target_id, 1)? == CounterUpdate::TargetMissing {
                    self.likes.remove(target_id, user_id)?;
                    return Err(self.target_not_found(target_id));
                }
                info!(kind = %T::KIND, target = %target_id, %user_id, "toggled on");
                return Ok(true);
            }
            debug!(kind = %T::KIND, target = %target_id, %user_id, "toggle raced a concurrent like, retrying");
        }
    }

    pub fn has_liked(&self, target_id: T::Id, user_id: UserId) -> Result<bool> {
        Ok(self.likes.find(target_id, user_id)?.is_some())
    }

    /// Number of like records for the target.
    pub fn count_for(&self, target_id: T::Id) -> Result<u64> {
        Ok(self.likes.count_for_target(target_id)?)
    }

    /// Likes of the target, most recent first.
    pub fn list_for(&self, target_id: T::Id) -> Result<Vec<Like<T::Id>>> {
        Ok(self.likes.list_for_target(target_id)?)
    }

    pub fn likers(&self, target_id: T::Id) -> Result<Vec<UserId>> {
        Ok(self
            .likes
            .list_for_target(target_id)?
            .iter()
            .map(Like::user_id)
            .collect())
    }

    pub fn list_by_user(&self, user_id: UserId) -> Result<Vec<Like<T::Id>>> {
        Ok(self.likes.list_by_user(user_id)?)
    }

    pub fn count_by_user(&self, user_id: UserId) -> Result<u64> {
        Ok(self.likes.count_by_user(user_id)?)
    }

    /// The counter cached on the target, if this kind of target keeps one.
    pub fn cached_count(&self, target_id: T::Id) -> Result<Option<u64>> {
        Ok(self.targets.cached_like_count(target_id)?)
    }

    /// Recomputes the target's counter from the like records and overwrites
    /// the cached value if it drifted. Meant for quiescent points.
    pub fn reconcile(&self, target_id: T::Id) -> Result<u64> {
        self.require_target(target_id)?;

        let actual = self.likes.count_for_target(target_id)?;
        match self.targets.cached_like_count(target_id)? {
            Some(cached) if cached != actual => {
                warn!(kind = %T::KIND, target = %target_id, cached, actual, "like counter drifted; repairing");
                self.targets.store_like_count(target_id, actual)?;
            }
            _ => {}
        }
        Ok(actual)
    }

    /// Removes every like of a target. Called by the target's deletion flow;
    /// the target itself may already be gone.
    pub fn remove_all_for(&self, target_id: T::Id) -> Result<usize> {
        let mut removed = 0;
        for like in self.likes.list_for_target(target_id)? {
            if self.likes.remove(target_id, like.user_id())?.is_some() {
                self.targets.adjust_like_count(target_id, -1)?;
                removed += 1;
            }
        }
        info!(kind = %T::KIND, target = %target_id, removed, "likes of target removed");
        Ok(removed)
    }

    fn adjust_counter(&self, target_id: T::Id, delta: i64) -> Result<CounterUpdate> {
        let update = self.targets.adjust_like_count(target_id, delta)?;
        match update {
            CounterUpdate::Updated(like_count) => {
                debug!(kind = %T::KIND, target = %target_id, delta, like_count, "like counter adjusted")
            }
            CounterUpdate::TargetMissing => {
                warn!(kind = %T::KIND, target = %target_id, delta, "target vanished before its like counter was adjusted")
            }
            CounterUpdate::Untracked => {}
        }
        Ok(update)
    }

    fn require_target(&self, target_id: T::Id) -> Result<()> {
        if self.targets.exists(target_id)? {
            Ok(())
        } else {
            debug!(kind = %T::KIND, target = %target_id, "like target not found");
            Err(self.target_not_found(target_id))
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

    fn target_not_found(&self, target_id: T::Id) -> DomainError {
        DomainError::TargetNotFound {
            kind: T::KIND,
            id: target_id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{OnceLock, Weak};

    use super::*;
    use domains::{
        Comment, CommentId, CommentRepository, MockPostDirectory, Post, PostDirectory, PostId, PostLike, TargetKind,
        User,
    };
    use storage_adapters::{InMemoryCommentStore, InMemoryLikeStore, InMemoryPostStore, InMemoryUserStore};

    struct Harness {
        posts: Arc<InMemoryPostStore>,
        likes: PostLikeService,
        post_id: PostId,
        user: UserId,
    }

    fn harness() -> Harness {
        let posts = Arc::new(InMemoryPostStore::new());
        let users = Arc::new(InMemoryUserStore::new());
        let user = User::new(UserId::new(), "reader", "Reader");
        let post = Post::new(PostId::new(), "Likeable", user.id, Utc::now());
        let (post_id, user_id) = (post.id, user.id);
        posts.insert(post);
        users.insert(user);

        Harness {
            likes: LikeService::new(
                Arc::new(InMemoryLikeStore::<PostId>::new()),
                PostTargets::new(posts.clone()),
                users,
            ),
            posts,
            post_id,
            user: user_id,
        }
    }

    fn like_count(h: &Harness) -> u64 {
        h.posts.find_post(h.post_id).unwrap().unwrap().like_count
    }

    #[test]
    fn test_like_unlike_scenario() {
        let h = harness();

        h.likes.like(h.post_id, h.user).unwrap();
        assert_eq!(h.likes.count_for(h.post_id).unwrap(), 1);
        assert!(h.likes.has_liked(h.post_id, h.user).unwrap());
        assert_eq!(like_count(&h), 1);

        let err = h.likes.like(h.post_id, h.user).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateLike { kind: TargetKind::Post, .. }));
        assert_eq!(h.likes.count_for(h.post_id).unwrap(), 1);
        assert_eq!(like_count(&h), 1);

        h.likes.unlike(h.post_id, h.user).unwrap();
        assert_eq!(h.likes.count_for(h.post_id).unwrap(), 0);
        assert_eq!(like_count(&h), 0);

        let err = h.likes.unlike(h.post_id, h.user).unwrap_err();
        assert!(matches!(err, DomainError::LikeNotFound { .. }));
        assert_eq!(like_count(&h), 0);
    }

    #[test]
    fn test_toggle_pairs_restore_membership() {
        let h = harness();
        assert!(h.likes.toggle(h.post_id, h.user).unwrap());
        assert_eq!(like_count(&h), 1);
        assert!(!h.likes.toggle(h.post_id, h.user).unwrap());
        assert!(!h.likes.has_liked(h.post_id, h.user).unwrap());
        assert_eq!(like_count(&h), 0);
    }

    #[test]
    fn test_unknown_target_and_user() {
        let h = harness();
        let missing = PostId::new();
        let err = h.likes.like(missing, h.user).unwrap_err();
        assert!(matches!(err, DomainError::TargetNotFound { kind: TargetKind::Post, ref id } if *id == missing.to_string()));

        let stranger = UserId::new();
        let err = h.likes.toggle(h.post_id, stranger).unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound(id) if id == stranger));
        assert_eq!(h.likes.count_for(h.post_id).unwrap(), 0);
    }

    #[test]
    fn test_reconcile_repairs_drift() {
        let h = harness();
        h.likes.like(h.post_id, h.user).unwrap();
        h.posts.set_like_count(h.post_id, 42).unwrap();

        assert_eq!(h.likes.reconcile(h.post_id).unwrap(), 1);
        assert_eq!(h.likes.cached_count(h.post_id).unwrap(), Some(1));
    }

    #[test]
    fn test_remove_all_for_target() {
        let h = harness();
        h.likes.like(h.post_id, h.user).unwrap();
        assert_eq!(h.likes.remove_all_for(h.post_id).unwrap(), 1);
        assert_eq!(h.likes.count_by_user(h.user).unwrap(), 0);
        assert_eq!(like_count(&h), 0);
    }

    #[test]
    fn test_like_is_rolled_back_when_post_vanishes() {
        let post_id = PostId::new();
        let mut posts = MockPostDirectory::new();
        posts.expect_post_exists().returning(|_| Ok(true));
        posts.expect_adjust_like_count().times(1).returning(|_, _| Ok(None));
        let users = Arc::new(InMemoryUserStore::new());
        let user = User::new(UserId::new(), "reader", "Reader");
        let user_id = user.id;
        users.insert(user);

        let store = Arc::new(InMemoryLikeStore::<PostId>::new());
        let service = LikeService::new(store.clone(), PostTargets::new(Arc::new(posts)), users);

        let err = service.like(post_id, user_id).unwrap_err();
        assert!(matches!(err, DomainError::TargetNotFound { .. }));
        assert!(store.is_empty());
    }

    type Interjection = fn(&PostLikeService, PostId, UserId);

    /// Like store that runs another service call right after its first
    /// successful insert, before the inserting caller reaches the counter.
    struct InterleavingLikes {
        inner: InMemoryLikeStore<PostId>,
        service: OnceLock<Weak<PostLikeService>>,
        interject: Interjection,
        fired: AtomicBool,
    }

    impl LikeRepository<PostId> for InterleavingLikes {
        fn insert_if_absent(&self, like: PostLike) -> anyhow::Result<bool> {
            let inserted = self.inner.insert_if_absent(like.clone())?;
            if inserted && !self.fired.swap(true, Ordering::SeqCst) {
                if let Some(service) = self.service.get().and_then(Weak::upgrade) {
                    (self.interject)(&service, like.target_id(), like.user_id());
                }
            }
            Ok(inserted)
        }

        fn find(&self, target_id: PostId, user_id: UserId) -> anyhow::Result<Option<PostLike>> {
            self.inner.find(target_id, user_id)
        }

        fn remove(&self, target_id: PostId, user_id: UserId) -> anyhow::Result<Option<PostLike>> {
            self.inner.remove(target_id, user_id)
        }

        fn list_for_target(&self, target_id: PostId) -> anyhow::Result<Vec<PostLike>> {
            self.inner.list_for_target(target_id)
        }

        fn list_by_user(&self, user_id: UserId) -> anyhow::Result<Vec<PostLike>> {
            self.inner.list_by_user(user_id)
        }

        fn count_for_target(&self, target_id: PostId) -> anyhow::Result<u64> {
            self.inner.count_for_target(target_id)
        }

        fn count_by_user(&self, user_id: UserId) -> anyhow::Result<u64> {
            self.inner.count_by_user(user_id)
        }
    }

    fn interleaved(interject: Interjection) -> (Harness, Arc<PostLikeService>) {
        let h = harness();
        let store = Arc::new(InterleavingLikes {
            inner: InMemoryLikeStore::new(),
            service: OnceLock::new(),
            interject,
            fired: AtomicBool::new(false),
        });
        let users = Arc::new(InMemoryUserStore::new());
        users.insert(User::new(h.user, "reader", "Reader"));
        let service = Arc::new(LikeService::new(store.clone(), PostTargets::new(h.posts.clone()), users));
        assert!(store.service.set(Arc::downgrade(&service)).is_ok());
        (h, service)
    }

    #[test]
    fn test_unlike_between_insert_and_increment_leaves_counter_exact() {
        let (h, service) = interleaved(|service, post_id, user_id| {
            service.unlike(post_id, user_id).unwrap();
        });

        service.like(h.post_id, h.user).unwrap();

        assert_eq!(service.count_for(h.post_id).unwrap(), 0);
        assert_eq!(like_count(&h), 0);
        assert_eq!(service.reconcile(h.post_id).unwrap(), 0);
    }

    #[test]
    fn test_toggle_between_insert_and_increment_leaves_counter_exact() {
        let (h, service) = interleaved(|service, post_id, user_id| {
            assert!(!service.toggle(post_id, user_id).unwrap());
        });

        service.like(h.post_id, h.user).unwrap();
        assert_eq!(like_count(&h), 0);

        assert!(service.toggle(h.post_id, h.user).unwrap());
        assert_eq!(service.count_for(h.post_id).unwrap(), 1);
        assert_eq!(like_count(&h), 1);
    }

    #[test]
    fn test_comment_likes_have_no_counter() {
        let comments = Arc::new(InMemoryCommentStore::new());
        let users = Arc::new(InMemoryUserStore::new());
        let (alice, bob) = (User::new(UserId::new(), "alice", "Alice"), User::new(UserId::new(), "bob", "Bob"));
        let (alice_id, bob_id) = (alice.id, bob.id);
        users.insert(alice);
        users.insert(bob);
        let comment = Comment::root(CommentId::new(), "nice post", alice_id, PostId::new(), Utc::now()).unwrap();
        let comment_id = comment.id();
        comments.insert(comment).unwrap();

        let service: CommentLikeService = LikeService::new(
            Arc::new(InMemoryLikeStore::<CommentId>::new()),
            CommentTargets::new(comments),
            users,
        );

        service.like(comment_id, alice_id).unwrap();
        service.like(comment_id, bob_id).unwrap();
        assert_eq!(service.likers(comment_id).unwrap(), vec![bob_id, alice_id]);
        assert_eq!(service.cached_count(comment_id).unwrap(), None);
        assert_eq!(service.reconcile(comment_id).unwrap(), 2);

        let err = service.like(CommentId::new(), alice_id).unwrap_err();
        assert!(matches!(err, DomainError::TargetNotFound { kind: TargetKind::Comment, .. }));
    }
}
