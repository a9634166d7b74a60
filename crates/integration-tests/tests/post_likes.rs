//! Post likes and the cached `like_count` on posts.

use domains::{DomainError, ErrorKind, PostDirectory};
use integration_tests::World;

#[test]
fn like_scenario() {
    let world = World::new();
    let user = world.add_user();
    let post = world.add_post(user);

    world.post_likes.like(post, user).unwrap();
    assert_eq!(world.post_likes.count_for(post).unwrap(), 1);
    assert!(world.post_likes.has_liked(post, user).unwrap());

    let err = world.post_likes.like(post, user).unwrap_err();
    assert!(matches!(err, DomainError::DuplicateLike { .. }));
    assert_eq!(world.post_likes.count_for(post).unwrap(), 1);

    world.post_likes.unlike(post, user).unwrap();
    assert_eq!(world.post_likes.count_for(post).unwrap(), 0);

    let err = world.post_likes.unlike(post, user).unwrap_err();
    assert!(matches!(err, DomainError::LikeNotFound { .. }));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(world.cached_likes(post), 0);
}

#[test]
fn toggle_twice_restores_membership() {
    let world = World::new();
    let user = world.add_user();
    let post = world.add_post(user);

    assert!(world.post_likes.toggle(post, user).unwrap());
    assert!(!world.post_likes.toggle(post, user).unwrap());
    assert!(!world.post_likes.has_liked(post, user).unwrap());

    world.post_likes.like(post, user).unwrap();
    assert!(!world.post_likes.toggle(post, user).unwrap());
    assert!(world.post_likes.toggle(post, user).unwrap());
    assert!(world.post_likes.has_liked(post, user).unwrap());
    assert_eq!(world.cached_likes(post), 1);
}

#[test]
fn listings_by_target_and_user() {
    let world = World::new();
    let users = world.add_users(3);
    let first = world.add_post(users[0]);
    let second = world.add_post(users[0]);

    for user in &users {
        world.post_likes.like(first, *user).unwrap();
    }
    world.post_likes.like(second, users[0]).unwrap();

    let likes = world.post_likes.list_for(first).unwrap();
    assert_eq!(likes.len(), 3);
    assert_eq!(likes[0].user_id(), users[2]);
    assert_eq!(world.post_likes.likers(first).unwrap(), vec![users[2], users[1], users[0]]);

    let by_user = world.post_likes.list_by_user(users[0]).unwrap();
    let targets: Vec<_> = by_user.iter().map(|like| like.target_id()).collect();
    assert_eq!(targets, vec![second, first]);
    assert_eq!(world.post_likes.count_by_user(users[0]).unwrap(), 2);
    assert_eq!(world.post_likes.count_by_user(users[1]).unwrap(), 1);
}

#[test]
fn likes_need_existing_post_and_user() {
    let world = World::new();
    let user = world.add_user();
    let post = world.add_post(user);

    let missing_post = domains::PostId::new();
    let err = world.post_likes.like(missing_post, user).unwrap_err();
    assert!(matches!(err, DomainError::TargetNotFound { .. }));

    let stranger = domains::UserId::new();
    let err = world.post_likes.like(post, stranger).unwrap_err();
    assert!(matches!(err, DomainError::UserNotFound(_)));

    assert!(world.post_like_store.is_empty());
}

#[test]
fn reconcile_and_removal_for_deleted_post() {
    let world = World::new();
    let users = world.add_users(2);
    let post = world.add_post(users[0]);
    for user in &users {
        world.post_likes.like(post, *user).unwrap();
    }

    world.posts.set_like_count(post, 0).unwrap();
    assert_eq!(world.post_likes.reconcile(post).unwrap(), 2);
    assert_eq!(world.cached_likes(post), 2);

    world.posts.remove(post);
    assert_eq!(world.post_likes.remove_all_for(post).unwrap(), 2);
    assert_eq!(world.post_likes.count_for(post).unwrap(), 0);
    assert!(world.post_like_store.is_empty());
}
