use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use domains::{Comment, CommentId, CommentRepository, PostId};

use super::{in_insertion_order, SequenceCounter, Sequenced};

/// Thread-safe comment store keyed by comment id.
#[derive(Debug, Default)]
pub struct InMemoryCommentStore {
    comments: DashMap<CommentId, Sequenced<Comment>>,
    seq: SequenceCounter,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    fn scan(&self, keep: impl Fn(&Comment) -> bool) -> Vec<Comment> {
        let hits = self
            .comments
            .iter()
            .filter(|entry| keep(&entry.value))
            .map(|entry| (entry.seq, entry.value.clone()))
            .collect();
        in_insertion_order(hits)
    }
}

impl CommentRepository for InMemoryCommentStore {
    fn insert(&self, comment: Comment) -> anyhow::Result<()> {
        match self.comments.entry(comment.id()) {
            // a re-put keeps its original position in scans
            Entry::Occupied(mut slot) => slot.get_mut().value = comment,
            Entry::Vacant(slot) => {
                slot.insert(Sequenced {
                    seq: self.seq.next(),
                    value: comment,
                });
            }
        }
        Ok(())
    }

    fn get(&self, id: CommentId) -> anyhow::Result<Option<Comment>> {
        Ok(self.comments.get(&id).map(|entry| entry.value.clone()))
    }

    fn replace(&self, comment: Comment) -> anyhow::Result<bool> {
        match self.comments.get_mut(&comment.id()) {
            Some(mut entry) => {
                entry.value = comment;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove(&self, id: CommentId) -> anyhow::Result<Option<Comment>> {
        Ok(self.comments.remove(&id).map(|(_, entry)| entry.value))
    }

    fn list_by_post(&self, post_id: PostId) -> anyhow::Result<Vec<Comment>> {
        Ok(self.scan(|c| c.post_id() == post_id))
    }

    fn list_replies(&self, parent_id: CommentId) -> anyhow::Result<Vec<Comment>> {
        Ok(self.scan(|c| c.parent_comment_id() == Some(parent_id)))
    }

    fn count_by_post(&self, post_id: PostId) -> anyhow::Result<u64> {
        let count = self
            .comments
            .iter()
            .filter(|entry| entry.value.post_id() == post_id)
            .count();
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::UserId;

    fn root(post_id: PostId, content: &str) -> Comment {
        Comment::root(CommentId::new(), content, UserId::new(), post_id, Utc::now()).unwrap()
    }

    #[test]
    fn test_scans_follow_insertion_order() {
        let store = InMemoryCommentStore::new();
        let post_id = PostId::new();
        let contents = ["one", "two", "three", "four", "five"];
        for content in contents {
            store.insert(root(post_id, content)).unwrap();
        }
        store.insert(root(PostId::new(), "other post")).unwrap();

        let listed: Vec<_> = store
            .list_by_post(post_id)
            .unwrap()
            .iter()
            .map(|c| c.content().to_string())
            .collect();
        assert_eq!(listed, contents);
        assert_eq!(store.count_by_post(post_id).unwrap(), 5);
    }

    #[test]
    fn test_replies_are_found_by_parent() {
        let store = InMemoryCommentStore::new();
        let post_id = PostId::new();
        let parent = root(post_id, "parent");
        let reply = Comment::reply(CommentId::new(), "reply", UserId::new(), post_id, &parent, Utc::now()).unwrap();
        store.insert(parent.clone()).unwrap();
        store.insert(reply.clone()).unwrap();

        assert_eq!(store.list_replies(parent.id()).unwrap(), vec![reply]);
        assert!(store.list_replies(CommentId::new()).unwrap().is_empty());
    }

    #[test]
    fn test_replace_does_not_resurrect() {
        let store = InMemoryCommentStore::new();
        let comment = root(PostId::new(), "original");
        store.insert(comment.clone()).unwrap();

        let edited = comment.with_content("edited", Utc::now()).unwrap();
        assert!(store.replace(edited.clone()).unwrap());
        assert_eq!(store.get(comment.id()).unwrap(), Some(edited.clone()));

        store.remove(comment.id()).unwrap();
        assert!(!store.replace(edited).unwrap());
        assert!(store.get(comment.id()).unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace_keeps_scan_position() {
        let store = InMemoryCommentStore::new();
        let post_id = PostId::new();
        let first = root(post_id, "first");
        let second = root(post_id, "second");
        store.insert(first.clone()).unwrap();
        store.insert(second).unwrap();

        store.replace(first.with_content("first, edited", Utc::now()).unwrap()).unwrap();

        let listed = store.list_by_post(post_id).unwrap();
        assert_eq!(listed[0].content(), "first, edited");
        assert_eq!(listed[1].content(), "second");
    }
}
