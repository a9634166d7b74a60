use dashmap::DashMap;
use domains::{User, UserDirectory, UserId};

/// In-memory stand-in for the user collaborator.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: DashMap<UserId, User>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) {
        self.users.insert(user.id, user);
    }

    pub fn remove(&self, id: UserId) -> Option<User> {
        self.users.remove(&id).map(|(_, user)| user)
    }

    pub fn ids(&self) -> Vec<UserId> {
        self.users.iter().map(|entry| *entry.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserDirectory for InMemoryUserStore {
    fn find_user(&self, id: UserId) -> anyhow::Result<Option<User>> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }

    fn user_exists(&self, id: UserId) -> anyhow::Result<bool> {
        Ok(self.users.contains_key(&id))
    }
}
