use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{NewTask, Task, User};

/// In-process store implementing both traits over one lock.
///
/// Mirrors the PostgreSQL schema: usernames are unique, ids start at 1, tasks
/// must reference an existing user, and rows come back ordered by id.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    tasks: BTreeMap<i32, Task>,
    next_user_id: i32,
    next_task_id: i32,
}

impl Tables {
    fn allocate_user_id(&mut self) -> i32 {
        self.next_user_id += 1;
        self.next_user_id
    }

    fn allocate_task_id(&mut self) -> i32 {
        self.next_task_id += 1;
        self.next_task_id
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, AppError> {
        let mut tables = self.inner.write().await;
        if tables.users.values().any(|u| u.username == username) {
            return Err(AppError::Conflict("Record already exists".into()));
        }
        let user = User {
            id: tables.allocate_user_id(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.inner.read().await.users.values().cloned().collect())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, task: NewTask) -> Result<Task, AppError> {
        let mut tables = self.inner.write().await;
        if !tables.users.contains_key(&task.user_id) {
            return Err(AppError::DatabaseError(format!(
                "tasks.user_id references missing user {}",
                task.user_id
            )));
        }
        let task = task.into_task(tables.allocate_task_id());
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, AppError> {
        Ok(self.inner.read().await.tasks.values().cloned().collect())
    }

    async fn find_owned_task(&self, id: i32, owner_id: i32) -> Result<Option<Task>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables
            .tasks
            .get(&id)
            .filter(|t| t.user_id == owner_id)
            .cloned())
    }

    async fn list_tasks_by_owner(&self, owner_id: i32) -> Result<Vec<Task>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables
            .tasks
            .values()
            .filter(|t| t.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn list_tasks_by_shared_user(&self, shared_user: &str) -> Result<Vec<Task>, AppError> {
        let tables = self.inner.read().await;
        Ok(tables
            .tasks
            .values()
            .filter(|t| t.shared_user == shared_user)
            .cloned()
            .collect())
    }

    async fn update_task(&self, task: &Task) -> Result<Option<Task>, AppError> {
        let mut tables = self.inner.write().await;
        match tables.tasks.get_mut(&task.id) {
            Some(stored) if stored.user_id == task.user_id => {
                *stored = task.clone();
                Ok(Some(stored.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_task(&self, id: i32, owner_id: i32) -> Result<bool, AppError> {
        let mut tables = self.inner.write().await;
        let owned = tables
            .tasks
            .get(&id)
            .map_or(false, |t| t.user_id == owner_id);
        if owned {
            tables.tasks.remove(&id);
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::DEFAULT_LABEL;

    fn new_task(owner: i32, title: &str, shared_user: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: "desc".to_string(),
            category: DEFAULT_LABEL.to_string(),
            due_date: None,
            shared_task: shared_user != DEFAULT_LABEL,
            shared_user: shared_user.to_string(),
            completed: false,
            user_id: owner,
        }
    }

    #[tokio::test]
    async fn test_usernames_are_unique() {
        let store = MemoryStore::new();
        let first = store.create_user("alice", "hash").await.unwrap();
        assert_eq!(first.id, 1);
        assert!(matches!(
            store.create_user("alice", "other").await,
            Err(AppError::Conflict(_))
        ));
        let second = store.create_user("bob", "hash").await.unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(store.list_users().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_task_requires_existing_owner() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.insert_task(new_task(42, "orphan", DEFAULT_LABEL)).await,
            Err(AppError::DatabaseError(_))
        ));
    }

    #[tokio::test]
    async fn test_owner_scoped_lookups() {
        let store = MemoryStore::new();
        let alice = store.create_user("alice", "hash").await.unwrap();
        let bob = store.create_user("bob", "hash").await.unwrap();

        let task = store
            .insert_task(new_task(alice.id, "alice's", "bob"))
            .await
            .unwrap();
        store
            .insert_task(new_task(bob.id, "bob's", DEFAULT_LABEL))
            .await
            .unwrap();

        assert!(store.find_owned_task(task.id, alice.id).await.unwrap().is_some());
        assert!(store.find_owned_task(task.id, bob.id).await.unwrap().is_none());
        assert_eq!(store.list_tasks_by_owner(bob.id).await.unwrap().len(), 1);
        assert_eq!(store.list_tasks().await.unwrap().len(), 2);

        let shared = store.list_tasks_by_shared_user("bob").await.unwrap();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].user_id, alice.id);

        let mut foreign = task.clone();
        foreign.user_id = bob.id;
        assert!(store.update_task(&foreign).await.unwrap().is_none());
        assert!(!store.delete_task(task.id, bob.id).await.unwrap());
        assert!(store.delete_task(task.id, alice.id).await.unwrap());
        assert!(store.find_owned_task(task.id, alice.id).await.unwrap().is_none());
    }
}
