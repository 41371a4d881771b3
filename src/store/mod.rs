//! Persistence seam for users and tasks.
//!
//! Handlers and services only see the [`UserStore`] and [`TaskStore`] traits.
//! [`PgStore`] backs them with PostgreSQL through `sqlx`; [`MemoryStore`] keeps
//! everything in process and is what the tests run against.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{NewTask, Task, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. A taken username yields `AppError::Conflict`.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn list_users(&self) -> Result<Vec<User>, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, task: NewTask) -> Result<Task, AppError>;

    async fn list_tasks(&self) -> Result<Vec<Task>, AppError>;

    /// Owner-scoped lookup: matches on id AND owner in one step.
    async fn find_owned_task(&self, id: i32, owner_id: i32) -> Result<Option<Task>, AppError>;

    async fn list_tasks_by_owner(&self, owner_id: i32) -> Result<Vec<Task>, AppError>;

    /// Exact match on the free-text `shared_user` column, across all owners.
    async fn list_tasks_by_shared_user(&self, shared_user: &str) -> Result<Vec<Task>, AppError>;

    /// Writes every mutable column of `task`, matching on id and owner.
    /// Returns `None` when no such row exists anymore.
    async fn update_task(&self, task: &Task) -> Result<Option<Task>, AppError>;

    /// Returns whether a row was removed.
    async fn delete_task(&self, id: i32, owner_id: i32) -> Result<bool, AppError>;
}
