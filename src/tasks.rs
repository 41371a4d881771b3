//! Task operations on top of a [`TaskStore`].
//!
//! Each operation logs the attempt, a debug snapshot of the entity it touches,
//! and the error on failure, then hands the error back to the caller. There is
//! no recovery at this layer; the HTTP layer turns the `AppError` kind into a
//! status code.

use std::sync::Arc;

use log::{debug, error, info, warn};
use serde::Serialize;

use crate::error::AppError;
use crate::models::{CreateTaskInput, DeleteResponse, NewTask, Task, UpdateTaskInput};
use crate::store::TaskStore;

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

fn snapshot<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<unserializable: {}>", e))
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Persists a new task owned by `owner_id`.
    pub async fn create_task(&self, input: CreateTaskInput, owner_id: i32) -> Result<Task, AppError> {
        info!("Creating task for user {}", owner_id);
        let result: Result<Task, AppError> = async {
            let task = NewTask::from_input(input, owner_id)?;
            debug!("Task before save: {}", snapshot(&task));
            let saved = self.store.insert_task(task).await?;
            info!("Task created successfully: {}", saved.id);
            Ok(saved)
        }
        .await;
        result.inspect_err(|e| error!("Failed to create task for user {}: {}", owner_id, e))
    }

    /// Every task in the store, regardless of owner.
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, AppError> {
        info!("Fetching tasks for all users");
        self.store
            .list_tasks()
            .await
            .inspect_err(|e| error!("Failed to fetch tasks for all users: {}", e))
    }

    /// Owner-scoped lookup. A task owned by someone else is reported as missing.
    pub async fn get_task_by_id(&self, id: i32, caller_id: i32) -> Result<Task, AppError> {
        info!("Fetching task with ID {} for user {}", id, caller_id);
        let result: Result<Task, AppError> = async {
            match self.store.find_owned_task(id, caller_id).await? {
                Some(task) => {
                    debug!("Task fetched successfully: {}", snapshot(&task));
                    Ok(task)
                }
                None => {
                    warn!("Task with ID {} not found for user {}", id, caller_id);
                    Err(AppError::NotFound(format!("Task with ID {} not found", id)))
                }
            }
        }
        .await;
        result.inspect_err(|e| {
            error!("Failed to fetch task with ID {} for user {}: {}", id, caller_id, e)
        })
    }

    /// All tasks of `owner_id`. An owner without tasks is a `NotFound`, not an empty list.
    pub async fn get_tasks_by_owner(&self, owner_id: i32) -> Result<Vec<Task>, AppError> {
        info!("Fetching all tasks created by user {}", owner_id);
        let result: Result<Vec<Task>, AppError> = async {
            let tasks = self.store.list_tasks_by_owner(owner_id).await?;
            if tasks.is_empty() {
                warn!("No tasks found for user {}", owner_id);
                return Err(AppError::NotFound(format!(
                    "No tasks found for user {}",
                    owner_id
                )));
            }
            debug!("Tasks fetched successfully: {}", snapshot(&tasks));
            Ok(tasks)
        }
        .await;
        result.inspect_err(|e| {
            error!("Failed to fetch tasks created by the user {}: {}", owner_id, e)
        })
    }

    /// Tasks whose `shared_user` equals `shared_user` exactly, across all owners.
    pub async fn get_shared_tasks(&self, shared_user: &str) -> Result<Vec<Task>, AppError> {
        info!("Fetching shared tasks {}", shared_user);
        self.store
            .list_tasks_by_shared_user(shared_user)
            .await
            .inspect_err(|e| error!("Failed to fetch shared tasks {}: {}", shared_user, e))
    }

    /// Applies the fields present in `input` to a task the caller owns.
    pub async fn update_task(
        &self,
        id: i32,
        input: UpdateTaskInput,
        caller_id: i32,
    ) -> Result<Task, AppError> {
        info!("Updating task {} for user {}", id, caller_id);
        let result: Result<Task, AppError> = async {
            let mut task = self.get_task_by_id(id, caller_id).await?;
            debug!("Task before update: {}", snapshot(&task));

            input.apply(&mut task)?;
            debug!("Task after applying updates: {}", snapshot(&task));

            let updated = self
                .store
                .update_task(&task)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Task with ID {} not found", id)))?;
            info!("Task {} updated successfully", id);
            Ok(updated)
        }
        .await;
        result.inspect_err(|e| error!("Failed to update task {} for user {}: {}", id, caller_id, e))
    }

    pub async fn delete_task(&self, id: i32, caller_id: i32) -> Result<DeleteResponse, AppError> {
        info!("Attempting to delete task {} for user {}", id, caller_id);
        let result: Result<DeleteResponse, AppError> = async {
            let task = self.get_task_by_id(id, caller_id).await?;
            debug!("Task found for deletion: {}", snapshot(&task));

            if !self.store.delete_task(task.id, caller_id).await? {
                warn!("Task with ID {} not found for user {}", id, caller_id);
                return Err(AppError::NotFound(format!("Task with ID {} not found", id)));
            }
            info!("Task {} successfully deleted for user {}", id, caller_id);
            Ok(DeleteResponse {
                message: format!("Task with ID {} was deleted", id),
            })
        }
        .await;
        result.inspect_err(|e| error!("Failed to delete task {} for user {}: {}", id, caller_id, e))
    }
}
