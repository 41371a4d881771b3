use std::time::Duration;

use log::{debug, info, warn};

use super::{ApiClient, ClientError, TaskCache};
use crate::models::{CreateTaskInput, DeleteResponse, Task, UpdateTaskInput, UserProfile};

/// Retry schedule for reads. Mutations are never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based): `base * 2^attempt`, capped.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

/// A transient, user-facing message about a mutation's outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// A logged-in view of the task API for one user at a time.
pub struct TaskBoard {
    api: ApiClient,
    user: Option<UserProfile>,
    cache: TaskCache,
    retry: RetryPolicy,
    notices: Vec<Notice>,
}

impl TaskBoard {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api: ApiClient::new(base_url),
            user: None,
            cache: TaskCache::default(),
            retry: RetryPolicy::default(),
            notices: Vec::new(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cache(mut self, cache: TaskCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &TaskCache {
        &self.cache
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<UserProfile, ClientError> {
        let response = self.api.register(username, password).await?;
        info!("{}: {}", response.message, response.user.username);
        Ok(response.user)
    }

    /// Logs in and keeps the token for subsequent calls.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<UserProfile, ClientError> {
        let response = self.api.login(username, password).await?;
        if let Some(previous) = self.user.take() {
            if previous.id != response.user.id {
                self.cache.clear_user(previous.id);
            }
        }
        self.api.set_token(response.access_token);
        self.user = Some(response.user.clone());
        info!("Logged in as {}", response.user.username);
        Ok(response.user)
    }

    /// Forgets the token and the user, and drops that user's cached tasks.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            self.cache.clear_user(user.id);
            info!("Logged out {}", user.username);
        }
        self.api.clear_token();
    }

    fn current_user_id(&self) -> Result<i32, ClientError> {
        self.user
            .as_ref()
            .map(|user| user.id)
            .ok_or(ClientError::MissingToken)
    }

    /// The current user's tasks, from cache while fresh.
    ///
    /// A `404` from the server means the user owns no tasks and is returned as
    /// an empty list. Other failures are retried per the [`RetryPolicy`]; once
    /// retries run out, a stale list still within the eviction window is served
    /// instead of the error.
    pub async fn tasks(&mut self) -> Result<Vec<Task>, ClientError> {
        let user_id = self.current_user_id()?;
        if let Some(tasks) = self.cache.get_fresh(user_id) {
            debug!("Serving {} cached tasks for user {}", tasks.len(), user_id);
            return Ok(tasks);
        }

        let mut attempt = 0;
        let tasks = loop {
            match self.api.list_tasks_for_user(user_id).await {
                Ok(tasks) => break tasks,
                Err(e) if e.is_not_found() => break Vec::new(),
                Err(e) if attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for(attempt);
                    warn!("Fetching tasks failed ({}), retrying in {:?}", e, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => match self.cache.peek(user_id) {
                    Some(stale) => {
                        warn!("Fetching tasks failed ({}), serving {} stale tasks", e, stale.len());
                        return Ok(stale);
                    }
                    None => return Err(e),
                },
            }
        };

        self.cache.put(user_id, tasks.clone());
        Ok(tasks)
    }

    pub async fn create_task(&mut self, input: &CreateTaskInput) -> Result<Task, ClientError> {
        let user_id = self.current_user_id()?;
        let result = self.api.create_task(input).await;
        match &result {
            Ok(_) => {
                self.cache.invalidate(user_id);
                self.notify(Notice::Success("Task created successfully!".to_string()));
            }
            Err(e) => self.notify(Notice::Error(format!("Failed to create task: {}", e))),
        }
        result
    }

    pub async fn update_task(&mut self, id: i32, input: &UpdateTaskInput) -> Result<Task, ClientError> {
        let user_id = self.current_user_id()?;
        let result = self.api.update_task(id, input).await;
        match &result {
            Ok(task) => {
                self.cache.upsert(user_id, task.clone());
                self.notify(Notice::Success(format!("Task {} updated successfully!", id)));
            }
            Err(e) => self.notify(Notice::Error(format!("Failed to update task {}: {}", id, e))),
        }
        result
    }

    pub async fn delete_task(&mut self, id: i32) -> Result<DeleteResponse, ClientError> {
        let user_id = self.current_user_id()?;
        let result = self.api.delete_task(id).await;
        match &result {
            Ok(_) => {
                self.cache.remove(user_id, id);
                self.notify(Notice::Success(format!("Task {} deleted successfully!", id)));
            }
            Err(e) => self.notify(Notice::Error(format!("Failed to delete task {}: {}", id, e))),
        }
        result
    }

    fn notify(&mut self, notice: Notice) {
        debug!("Notice: {:?}", notice);
        self.notices.push(notice);
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Returns and clears the pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
