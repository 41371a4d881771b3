use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::error::AppError;

/// Default value of both `category` and `sharedUser`.
pub const DEFAULT_LABEL: &str = "General";

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub category: String,
    pub due_date: Option<DateTime<Utc>>,
    /// Whether the task is shared with another user.
    pub shared_task: bool,
    /// Free-text name of the user the task is shared with. Not a foreign key.
    pub shared_user: String,
    pub completed: bool,
    /// Owner of the task. Always taken from the verified token, never from a request body.
    pub user_id: i32,
}

/// A task that has not been persisted yet. Defaults are already applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub category: String,
    pub due_date: Option<DateTime<Utc>>,
    pub shared_task: bool,
    pub shared_user: String,
    pub completed: bool,
    pub user_id: i32,
}

/// Request body for `POST /tasks`.
///
/// Has no owner field; unknown fields such as `userId` are ignored during
/// deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    /// Must be between 1 and 255 characters.
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// ISO-8601 date or timestamp.
    #[validate(custom = "validate_due_date")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_task: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Request body for `PUT /tasks/{id}`. Only the fields present are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskInput {
    #[validate(length(min = 1, max = 255))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[validate(custom = "validate_due_date")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_task: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Response body for `DELETE /tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Parses an ISO-8601 due date.
///
/// Accepts a full RFC 3339 timestamp or a bare `YYYY-MM-DD` date, which is
/// taken as midnight UTC.
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| {
            AppError::ValidationError(format!("dueDate must be an ISO 8601 date string: {}", raw))
        })
}

fn validate_due_date(raw: &str) -> Result<(), ValidationError> {
    parse_due_date(raw)
        .map(|_| ())
        .map_err(|_| ValidationError::new("iso_date"))
}

impl NewTask {
    /// Builds a task owned by `owner_id`, applying the column defaults.
    pub fn from_input(input: CreateTaskInput, owner_id: i32) -> Result<Self, AppError> {
        let due_date = input.due_date.as_deref().map(parse_due_date).transpose()?;
        Ok(Self {
            title: input.title,
            description: input.description,
            category: input.category.unwrap_or_else(|| DEFAULT_LABEL.to_string()),
            due_date,
            shared_task: input.shared_task.unwrap_or(false),
            shared_user: input.shared_user.unwrap_or_else(|| DEFAULT_LABEL.to_string()),
            completed: input.completed.unwrap_or(false),
            user_id: owner_id,
        })
    }

    pub fn into_task(self, id: i32) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            due_date: self.due_date,
            shared_task: self.shared_task,
            shared_user: self.shared_user,
            completed: self.completed,
            user_id: self.user_id,
        }
    }
}

impl UpdateTaskInput {
    /// Overwrites the fields of `task` that are present in this update.
    /// The owner and id are never touched.
    pub fn apply(self, task: &mut Task) -> Result<(), AppError> {
        if let Some(raw) = self.due_date.as_deref() {
            task.due_date = Some(parse_due_date(raw)?);
        }
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(shared_task) = self.shared_task {
            task.shared_task = shared_task;
        }
        if let Some(shared_user) = self.shared_user {
            task.shared_user = shared_user;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        Ok(())
    }
}
