//! HTTP client for the task API.
//!
//! [`ApiClient`] is a thin typed wrapper over the REST endpoints. [`TaskBoard`]
//! layers a logged-in session on top of it: the bearer token, a per-user task
//! cache and a queue of user-facing notices for mutation outcomes.

pub mod cache;
pub mod session;

use std::fmt;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::auth::{LoginResponse, RegisterResponse};
use crate::models::{CreateTaskInput, DeleteResponse, Task, UpdateTaskInput};

pub use cache::TaskCache;
pub use session::{Notice, RetryPolicy, TaskBoard};

#[derive(Debug)]
pub enum ClientError {
    /// Transport or decoding failure.
    Http(reqwest::Error),
    /// The server answered with a non-success status.
    Api { status: u16, message: String },
    /// The call needs a bearer token and none is set.
    MissingToken,
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status, .. } if *status == StatusCode::NOT_FOUND.as_u16())
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClientError::Http(e) => write!(f, "Network error: {}", e),
            ClientError::Api { status, message } => write!(f, "{} ({})", message, status),
            ClientError::MissingToken => write!(f, "Not logged in"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        ClientError::Http(error)
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.token.as_deref().ok_or(ClientError::MissingToken)?;
        Ok(request.bearer_auth(token))
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<RegisterResponse, ClientError> {
        let request = self
            .http
            .post(self.url("/auth/register"))
            .json(&json!({ "username": username, "password": password }));
        parse(request.send().await?).await
    }

    /// Exchanges credentials for a token. Does not store the token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let request = self
            .http
            .post(self.url("/auth/login"))
            .json(&json!({ "username": username, "password": password }));
        parse(request.send().await?).await
    }

    pub async fn list_tasks_for_user(&self, user_id: i32) -> Result<Vec<Task>, ClientError> {
        let request = self.authorized(self.http.get(self.url(&format!("/tasks/userId/{}", user_id))))?;
        parse(request.send().await?).await
    }

    pub async fn get_task(&self, id: i32) -> Result<Task, ClientError> {
        let request = self.authorized(self.http.get(self.url(&format!("/tasks/{}", id))))?;
        parse(request.send().await?).await
    }

    pub async fn create_task(&self, input: &CreateTaskInput) -> Result<Task, ClientError> {
        let request = self.authorized(self.http.post(self.url("/tasks")))?.json(input);
        parse(request.send().await?).await
    }

    pub async fn update_task(&self, id: i32, input: &UpdateTaskInput) -> Result<Task, ClientError> {
        let request = self
            .authorized(self.http.put(self.url(&format!("/tasks/{}", id))))?
            .json(input);
        parse(request.send().await?).await
    }

    pub async fn delete_task(&self, id: i32) -> Result<DeleteResponse, ClientError> {
        let request = self.authorized(self.http.delete(self.url(&format!("/tasks/{}", id))))?;
        parse(request.send().await?).await
    }
}

/// Decodes a success body, or turns an `{"error": ...}` body into [`ClientError::Api`].
async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| status.to_string());
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
