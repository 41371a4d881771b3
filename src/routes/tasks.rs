use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{CreateTaskInput, UpdateTaskInput},
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

/// Retrieves every task in the system, regardless of owner.
///
/// ## Responses:
/// - `200 OK`: Returns a JSON array of `Task` objects ordered by id.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    _user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.get_all_tasks().await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user.
///
/// Any `userId` in the body is ignored; the owner always comes from the token.
/// Omitted `category`/`sharedUser` default to `"General"`, omitted booleans to `false`.
///
/// ## Responses:
/// - `201 Created`: Returns the created `Task`.
/// - `400 Bad Request`: Missing `title`/`description`, or an unparseable `dueDate`.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
    task_data: web::Json<CreateTaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task = state
        .tasks
        .create_task(task_data.into_inner(), user.0)
        .await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves all tasks owned by `userId`.
///
/// ## Responses:
/// - `200 OK`: Returns a non-empty JSON array of `Task` objects.
/// - `400 Bad Request`: `userId` is not an integer.
/// - `404 Not Found`: The user owns no tasks.
#[get("/userId/{user_id}")]
pub async fn get_tasks_by_user(
    state: web::Data<AppState>,
    _user: AuthenticatedUserId,
    owner_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.get_tasks_by_owner(owner_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Retrieves tasks whose `sharedUser` matches the path segment exactly.
///
/// An unknown label yields `200 OK` with an empty array.
#[get("/shared/{shared_user}")]
pub async fn get_shared_tasks(
    state: web::Data<AppState>,
    _user: AuthenticatedUserId,
    shared_user: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.get_shared_tasks(&shared_user).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Retrieves a single task owned by the authenticated user.
///
/// ## Responses:
/// - `200 OK`: Returns the `Task`.
/// - `400 Bad Request`: `id` is not an integer.
/// - `404 Not Found`: No such task, or it belongs to another user.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .get_task_by_id(task_id.into_inner(), user.0)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task owned by the authenticated user.
///
/// Only the fields present in the body change; `id` and `userId` never do.
///
/// ## Responses:
/// - `200 OK`: Returns the updated `Task`.
/// - `400 Bad Request`: Invalid `id`, empty `title` or unparseable `dueDate`.
/// - `404 Not Found`: No such task, or it belongs to another user.
#[put("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
    task_id: web::Path<i32>,
    task_data: web::Json<UpdateTaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task = state
        .tasks
        .update_task(task_id.into_inner(), task_data.into_inner(), user.0)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task owned by the authenticated user.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task with ID <id> was deleted"}`.
/// - `400 Bad Request`: `id` is not an integer.
/// - `404 Not Found`: No such task, or it belongs to another user.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let response = state
        .tasks
        .delete_task(task_id.into_inner(), user.0)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
