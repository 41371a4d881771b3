use crate::{
    auth::{LoginRequest, RegisterRequest, RegisterResponse},
    error::AppError,
    models::UserProfile,
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates a new user account. The response carries the public profile only.
///
/// ## Responses:
/// - `201 Created`: `{"message": ..., "user": {"id", "username"}}`.
/// - `400 Bad Request`: Missing or empty `username`/`password`.
/// - `409 Conflict`: The username is taken.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let user = state
        .auth
        .register(&register_data.username, &register_data.password)
        .await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully".to_string(),
        user: UserProfile::from(&user),
    }))
}

/// Login user
///
/// Authenticates a user and returns a bearer token.
///
/// ## Responses:
/// - `200 OK`: `{"access_token": ..., "user": {"id", "username"}}`.
/// - `400 Bad Request`: Missing or empty `username`/`password`.
/// - `401 Unauthorized`: Unknown username or wrong password.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = state
        .auth
        .validate_credentials(&login_data.username, &login_data.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

    Ok(HttpResponse::Ok().json(state.auth.login(&user)?))
}
