use crate::{error::AppError, models::UserProfile, state::AppState};
use actix_web::{get, web, HttpResponse, Responder};

/// Lists every registered user as `{id, username}`. Requires a bearer token.
#[get("")]
pub async fn list_users(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let users = state.users.list_users().await?;
    let profiles: Vec<UserProfile> = users.iter().map(UserProfile::from).collect();
    Ok(HttpResponse::Ok().json(profiles))
}
