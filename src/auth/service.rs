use std::sync::Arc;

use log::{info, warn};

use super::{hash_password, verify_password, LoginResponse, TokenService};
use crate::error::AppError;
use crate::models::{User, UserProfile};
use crate::store::UserStore;

/// Registration and login on top of a [`UserStore`].
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
        }
    }

    /// Creates a user with a hashed password. A taken username is a `Conflict`.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AppError> {
        info!("Registering user {}", username);
        if self.users.find_by_username(username).await?.is_some() {
            warn!("Username {} already exists", username);
            return Err(AppError::Conflict("Username already exists".into()));
        }

        let password_hash = hash_password(password, self.bcrypt_cost)?;
        // The unique constraint still decides when two registrations race.
        let user = self
            .users
            .create_user(username, &password_hash)
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => AppError::Conflict("Username already exists".into()),
                other => other,
            })?;
        info!("User {} registered with id {}", user.username, user.id);
        Ok(user)
    }

    /// Returns the user only when `password` matches the stored hash.
    pub async fn validate_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            warn!("Login attempt for unknown user {}", username);
            return Ok(None);
        };
        if verify_password(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            warn!("Invalid password for user {}", username);
            Ok(None)
        }
    }

    /// Issues a bearer token for an already authenticated user.
    pub fn login(&self, user: &User) -> Result<LoginResponse, AppError> {
        let access_token = self.tokens.generate_token(user)?;
        info!("User {} logged in", user.id);
        Ok(LoginResponse {
            access_token,
            user: UserProfile::from(user),
        })
    }
}
