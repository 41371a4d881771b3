use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user as stored in the `users` table.
///
/// Not serializable on purpose; send a [`UserProfile`] to clients instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
}

/// The public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i32,
    pub username: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_has_no_password() {
        let user = User {
            id: 3,
            username: "bizcuit_developer".to_string(),
            password_hash: "$2b$04$abcdefghijklmnopqrstuv".to_string(),
        };
        let json = serde_json::to_value(UserProfile::from(&user)).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 3, "username": "bizcuit_developer" }));
    }
}
