use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration input
#[derive(Clone, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Login input
#[derive(Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Profile update input; only the display name is mutable here.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileInput {
    pub name: String,
}

/// Credential rotation input
#[derive(Clone, Deserialize)]
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

/// Values for a row that does not exist yet. `password_hash` is already hashed.
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

/// Domain user. Holds the stored hash, so it never leaves the service
/// layer; callers get a [`UserProfile`].
#[derive(Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("name", &self.name)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Public projection of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            name: u.name.clone(),
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

impl From<models::user::Model> for User {
    fn from(m: models::user::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            password_hash: m.password_hash,
            name: m.name,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

/// Login result (session)
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserProfile,
}

/// Refresh result
#[derive(Debug, Clone, Serialize)]
pub struct RefreshedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "a@b.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            name: "A".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn projection_drops_hash() {
        let u = user();
        let json = serde_json::to_value(UserProfile::from(&u)).unwrap();
        assert_eq!(json["email"], "a@b.com");
        assert_eq!(json["id"], u.id.to_string());
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn debug_output_redacts_hash() {
        let printed = format!("{:?}", user());
        assert!(printed.contains("<redacted>"));
        assert!(!printed.contains("argon2"));
    }
}
