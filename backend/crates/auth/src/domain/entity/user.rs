//! User Entity
//!
//! Identity record with credentials and the single current refresh token.
//! The refresh token field is the server-side revocation mechanism: a
//! presented refresh token is only honored while it equals the stored one.

use chrono::{DateTime, Utc};
use platform::password::{ClearTextPassword, HashedPassword};
use serde::Serialize;

use crate::domain::value_object::{email::Email, user_id::UserId, user_name::UserName};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// User name (unique, lowercase canonical form)
    pub username: UserName,
    /// Email address (unique)
    pub email: Email,
    /// Display name
    pub full_name: String,
    /// Argon2id password hash (PHC string)
    pub password_hash: HashedPassword,
    /// Avatar URL (required, set at registration)
    pub avatar_url: String,
    /// Cover image URL (optional)
    pub cover_image_url: Option<String>,
    /// Currently valid refresh token, or None when signed out
    pub refresh_token: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user record
    pub fn new(
        username: UserName,
        email: Email,
        full_name: String,
        password_hash: HashedPassword,
        avatar_url: String,
        cover_image_url: Option<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            username,
            email,
            full_name,
            password_hash,
            avatar_url,
            cover_image_url,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Verify a submitted password against the stored hash
    pub fn verify_password(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        self.password_hash.verify(password, pepper)
    }

    /// Public projection with all secret fields removed
    ///
    /// This is the only user-shaped value ever sent to a client.
    pub fn public_profile(&self) -> PublicUser {
        PublicUser {
            id: self.user_id.to_string(),
            username: self.username.as_str().to_string(),
            email: self.email.as_str().to_string(),
            full_name: self.full_name.clone(),
            avatar_url: self.avatar_url.clone(),
            cover_image_url: self.cover_image_url.clone().unwrap_or_default(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Client-facing user projection (no password hash, no refresh token)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: String,
    /// Empty string when no cover image was uploaded
    pub cover_image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let password = ClearTextPassword::new("CorrectHorse9!".to_string()).unwrap();
        let hash = password.hash(None).unwrap();

        User::new(
            UserName::new("alice").unwrap(),
            Email::new("alice@example.com").unwrap(),
            "Alice Example".to_string(),
            hash,
            "https://cdn.example.com/avatar.png".to_string(),
            None,
        )
    }

    #[test]
    fn test_new_user_has_no_refresh_token() {
        let user = sample_user();
        assert!(user.refresh_token.is_none());
    }

    #[test]
    fn test_verify_password() {
        let user = sample_user();
        let correct = ClearTextPassword::new("CorrectHorse9!".to_string()).unwrap();
        let wrong = ClearTextPassword::new("WrongHorse99!".to_string()).unwrap();

        assert!(user.verify_password(&correct, None));
        assert!(!user.verify_password(&wrong, None));
    }

    #[test]
    fn test_public_profile_strips_secrets() {
        let mut user = sample_user();
        user.refresh_token = Some("some.refresh.token".to_string());

        let json = serde_json::to_value(user.public_profile()).unwrap();

        assert_eq!(json["username"], "alice");
        assert_eq!(json["fullName"], "Alice Example");
        assert_eq!(json["coverImageUrl"], "");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
        assert!(json.get("refreshToken").is_none());
    }
}
