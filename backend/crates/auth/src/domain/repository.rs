//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_id::UserId, user_name::UserName};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    ///
    /// Fails with a conflict if either unique identifier already exists.
    /// Callers pre-check; the store enforces uniqueness as a backstop.
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Find user by email or username (logical OR)
    async fn find_by_identifier(
        &self,
        email: Option<&Email>,
        username: Option<&UserName>,
    ) -> AuthResult<Option<User>>;

    /// Check if a user exists with either identifier
    async fn exists_by_identifier(&self, email: &Email, username: &UserName) -> AuthResult<bool>;

    /// Set or clear the stored refresh token
    ///
    /// Single-field update; never touches the rest of the record.
    async fn set_refresh_token(&self, user_id: &UserId, token: Option<&str>) -> AuthResult<()>;

    /// Atomically replace `current` refresh token with `next`
    ///
    /// Returns false when the stored token no longer equals `current`,
    /// which means another refresh already consumed it. Of two
    /// concurrent rotations with the same token, at most one succeeds.
    async fn swap_refresh_token(
        &self,
        user_id: &UserId,
        current: &str,
        next: &str,
    ) -> AuthResult<bool>;
}
