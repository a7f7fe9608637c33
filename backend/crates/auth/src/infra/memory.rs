//! In-Memory Repository Implementation
//!
//! HashMap-backed store for local development and tests. The refresh
//! token swap runs under the write lock, giving the same
//! compare-then-write atomicity the SQL conditional update provides.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_id::UserId, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// In-memory user repository
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;

        let taken = users.values().any(|existing| {
            existing.email == user.email || existing.username == user.username
        });
        if taken {
            return Err(AuthError::IdentifierTaken);
        }

        users.insert(user.user_id.into_uuid(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.read().await.get(user_id.as_uuid()).cloned())
    }

    async fn find_by_identifier(
        &self,
        email: Option<&Email>,
        username: Option<&UserName>,
    ) -> AuthResult<Option<User>> {
        let users = self.users.read().await;

        Ok(users
            .values()
            .find(|user| {
                email.is_some_and(|e| &user.email == e)
                    || username.is_some_and(|u| &user.username == u)
            })
            .cloned())
    }

    async fn exists_by_identifier(&self, email: &Email, username: &UserName) -> AuthResult<bool> {
        let users = self.users.read().await;

        Ok(users
            .values()
            .any(|user| &user.email == email || &user.username == username))
    }

    async fn set_refresh_token(&self, user_id: &UserId, token: Option<&str>) -> AuthResult<()> {
        let mut users = self.users.write().await;

        if let Some(user) = users.get_mut(user_id.as_uuid()) {
            user.refresh_token = token.map(str::to_string);
            user.updated_at = chrono::Utc::now();
        }

        Ok(())
    }

    async fn swap_refresh_token(
        &self,
        user_id: &UserId,
        current: &str,
        next: &str,
    ) -> AuthResult<bool> {
        let mut users = self.users.write().await;

        let Some(user) = users.get_mut(user_id.as_uuid()) else {
            return Ok(false);
        };

        if user.refresh_token.as_deref() != Some(current) {
            return Ok(false);
        }

        user.refresh_token = Some(next.to_string());
        user.updated_at = chrono::Utc::now();
        Ok(true)
    }
}

// ============================================================================
// Test Support
// ============================================================================

#[cfg(test)]
pub mod test_support {
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use platform::password::ClearTextPassword;

    use super::*;
    use crate::domain::gateway::MediaGateway;

    /// Seed a user with the given credentials and return the stored record
    pub async fn seed_user(
        repo: &InMemoryUserRepository,
        username: &str,
        email: &str,
        password: &str,
    ) -> User {
        let hash = ClearTextPassword::new(password.to_string())
            .unwrap()
            .hash(None)
            .unwrap();

        let user = User::new(
            UserName::new(username).unwrap(),
            Email::new(email).unwrap(),
            format!("{username} Example"),
            hash,
            "https://cdn.example.com/avatar.png".to_string(),
            None,
        );

        repo.create(&user).await.unwrap();
        user
    }

    /// Media gateway stub with a configurable failure point
    ///
    /// Only calls with an actual path are counted; an absent path stays
    /// the contractual no-op success.
    pub struct FakeMediaGateway {
        uploads: AtomicUsize,
        fail_from: usize,
    }

    impl FakeMediaGateway {
        /// Every upload succeeds
        pub fn succeeding() -> Self {
            Self {
                uploads: AtomicUsize::new(0),
                fail_from: usize::MAX,
            }
        }

        /// Every upload fails
        pub fn failing() -> Self {
            Self::failing_after(0)
        }

        /// The first `n` uploads succeed, the rest fail
        pub fn failing_after(n: usize) -> Self {
            Self {
                uploads: AtomicUsize::new(0),
                fail_from: n,
            }
        }

        /// Number of uploads attempted with an actual file path
        pub fn upload_count(&self) -> usize {
            self.uploads.load(Ordering::SeqCst)
        }
    }

    impl MediaGateway for FakeMediaGateway {
        async fn upload(&self, local_path: Option<&Path>) -> AuthResult<Option<String>> {
            let Some(path) = local_path.filter(|p| !p.as_os_str().is_empty()) else {
                return Ok(None);
            };

            let index = self.uploads.fetch_add(1, Ordering::SeqCst);
            if index >= self.fail_from {
                return Err(AuthError::Upload("stub upload failure".to_string()));
            }

            Ok(Some(format!(
                "https://cdn.example.com/{}",
                path.file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("upload.bin")
            )))
        }
    }
}
