//! Logout Use Case
//!
//! Clears the stored refresh token so the pair issued at login can no
//! longer be rotated. Idempotent: logging out twice is fine.

use std::sync::Arc;

use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthResult;

/// Logout use case
pub struct LogoutUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> LogoutUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// The caller is already authenticated via the access token, so no
    /// refresh-token comparison is needed here.
    pub async fn execute(&self, user_id: &UserId) -> AuthResult<()> {
        self.repo.set_refresh_token(user_id, None).await?;

        tracing::info!(user_id = %user_id, "User logged out");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryUserRepository;
    use crate::infra::memory::test_support::seed_user;

    #[tokio::test]
    async fn test_logout_clears_refresh_token() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let user = seed_user(&repo, "alice", "alice@example.com", "CorrectHorse9!").await;

        repo.set_refresh_token(&user.user_id, Some("some.refresh.token"))
            .await
            .unwrap();

        LogoutUseCase::new(repo.clone())
            .execute(&user.user_id)
            .await
            .unwrap();

        let stored = repo.find_by_id(&user.user_id).await.unwrap().unwrap();
        assert!(stored.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let user = seed_user(&repo, "alice", "alice@example.com", "CorrectHorse9!").await;

        let use_case = LogoutUseCase::new(repo.clone());
        use_case.execute(&user.user_id).await.unwrap();
        use_case.execute(&user.user_id).await.unwrap();
    }
}
