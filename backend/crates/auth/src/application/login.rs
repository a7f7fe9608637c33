//! Login Use Case
//!
//! Verifies credentials and mints a fresh access/refresh token pair.
//! The new refresh token is persisted on the user record, superseding
//! any token from a previous login.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::PublicUser;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{AuthError, AuthResult};
use crate::token::TokenService;

/// Login input
pub struct LoginInput {
    /// User name (either this or email must be present)
    pub username: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Password
    pub password: String,
}

/// Login output
#[derive(Debug)]
pub struct LoginOutput {
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
    config: Arc<AuthConfig>,
}

impl<R> LoginUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        let has_username = input
            .username
            .as_deref()
            .is_some_and(|u| !u.trim().is_empty());
        let has_email = input.email.as_deref().is_some_and(|e| !e.trim().is_empty());

        if !has_username && !has_email {
            return Err(AuthError::Validation(
                "Username or email is required".to_string(),
            ));
        }

        // A syntactically broken identifier cannot match any stored user,
        // so it fails exactly like an unknown one
        let email = match input.email.as_deref().filter(|_| has_email) {
            Some(raw) => Some(Email::new(raw).map_err(|_| AuthError::invalid_credentials())?),
            None => None,
        };
        let username = match input.username.as_deref().filter(|_| has_username) {
            Some(raw) => {
                Some(UserName::new(raw).map_err(|_| AuthError::invalid_credentials())?)
            }
            None => None,
        };

        let user = self
            .repo
            .find_by_identifier(email.as_ref(), username.as_ref())
            .await?
            .ok_or_else(AuthError::invalid_credentials)?;

        let password = ClearTextPassword::new(input.password)
            .map_err(|_| AuthError::invalid_credentials())?;

        if !user.verify_password(&password, self.config.pepper()) {
            return Err(AuthError::invalid_credentials());
        }

        let access_token = self
            .tokens
            .sign_access(&user.user_id, user.username.as_str(), user.email.as_str())
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let refresh_token = self
            .tokens
            .sign_refresh(&user.user_id)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        // The only write in this flow
        self.repo
            .set_refresh_token(&user.user_id, Some(&refresh_token))
            .await?;

        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(LoginOutput {
            user: user.public_profile(),
            access_token,
            refresh_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryUserRepository;
    use crate::infra::memory::test_support::seed_user;

    fn use_case(repo: Arc<InMemoryUserRepository>) -> LoginUseCase<InMemoryUserRepository> {
        let config = Arc::new(AuthConfig::development());
        let tokens = Arc::new(config.token_service().unwrap());
        LoginUseCase::new(repo, tokens, config)
    }

    #[tokio::test]
    async fn test_login_with_username() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let user = seed_user(&repo, "alice", "alice@example.com", "CorrectHorse9!").await;

        let output = use_case(repo.clone())
            .execute(LoginInput {
                username: Some("alice".to_string()),
                email: None,
                password: "CorrectHorse9!".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(output.user.username, "alice");
        assert!(!output.access_token.is_empty());
        assert!(!output.refresh_token.is_empty());

        // The minted refresh token is persisted
        let stored = repo.find_by_id(&user.user_id).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some(output.refresh_token.as_str()));
    }

    #[tokio::test]
    async fn test_login_with_email() {
        let repo = Arc::new(InMemoryUserRepository::new());
        seed_user(&repo, "alice", "alice@example.com", "CorrectHorse9!").await;

        let output = use_case(repo)
            .execute(LoginInput {
                username: None,
                email: Some("alice@example.com".to_string()),
                password: "CorrectHorse9!".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(output.user.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_missing_identifier_rejected() {
        let repo = Arc::new(InMemoryUserRepository::new());

        let result = use_case(repo)
            .execute(LoginInput {
                username: Some("  ".to_string()),
                email: None,
                password: "CorrectHorse9!".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_read_the_same() {
        let repo = Arc::new(InMemoryUserRepository::new());
        seed_user(&repo, "alice", "alice@example.com", "CorrectHorse9!").await;

        let wrong_password = use_case(repo.clone())
            .execute(LoginInput {
                username: Some("alice".to_string()),
                email: None,
                password: "WrongHorse99!".to_string(),
            })
            .await
            .unwrap_err();

        let unknown_user = use_case(repo)
            .execute(LoginInput {
                username: Some("nobody".to_string()),
                email: None,
                password: "CorrectHorse9!".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert!(matches!(wrong_password, AuthError::Authentication(_)));
        assert!(matches!(unknown_user, AuthError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_projection_contains_no_secrets() {
        let repo = Arc::new(InMemoryUserRepository::new());
        seed_user(&repo, "alice", "alice@example.com", "CorrectHorse9!").await;

        let output = use_case(repo)
            .execute(LoginInput {
                username: Some("alice".to_string()),
                email: None,
                password: "CorrectHorse9!".to_string(),
            })
            .await
            .unwrap();

        let json = serde_json::to_value(&output.user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("refreshToken").is_none());
    }
}
