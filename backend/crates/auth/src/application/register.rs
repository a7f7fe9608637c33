//! Register Use Case
//!
//! Creates a user account with a required avatar and optional cover
//! image. Uploads happen before the insert so a failed avatar upload
//! never leaves a partial user record behind.

use std::path::PathBuf;
use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::{PublicUser, User};
use crate::domain::gateway::MediaGateway;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    /// Local path of the uploaded avatar file (required)
    pub avatar_path: Option<PathBuf>,
    /// Local path of the uploaded cover image file (optional)
    pub cover_image_path: Option<PathBuf>,
}

/// Register use case
pub struct RegisterUseCase<R, M>
where
    R: UserRepository,
    M: MediaGateway,
{
    repo: Arc<R>,
    media: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<R, M> RegisterUseCase<R, M>
where
    R: UserRepository,
    M: MediaGateway,
{
    pub fn new(repo: Arc<R>, media: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            media,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<PublicUser> {
        // Trimmed-empty counts as blank
        if [
            &input.full_name,
            &input.email,
            &input.username,
            &input.password,
        ]
        .iter()
        .any(|field| field.trim().is_empty())
        {
            return Err(AuthError::Validation("All fields are required".to_string()));
        }

        let username = UserName::new(&input.username)
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        let email =
            Email::new(&input.email).map_err(|e| AuthError::Validation(e.to_string()))?;

        // Uniqueness check before any upload, so a conflicting request
        // never touches the media gateway
        if self.repo.exists_by_identifier(&email, &username).await? {
            return Err(AuthError::IdentifierTaken);
        }

        // An empty path counts as missing
        if input
            .avatar_path
            .as_deref()
            .is_none_or(|p| p.as_os_str().is_empty())
        {
            return Err(AuthError::Validation("Avatar file is required".to_string()));
        }

        // Avatar is required: upload failure aborts the registration
        let avatar_url = self
            .media
            .upload(input.avatar_path.as_deref())
            .await?
            .ok_or_else(|| AuthError::Upload("Avatar upload returned no URL".to_string()))?;

        // Cover image is optional: upload failure is tolerated
        let cover_image_url = match self.media.upload(input.cover_image_path.as_deref()).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, "Cover image upload failed, continuing without it");
                None
            }
        };

        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        let password_hash = password
            .hash(self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let user = User::new(
            username,
            email,
            input.full_name.trim().to_string(),
            password_hash,
            avatar_url,
            cover_image_url,
        );

        self.repo.create(&user).await?;

        // Re-read the freshly created record; a miss here is a
        // store-consistency fault
        let created = self
            .repo
            .find_by_id(&user.user_id)
            .await?
            .ok_or_else(|| {
                AuthError::Internal("Something went wrong while registering the user".to_string())
            })?;

        tracing::info!(user_id = %created.user_id, username = %created.username, "User registered");

        Ok(created.public_profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryUserRepository;
    use crate::infra::memory::test_support::FakeMediaGateway;

    fn use_case(
        repo: Arc<InMemoryUserRepository>,
        media: Arc<FakeMediaGateway>,
    ) -> RegisterUseCase<InMemoryUserRepository, FakeMediaGateway> {
        RegisterUseCase::new(repo, media, Arc::new(AuthConfig::development()))
    }

    fn valid_input() -> RegisterInput {
        RegisterInput {
            full_name: "Alice Example".to_string(),
            email: "alice@example.com".to_string(),
            username: "Alice".to_string(),
            password: "CorrectHorse9!".to_string(),
            avatar_path: Some(PathBuf::from("/tmp/avatar.png")),
            cover_image_path: None,
        }
    }

    #[tokio::test]
    async fn test_register_success_lowercases_username() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let media = Arc::new(FakeMediaGateway::succeeding());

        let profile = use_case(repo.clone(), media).execute(valid_input()).await.unwrap();

        assert_eq!(profile.username, "alice");
        assert_eq!(profile.cover_image_url, "");
        assert!(!profile.avatar_url.is_empty());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_blank_field_rejected_without_creating_user() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let media = Arc::new(FakeMediaGateway::succeeding());

        let input = RegisterInput {
            full_name: "   ".to_string(),
            ..valid_input()
        };
        let result = use_case(repo.clone(), media.clone()).execute(input).await;

        assert!(matches!(result, Err(AuthError::Validation(_))));
        assert_eq!(repo.len().await, 0);
        assert_eq!(media.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_identifier_rejected_before_upload() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let media = Arc::new(FakeMediaGateway::succeeding());

        use_case(repo.clone(), media.clone())
            .execute(valid_input())
            .await
            .unwrap();
        let uploads_after_first = media.upload_count();

        let result = use_case(repo.clone(), media.clone())
            .execute(valid_input())
            .await;

        assert!(matches!(result, Err(AuthError::IdentifierTaken)));
        assert_eq!(repo.len().await, 1);
        // No gateway call for the conflicting attempt
        assert_eq!(media.upload_count(), uploads_after_first);
    }

    #[tokio::test]
    async fn test_missing_avatar_rejected() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let media = Arc::new(FakeMediaGateway::succeeding());

        let input = RegisterInput {
            avatar_path: None,
            ..valid_input()
        };
        let result = use_case(repo.clone(), media).execute(input).await;

        assert!(matches!(result, Err(AuthError::Validation(_))));
        assert_eq!(repo.len().await, 0);
    }

    #[tokio::test]
    async fn test_empty_avatar_path_rejected_like_missing() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let media = Arc::new(FakeMediaGateway::succeeding());

        let input = RegisterInput {
            avatar_path: Some(PathBuf::from("")),
            ..valid_input()
        };
        let result = use_case(repo.clone(), media.clone()).execute(input).await;

        assert!(matches!(result, Err(AuthError::Validation(_))));
        assert_eq!(repo.len().await, 0);
        assert_eq!(media.upload_count(), 0);
    }

    #[tokio::test]
    async fn test_failing_avatar_upload_never_creates_user() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let media = Arc::new(FakeMediaGateway::failing());

        let result = use_case(repo.clone(), media).execute(valid_input()).await;

        assert!(matches!(result, Err(AuthError::Upload(_))));
        assert_eq!(repo.len().await, 0);
    }

    #[tokio::test]
    async fn test_failing_cover_upload_is_tolerated() {
        let repo = Arc::new(InMemoryUserRepository::new());
        // Avatar succeeds, cover fails
        let media = Arc::new(FakeMediaGateway::failing_after(1));

        let input = RegisterInput {
            cover_image_path: Some(PathBuf::from("/tmp/cover.png")),
            ..valid_input()
        };
        let profile = use_case(repo.clone(), media).execute(input).await.unwrap();

        assert_eq!(profile.cover_image_url, "");
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_cover_upload_stored_when_it_succeeds() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let media = Arc::new(FakeMediaGateway::succeeding());

        let input = RegisterInput {
            cover_image_path: Some(PathBuf::from("/tmp/cover.png")),
            ..valid_input()
        };
        let profile = use_case(repo, media).execute(input).await.unwrap();

        assert!(!profile.cover_image_url.is_empty());
    }

    #[tokio::test]
    async fn test_weak_password_rejected_as_validation() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let media = Arc::new(FakeMediaGateway::succeeding());

        let input = RegisterInput {
            password: "short".to_string(),
            ..valid_input()
        };
        let result = use_case(repo.clone(), media).execute(input).await;

        assert!(matches!(result, Err(AuthError::Validation(_))));
        assert_eq!(repo.len().await, 0);
    }
}
