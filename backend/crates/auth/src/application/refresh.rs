//! Refresh Use Case
//!
//! Rotates a refresh token: the presented token must verify AND still
//! equal the one stored on the user record. Rotation mints a brand-new
//! pair and swaps the stored token in a single conditional update, so
//! of two concurrent attempts with the same token at most one wins.
//! A verified-but-superseded token is the reuse-detection signal and is
//! rejected as stale.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entity::user::PublicUser;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};
use crate::token::{TokenError, TokenService};

/// Refresh output
#[derive(Debug)]
pub struct RefreshOutput {
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh use case
pub struct RefreshUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenService>,
}

impl<R> RefreshUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }

    pub async fn execute(&self, presented: Option<&str>) -> AuthResult<RefreshOutput> {
        let presented = presented
            .filter(|t| !t.is_empty())
            .ok_or_else(AuthError::unauthorized)?;

        let claims = self.tokens.verify_refresh(presented).map_err(|e| match e {
            TokenError::Expired => {
                AuthError::Authentication("Refresh token has expired".to_string())
            }
            TokenError::InvalidSignature | TokenError::Malformed => {
                AuthError::Authentication("Invalid refresh token".to_string())
            }
        })?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map(UserId::from_uuid)
            .map_err(|_| AuthError::Authentication("Invalid refresh token".to_string()))?;

        let user = self
            .repo
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AuthError::Authentication("Invalid refresh token".to_string()))?;

        // Reuse-detection gate: a well-formed, unexpired token that is
        // not the stored one has been superseded (or the user logged out)
        if user.refresh_token.as_deref() != Some(presented) {
            return Err(AuthError::stale_refresh_token());
        }

        let access_token = self
            .tokens
            .sign_access(&user.user_id, user.username.as_str(), user.email.as_str())
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        let next_refresh = self
            .tokens
            .sign_refresh(&user.user_id)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        // Conditional swap: fails when a concurrent refresh already
        // consumed the presented token between our read and this write
        let swapped = self
            .repo
            .swap_refresh_token(&user.user_id, presented, &next_refresh)
            .await?;
        if !swapped {
            return Err(AuthError::stale_refresh_token());
        }

        tracing::info!(user_id = %user.user_id, "Refresh token rotated");

        Ok(RefreshOutput {
            user: user.public_profile(),
            access_token,
            refresh_token: next_refresh,
        })
    }
}
