//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::{AppendHeaders, IntoResponse};
use std::path::PathBuf;
use std::sync::Arc;

use kernel::response::ApiResponse;
use platform::cookie::extract_cookie;

use crate::application::config::{AuthConfig, REFRESH_COOKIE_NAME};
use crate::application::{
    LoginInput, LoginUseCase, LogoutUseCase, RefreshUseCase, RegisterInput, RegisterUseCase,
};
use crate::domain::entity::user::PublicUser;
use crate::domain::gateway::MediaGateway;
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{LoginRequest, RefreshRequest, RegisterRequest, SessionResponse};
use crate::presentation::middleware::CurrentUser;
use crate::token::{TokenConfigError, TokenService};

/// Shared state for auth handlers
pub struct AuthAppState<R, M>
where
    R: UserRepository + Send + Sync + 'static,
    M: MediaGateway + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub media: Arc<M>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<AuthConfig>,
}

// Manual impl: a derived Clone would require R: Clone and M: Clone
impl<R, M> Clone for AuthAppState<R, M>
where
    R: UserRepository + Send + Sync + 'static,
    M: MediaGateway + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            media: self.media.clone(),
            tokens: self.tokens.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R, M> AuthAppState<R, M>
where
    R: UserRepository + Send + Sync + 'static,
    M: MediaGateway + Send + Sync + 'static,
{
    /// Build handler state, validating the signing secrets up front
    pub fn new(repo: Arc<R>, media: Arc<M>, config: AuthConfig) -> Result<Self, TokenConfigError> {
        let tokens = Arc::new(config.token_service()?);

        Ok(Self {
            repo,
            media,
            tokens,
            config: Arc::new(config),
        })
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /register
pub async fn register<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<ApiResponse<PublicUser>>
where
    R: UserRepository + Send + Sync + 'static,
    M: MediaGateway + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.media.clone(),
        state.config.clone(),
    );

    let input = RegisterInput {
        full_name: req.full_name,
        email: req.email,
        username: req.username,
        password: req.password,
        // Empty path strings mean "no file", same as omitting the field
        avatar_path: req
            .avatar_path
            .filter(|p| !p.is_empty())
            .map(PathBuf::from),
        cover_image_path: req
            .cover_image_path
            .filter(|p| !p.is_empty())
            .map(PathBuf::from),
    };

    let profile = use_case.execute(input).await?;

    Ok(ApiResponse::created(
        profile,
        "User registered successfully",
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
pub async fn login<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Send + Sync + 'static,
    M: MediaGateway + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.tokens.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            username: req.username,
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookies = session_cookies(&state.config, &output.access_token, &output.refresh_token);

    Ok((
        cookies,
        ApiResponse::ok(
            SessionResponse {
                user: output.user,
                access_token: output.access_token,
                refresh_token: output.refresh_token,
            },
            "User logged in successfully",
        ),
    ))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /logout (requires authentication)
pub async fn logout<R, M>(
    State(state): State<AuthAppState<R, M>>,
    axum::Extension(current): axum::Extension<CurrentUser>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Send + Sync + 'static,
    M: MediaGateway + Send + Sync + 'static,
{
    LogoutUseCase::new(state.repo.clone())
        .execute(&current.user_id)
        .await?;

    let cookies = clear_session_cookies(&state.config);

    Ok((
        cookies,
        ApiResponse::ok(serde_json::json!({}), "User logged out successfully"),
    ))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /refresh-token
///
/// The refresh token comes from the cookie when present, falling back
/// to the request body for non-cookie clients.
pub async fn refresh<R, M>(
    State(state): State<AuthAppState<R, M>>,
    headers: HeaderMap,
    body: Option<Json<RefreshRequest>>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Send + Sync + 'static,
    M: MediaGateway + Send + Sync + 'static,
{
    let presented = extract_cookie(&headers, REFRESH_COOKIE_NAME)
        .or_else(|| body.and_then(|Json(req)| req.refresh_token));

    let use_case = RefreshUseCase::new(state.repo.clone(), state.tokens.clone());
    let output = use_case.execute(presented.as_deref()).await?;

    let cookies = session_cookies(&state.config, &output.access_token, &output.refresh_token);

    Ok((
        cookies,
        ApiResponse::ok(
            SessionResponse {
                user: output.user,
                access_token: output.access_token,
                refresh_token: output.refresh_token,
            },
            "Access token refreshed",
        ),
    ))
}

// ============================================================================
// Helper Functions
// ============================================================================

type SetCookiePair = AppendHeaders<[(header::HeaderName, String); 2]>;

fn session_cookies(config: &AuthConfig, access: &str, refresh: &str) -> SetCookiePair {
    AppendHeaders([
        (
            header::SET_COOKIE,
            config.access_cookie().build_set_cookie(access),
        ),
        (
            header::SET_COOKIE,
            config.refresh_cookie().build_set_cookie(refresh),
        ),
    ])
}

fn clear_session_cookies(config: &AuthConfig) -> SetCookiePair {
    AppendHeaders([
        (
            header::SET_COOKIE,
            config.access_cookie().build_delete_cookie(),
        ),
        (
            header::SET_COOKIE,
            config.refresh_cookie().build_delete_cookie(),
        ),
    ])
}
