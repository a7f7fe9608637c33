//! Auth Middleware
//!
//! Middleware for requiring authentication on protected routes.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use platform::cookie::extract_cookie;

use crate::application::config::ACCESS_COOKIE_NAME;
use crate::domain::gateway::MediaGateway;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// Authenticated identity stored in request extensions
#[derive(Clone)]
pub struct CurrentUser {
    pub user_id: UserId,
    pub username: String,
}

/// Middleware that requires a valid access token
///
/// Accepts the token from the access cookie or an `Authorization:
/// Bearer` header, verifies it, and confirms the user still exists
/// before letting the request through.
pub async fn require_auth<R, M>(
    State(state): State<AuthAppState<R, M>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + Send + Sync + 'static,
    M: MediaGateway + Send + Sync + 'static,
{
    let headers = req.headers();

    let token = extract_cookie(headers, ACCESS_COOKIE_NAME).or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::to_string)
    });

    let Some(token) = token else {
        return Err(AuthError::unauthorized().into_response());
    };

    let claims = state
        .tokens
        .verify_access(&token)
        .map_err(|_| AuthError::Authentication("Invalid access token".to_string()).into_response())?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map(UserId::from_uuid)
        .map_err(|_| {
            AuthError::Authentication("Invalid access token".to_string()).into_response()
        })?;

    // A token that outlives its account must not authenticate
    let user = match state.repo.find_by_id(&user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(AuthError::UserNotFound.into_response()),
        Err(e) => return Err(e.into_response()),
    };

    req.extensions_mut().insert(CurrentUser {
        user_id: user.user_id,
        username: user.username.as_str().to_string(),
    });

    Ok(next.run(req).await)
}
