//! Auth Router

use axum::{Router, middleware, routing::post};
use std::sync::Arc;

use sqlx::PgPool;

use crate::application::config::AuthConfig;
use crate::domain::gateway::MediaGateway;
use crate::domain::repository::UserRepository;
use crate::infra::media::HttpMediaGateway;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_auth;
use crate::token::TokenConfigError;

/// Create the user session router backed by PostgreSQL
pub fn user_router(
    pool: PgPool,
    media: HttpMediaGateway,
    config: AuthConfig,
) -> Result<Router, TokenConfigError> {
    user_router_generic(PgUserRepository::new(pool), media, config)
}

/// Create the user session router for any repository/gateway pair
pub fn user_router_generic<R, M>(
    repo: R,
    media: M,
    config: AuthConfig,
) -> Result<Router, TokenConfigError>
where
    R: UserRepository + Send + Sync + 'static,
    M: MediaGateway + Send + Sync + 'static,
{
    let state = AuthAppState::new(Arc::new(repo), Arc::new(media), config)?;

    Ok(Router::new()
        .route("/register", post(handlers::register::<R, M>))
        .route("/login", post(handlers::login::<R, M>))
        .route("/refresh-token", post(handlers::refresh::<R, M>))
        .route(
            "/logout",
            post(handlers::logout::<R, M>).layer(middleware::from_fn_with_state(
                state.clone(),
                require_auth::<R, M>,
            )),
        )
        .with_state(state))
}
