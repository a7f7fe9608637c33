//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository and gateway traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database and media gateway implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - User registration with avatar/cover media attachment
//! - Login with username or email + password
//! - Dual-token session model: short-lived access JWT, long-lived
//!   refresh JWT, delivered via httpOnly cookies and response body
//! - Refresh token rotation with reuse detection (single valid refresh
//!   token per user, atomically swapped on every refresh)
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (NIST SP 800-63B compliant)
//! - Access and refresh tokens signed with distinct secrets
//! - A refresh token is honored only while it equals the stored one;
//!   anything else is treated as consumed or revoked

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;
pub mod token;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::media::HttpMediaGateway;
pub use infra::postgres::PgUserRepository;
pub use presentation::router::{user_router, user_router_generic};
pub use token::TokenService;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::user::*;
    pub use crate::domain::value_object::email::Email;
    pub use crate::domain::value_object::user_id::UserId;
    pub use crate::domain::value_object::user_name::UserName;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
