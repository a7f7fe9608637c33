//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::PublicUser;

// ============================================================================
// Register
// ============================================================================

/// Register request
///
/// File fields carry the local paths an upstream upload middleware
/// already wrote to disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub avatar_path: Option<String>,
    pub cover_image_path: Option<String>,
}

// ============================================================================
// Login / Refresh
// ============================================================================

/// Login request (username or email, plus password)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

/// Refresh request body (fallback for clients that cannot send cookies)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Token pair payload returned by login and refresh
///
/// Tokens are delivered in the body as well as in cookies, so clients
/// that cannot read cookies still receive them in-band.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
}
