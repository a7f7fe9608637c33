//! Token Service
//!
//! Mints and verifies the two JWT kinds the session model relies on:
//! short-lived access tokens carrying identity claims, and long-lived
//! refresh tokens carrying only the user id. The two kinds are signed
//! with independent secrets so a leaked access token can never be
//! replayed as a refresh token, and vice versa.
//!
//! Verification is pure CPU work: signature + expiry check, no I/O.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_object::user_id::UserId;

// ============================================================================
// Error Types
// ============================================================================

/// Token service construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenConfigError {
    /// A signing secret is empty
    #[error("Token signing secret must not be empty")]
    EmptySecret,

    /// Access and refresh secrets are identical
    #[error("Access and refresh token secrets must be distinct")]
    SecretsNotDistinct,
}

/// Token verification errors
///
/// Expiry is distinguished from tamper/malformed so callers can report
/// differentiated messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Token expiry has elapsed
    #[error("Token has expired")]
    Expired,

    /// Signature does not match (wrong secret or tampered payload)
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Token is not a structurally valid JWT
    #[error("Malformed token")]
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        }
    }
}

// ============================================================================
// Claims
// ============================================================================

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User ID (UUID string)
    pub sub: String,
    /// User name (canonical)
    pub username: String,
    /// Email address
    pub email: String,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Claims carried by a refresh token (minimal surface: user id only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// User ID (UUID string)
    pub sub: String,
    /// Unique token id, so two tokens minted in the same second never
    /// collide (rotation depends on the new token differing)
    pub jti: String,
    /// Issued-at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

// ============================================================================
// Token Service
// ============================================================================

/// JWT signing and verification with split access/refresh secrets
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    /// Create a token service from the two signing secrets
    ///
    /// Secrets must be non-empty and distinct.
    pub fn new(
        access_secret: &[u8],
        refresh_secret: &[u8],
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, TokenConfigError> {
        if access_secret.is_empty() || refresh_secret.is_empty() {
            return Err(TokenConfigError::EmptySecret);
        }
        if access_secret == refresh_secret {
            return Err(TokenConfigError::SecretsNotDistinct);
        }

        Ok(Self {
            access_encoding: EncodingKey::from_secret(access_secret),
            access_decoding: DecodingKey::from_secret(access_secret),
            refresh_encoding: EncodingKey::from_secret(refresh_secret),
            refresh_decoding: DecodingKey::from_secret(refresh_secret),
            access_ttl,
            refresh_ttl,
        })
    }

    /// Mint a short-lived access token
    pub fn sign_access(
        &self,
        user_id: &UserId,
        username: &str,
        email: &str,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.access_encoding)
            .map_err(TokenError::from)
    }

    /// Mint a long-lived refresh token
    pub fn sign_refresh(&self, user_id: &UserId) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + self.refresh_ttl).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.refresh_encoding,
        )
        .map_err(TokenError::from)
    }

    /// Verify an access token and return its claims
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let data = decode::<AccessClaims>(token, &self.access_decoding, &Self::validation())?;
        Ok(data.claims)
    }

    /// Verify a refresh token and return its claims
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let data = decode::<RefreshClaims>(token, &self.refresh_decoding, &Self::validation())?;
        Ok(data.claims)
    }

    /// Access token TTL in seconds (for cookie Max-Age)
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    /// Refresh token TTL in seconds (for cookie Max-Age)
    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl.num_seconds()
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(
            b"access-secret-for-tests",
            b"refresh-secret-for-tests",
            Duration::hours(1),
            Duration::days(10),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = TokenService::new(b"", b"refresh", Duration::hours(1), Duration::days(10));
        assert_eq!(result.err(), Some(TokenConfigError::EmptySecret));
    }

    #[test]
    fn test_identical_secrets_rejected() {
        let result = TokenService::new(b"same", b"same", Duration::hours(1), Duration::days(10));
        assert_eq!(result.err(), Some(TokenConfigError::SecretsNotDistinct));
    }

    #[test]
    fn test_access_roundtrip() {
        let svc = service();
        let user_id = UserId::new();

        let token = svc
            .sign_access(&user_id, "alice", "alice@example.com")
            .unwrap();
        let claims = svc.verify_access(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "alice@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_roundtrip() {
        let svc = service();
        let user_id = UserId::new();

        let token = svc.sign_refresh(&user_id).unwrap();
        let claims = svc.verify_refresh(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
    }

    #[test]
    fn test_refresh_tokens_are_unique_per_mint() {
        let svc = service();
        let user_id = UserId::new();

        let first = svc.sign_refresh(&user_id).unwrap();
        let second = svc.sign_refresh(&user_id).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_expired_token_fails_with_expiry_error() {
        // Negative TTL produces an already-expired token
        let svc = TokenService::new(
            b"access-secret-for-tests",
            b"refresh-secret-for-tests",
            Duration::seconds(-60),
            Duration::seconds(-60),
        )
        .unwrap();
        let user_id = UserId::new();

        let access = svc.sign_access(&user_id, "alice", "a@example.com").unwrap();
        assert_eq!(svc.verify_access(&access), Err(TokenError::Expired));

        let refresh = svc.sign_refresh(&user_id).unwrap();
        assert_eq!(svc.verify_refresh(&refresh), Err(TokenError::Expired));
    }

    #[test]
    fn test_access_token_rejected_as_refresh() {
        let svc = service();
        let user_id = UserId::new();

        let access = svc.sign_access(&user_id, "alice", "a@example.com").unwrap();
        // Different secret: the signature check must fail
        assert_eq!(
            svc.verify_refresh(&access),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let svc = service();
        let user_id = UserId::new();

        let refresh = svc.sign_refresh(&user_id).unwrap();
        assert_eq!(
            svc.verify_access(&refresh),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_malformed_token() {
        let svc = service();
        assert_eq!(
            svc.verify_access("not.a.jwt"),
            Err(TokenError::Malformed)
        );
        assert_eq!(svc.verify_refresh(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_tampered_token_fails() {
        let svc = service();
        let user_id = UserId::new();

        let mut token = svc.sign_refresh(&user_id).unwrap();
        // Flip the last signature character
        let last = token.pop().unwrap();
        token.push(if last == 'A' { 'B' } else { 'A' });

        assert!(svc.verify_refresh(&token).is_err());
    }
}
