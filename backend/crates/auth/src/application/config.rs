//! Application Configuration
//!
//! Configuration for the Auth application layer.

use chrono::Duration;

use crate::token::{TokenConfigError, TokenService};

/// Re-export SameSite and CookieConfig from platform
pub use platform::cookie::{CookieConfig, SameSite};

/// Access token cookie name
pub const ACCESS_COOKIE_NAME: &str = "accessToken";

/// Refresh token cookie name
pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Access token signing secret
    pub access_token_secret: Vec<u8>,
    /// Refresh token signing secret (must differ from access secret)
    pub refresh_token_secret: Vec<u8>,
    /// Access token TTL (1 hour)
    pub access_token_ttl: Duration,
    /// Refresh token TTL (10 days)
    pub refresh_token_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: Vec::new(),
            refresh_token_secret: Vec::new(),
            access_token_ttl: Duration::hours(1),
            refresh_token_ttl: Duration::days(10),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with random signing secrets (for development)
    pub fn with_random_secrets() -> Self {
        use rand::RngCore;

        let mut access = vec![0u8; 32];
        let mut refresh = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut access);
        rand::thread_rng().fill_bytes(&mut refresh);

        Self {
            access_token_secret: access,
            refresh_token_secret: refresh,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secrets()
        }
    }

    /// Build the token service from the configured secrets
    pub fn token_service(&self) -> Result<TokenService, TokenConfigError> {
        TokenService::new(
            &self.access_token_secret,
            &self.refresh_token_secret,
            self.access_token_ttl,
            self.refresh_token_ttl,
        )
    }

    /// Cookie configuration for the access token
    pub fn access_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: ACCESS_COOKIE_NAME.to_string(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.access_token_ttl.num_seconds()),
        }
    }

    /// Cookie configuration for the refresh token
    pub fn refresh_cookie(&self) -> CookieConfig {
        CookieConfig {
            name: REFRESH_COOKIE_NAME.to_string(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.refresh_token_ttl.num_seconds()),
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_secrets_are_distinct() {
        let config = AuthConfig::with_random_secrets();
        assert_ne!(config.access_token_secret, config.refresh_token_secret);
        assert!(config.token_service().is_ok());
    }

    #[test]
    fn test_default_secrets_rejected() {
        // Empty secrets must never produce a working token service
        assert!(AuthConfig::default().token_service().is_err());
    }

    #[test]
    fn test_cookie_configs() {
        let config = AuthConfig::development();

        let access = config.access_cookie();
        assert_eq!(access.name, "accessToken");
        assert!(access.http_only);
        assert_eq!(access.max_age_secs, Some(3600));

        let refresh = config.refresh_cookie();
        assert_eq!(refresh.name, "refreshToken");
        assert_eq!(refresh.max_age_secs, Some(10 * 24 * 3600));
    }
}
