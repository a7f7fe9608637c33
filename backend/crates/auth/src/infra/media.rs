//! Media Gateway Implementation
//!
//! Adapts the platform media storage client to the domain gateway
//! contract: absent path is a no-op success, a failed upload surfaces
//! as an upload error for the caller to judge.

use std::path::Path;

use platform::media::MediaClient;

use crate::domain::gateway::MediaGateway;
use crate::error::{AuthError, AuthResult};

/// HTTP-backed media gateway
#[derive(Clone)]
pub struct HttpMediaGateway {
    client: MediaClient,
}

impl HttpMediaGateway {
    pub fn new(client: MediaClient) -> Self {
        Self { client }
    }
}

impl MediaGateway for HttpMediaGateway {
    async fn upload(&self, local_path: Option<&Path>) -> AuthResult<Option<String>> {
        // An empty path means "nothing to upload", same as an absent one
        let Some(path) = local_path.filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(None);
        };

        let upload = self
            .client
            .upload(path)
            .await
            .map_err(|e| AuthError::Upload(e.to_string()))?;

        Ok(Some(upload.url))
    }
}
