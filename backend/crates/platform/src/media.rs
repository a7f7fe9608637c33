//! Media Storage Upload Client
//!
//! HTTP client for the media storage service. Takes a file that an
//! upstream handler already wrote to local disk, streams it to the
//! storage endpoint and returns the durable URL assigned by the
//! service. The caller decides whether a failed upload is fatal.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Media upload errors
#[derive(Debug, Error)]
pub enum MediaError {
    /// Local file could not be read
    #[error("Failed to read local file '{path}': {source}")]
    LocalFile {
        path: String,
        source: std::io::Error,
    },

    /// Storage service rejected the upload or was unreachable
    #[error("Media upload failed: {0}")]
    Upload(String),

    /// Storage service answered with an unusable body
    #[error("Invalid response from media storage: {0}")]
    InvalidResponse(String),
}

/// Successful upload result
#[derive(Debug, Clone, Deserialize)]
pub struct MediaUpload {
    /// Durable URL assigned by the storage service
    pub url: String,
}

/// Client for the media storage HTTP API
///
/// The endpoint accepts `POST /upload?filename=<name>` with the raw
/// file bytes as the body and answers `{"url": "..."}`.
#[derive(Debug, Clone)]
pub struct MediaClient {
    endpoint: String,
    http: reqwest::Client,
}

impl MediaClient {
    /// Create a client for the given storage endpoint base URL
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Storage endpoint base URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Upload a local file and return the durable URL
    pub async fn upload(&self, local_path: &Path) -> Result<MediaUpload, MediaError> {
        let bytes = tokio::fs::read(local_path)
            .await
            .map_err(|e| MediaError::LocalFile {
                path: local_path.display().to_string(),
                source: e,
            })?;

        let filename = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin");

        let url = format!("{}/upload", self.endpoint);

        let response = self
            .http
            .post(&url)
            .query(&[("filename", filename)])
            .body(bytes)
            .send()
            .await
            .map_err(|e| MediaError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MediaError::Upload(format!(
                "storage service returned status {}",
                response.status()
            )));
        }

        response
            .json::<MediaUpload>()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trailing_slash_stripped() {
        let client = MediaClient::new("https://media.example.com/");
        assert_eq!(client.endpoint(), "https://media.example.com");
    }

    #[test]
    fn test_upload_result_deserialization() {
        let upload: MediaUpload =
            serde_json::from_str(r#"{"url": "https://cdn.example.com/a.png"}"#).unwrap();
        assert_eq!(upload.url, "https://cdn.example.com/a.png");
    }

    #[tokio::test]
    async fn test_upload_missing_local_file() {
        let client = MediaClient::new("https://media.example.com");
        let result = client
            .upload(Path::new("/nonexistent/path/to/file.png"))
            .await;
        assert!(matches!(result, Err(MediaError::LocalFile { .. })));
    }
}
