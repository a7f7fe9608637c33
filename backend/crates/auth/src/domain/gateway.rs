//! Gateway Traits
//!
//! Interfaces for external collaborators other than the database.

use std::path::Path;

use crate::error::AuthResult;

/// Media attachment gateway
///
/// Uploads a local file and returns its durable URL. An absent or empty
/// path is a no-op success (`Ok(None)`), not an error: registration
/// relies on this to treat a missing optional cover image as "no URL"
/// without special-casing.
#[trait_variant::make(MediaGateway: Send)]
pub trait LocalMediaGateway {
    async fn upload(&self, local_path: Option<&Path>) -> AuthResult<Option<String>>;
}
