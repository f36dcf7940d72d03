//! The image hosting abstraction used by the HTTP handlers.

use async_trait::async_trait;

/// An image stored on the hosting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedImage {
    /// Host-assigned identifier, needed to delete the image later.
    pub public_id: String,
    /// Public HTTPS URL of the image.
    pub secure_url: String,
}

/// Errors from an image host.
#[derive(Debug, thiserror::Error)]
pub enum ImageHostError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The host returned a non-2xx status code.
    #[error("Image host API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The host answered 2xx but the payload was not what we expected.
    #[error("Unexpected image host response: {0}")]
    UnexpectedResponse(String),
}

/// Uploads and deletes images on a hosting service.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload `bytes` into `folder`, returning its id and public URL.
    async fn upload(
        &self,
        folder: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<HostedImage, ImageHostError>;

    /// Delete a previously uploaded image. Deleting an unknown id is not an error.
    async fn destroy(&self, public_id: &str) -> Result<(), ImageHostError>;
}
