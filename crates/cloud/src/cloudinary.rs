//! Cloudinary-compatible image host.
//!
//! Uses signed uploads: the request parameters (excluding `file`,
//! `api_key` and `signature_algorithm`) are sorted by name, joined as
//! `k=v&k=v`, suffixed with the API secret and hashed with SHA-256.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::provider::{HostedImage, ImageHost, ImageHostError};

/// Default API root; the cloud name is appended per request.
const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Credentials and endpoint for a Cloudinary account.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// API root, overridable for self-hosted compatible services.
    pub api_base: String,
}

impl CloudinaryConfig {
    /// Load credentials from the environment.
    ///
    /// | Env Var                  | Required | Default                            |
    /// |--------------------------|----------|------------------------------------|
    /// | `CLOUDINARY_CLOUD_NAME`  | yes      | --                                 |
    /// | `CLOUDINARY_API_KEY`     | yes      | --                                 |
    /// | `CLOUDINARY_API_SECRET`  | yes      | --                                 |
    /// | `CLOUDINARY_API_BASE`    | no       | `https://api.cloudinary.com/v1_1`  |
    ///
    /// Returns `None` when any required variable is missing or empty.
    pub fn from_env() -> Option<Self> {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        Some(Self {
            cloud_name: read("CLOUDINARY_CLOUD_NAME")?,
            api_key: read("CLOUDINARY_API_KEY")?,
            api_secret: read("CLOUDINARY_API_SECRET")?,
            api_base: read("CLOUDINARY_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// HTTP client for a Cloudinary account.
pub struct CloudinaryHost {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryHost {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{action}",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// Check the status code and deserialize the JSON body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ImageHostError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageHostError::Api {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ImageHostError::UnexpectedResponse(e.to_string()))
    }
}

/// Compute the hex SHA-256 request signature over `params`.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by_key(|(key, _)| *key);

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(
        &self,
        folder: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<HostedImage, ImageHostError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[
                ("folder", folder),
                ("overwrite", "true"),
                ("timestamp", timestamp.as_str()),
            ],
            &self.config.api_secret,
        );

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()))
            .text("api_key", self.config.api_key.clone())
            .text("folder", folder.to_string())
            .text("overwrite", "true")
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        let uploaded: UploadResponse = Self::parse_response(response).await?;
        tracing::debug!(public_id = %uploaded.public_id, folder, "Image uploaded");

        Ok(HostedImage {
            public_id: uploaded.public_id,
            secure_url: uploaded.secure_url,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), ImageHostError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("public_id", public_id), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let form = [
            ("public_id", public_id.to_string()),
            ("api_key", self.config.api_key.clone()),
            ("timestamp", timestamp),
            ("signature", signature),
            ("signature_algorithm", "sha256".to_string()),
        ];

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .form(&form)
            .send()
            .await?;

        let destroyed: DestroyResponse = Self::parse_response(response).await?;
        match destroyed.result.as_str() {
            "ok" | "not found" => {
                tracing::debug!(public_id, result = %destroyed.result, "Image destroyed");
                Ok(())
            }
            other => Err(ImageHostError::UnexpectedResponse(format!(
                "destroy returned '{other}'"
            ))),
        }
    }
}
