//! In-process image host.
//!
//! Keeps uploaded bytes in memory and hands out `memory://` URLs. Used when
//! no hosting credentials are configured and by the HTTP integration tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::provider::{HostedImage, ImageHost, ImageHostError};

#[derive(Debug, Default)]
pub struct MemoryHost {
    images: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an image with this id is currently stored.
    pub async fn contains(&self, public_id: &str) -> bool {
        self.images.read().await.contains_key(public_id)
    }

    /// Number of stored images.
    pub async fn len(&self) -> usize {
        self.images.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.images.read().await.is_empty()
    }
}

#[async_trait]
impl ImageHost for MemoryHost {
    async fn upload(
        &self,
        folder: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<HostedImage, ImageHostError> {
        let stem = file_name
            .rsplit_once('.')
            .map_or(file_name, |(stem, _)| stem);
        let public_id = format!("{folder}/{stem}_{}", Uuid::new_v4().simple());
        let secure_url = format!("memory://{public_id}");

        self.images.write().await.insert(public_id.clone(), bytes);

        Ok(HostedImage {
            public_id,
            secure_url,
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), ImageHostError> {
        self.images.write().await.remove(public_id);
        Ok(())
    }
}
