//! Google Cloud Storage backend.
//!
//! Credentials come from the environment (service account key, workload
//! identity, or gcloud user credentials); nothing is passed explicitly.

use async_trait::async_trait;
use google_cloud_storage::client::{Client, ClientConfig};
use google_cloud_storage::http::objects::upload::{Media, UploadObjectRequest, UploadType};
use tracing::{debug, info};

use blogfactory_shared::{BlogFactoryError, Result};

use crate::ObjectStore;

/// Writes objects into a single GCS bucket.
pub struct GcsStore {
    client: Client,
    bucket: String,
}

impl GcsStore {
    /// Authenticate with ambient credentials and bind to `bucket`.
    pub async fn connect(bucket: impl Into<String>) -> Result<Self> {
        let bucket = bucket.into();
        let config = ClientConfig::default().with_auth().await.map_err(|e| {
            BlogFactoryError::upstream("storage", format!("GCS authentication failed: {e}"))
        })?;

        info!(%bucket, "connected to cloud storage");

        Ok(Self {
            client: Client::new(config),
            bucket,
        })
    }
}

#[async_trait]
impl ObjectStore for GcsStore {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        let mut media = Media::new(key.to_string());
        media.content_type = content_type.to_string().into();

        let request = UploadObjectRequest {
            bucket: self.bucket.clone(),
            ..Default::default()
        };

        self.client
            .upload_object(&request, body, &UploadType::Simple(media))
            .await
            .map_err(|e| upload_error(&self.bucket, key, e))?;

        debug!(bucket = %self.bucket, key, "object uploaded");
        Ok(())
    }

    fn name(&self) -> &str {
        "gcs"
    }
}

/// A failed upload is an upstream HTTP failure of the storage service.
fn upload_error(bucket: &str, key: &str, err: impl std::fmt::Display) -> BlogFactoryError {
    BlogFactoryError::upstream("storage", format!("gs://{bucket}/{key}: {err}"))
}
