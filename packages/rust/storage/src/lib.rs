//! Object storage and publishing of generated content.
//!
//! The [`Publisher`] writes each [`ContentRecord`] as a JSON object under
//! `automated_blog/<sanitized title>.json` through an [`ObjectStore`]:
//! - [`GcsStore`] — a Google Cloud Storage bucket (production)
//! - [`LocalStore`] — a local directory (dry runs)
//! - [`MemoryStore`] — an in-process map (tests)
//!
//! Writes always overwrite. Keys are derived from titles alone, so two titles
//! differing only in punctuation share a key; within one batch that is
//! rejected before anything is written.

mod gcs;
mod local;
mod memory;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use blogfactory_shared::{BlogFactoryError, ContentRecord, Result, STORAGE_PREFIX};

pub use gcs::GcsStore;
pub use local::LocalStore;
pub use memory::{MemoryStore, StoredObject};

/// Content type of every published object.
pub const JSON_CONTENT_TYPE: &str = "application/json";

// ---------------------------------------------------------------------------
// ObjectStore trait
// ---------------------------------------------------------------------------

/// A write-only blob store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `body` at `key`, replacing any existing object.
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;

    /// Human-readable backend name for tracing.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Remove every ASCII punctuation character from `title`.
///
/// Whitespace and case are left untouched.
pub fn sanitize_title(title: &str) -> String {
    title.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

/// Storage key for a record titled `title`.
pub fn object_key(title: &str) -> String {
    format!("{STORAGE_PREFIX}/{}.json", sanitize_title(title))
}

/// Keys for `records`, in order, failing if two records share one.
pub fn batch_keys(records: &[ContentRecord]) -> Result<Vec<String>> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut keys = Vec::with_capacity(records.len());

    for record in records {
        let key = object_key(&record.title);
        if let Some(first) = seen.insert(key.clone(), &record.title) {
            return Err(BlogFactoryError::KeyCollision {
                key,
                first: first.to_string(),
                second: record.title.clone(),
            });
        }
        keys.push(key);
    }

    Ok(keys)
}

// ---------------------------------------------------------------------------
// Publisher
// ---------------------------------------------------------------------------

/// A record that was written, and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRecord {
    pub title: String,
    pub key: String,
}

/// Progress callback for publishing.
pub trait PublishProgress: Send + Sync {
    /// Called after each object is written.
    fn record_published(&self, current: usize, total: usize, key: &str);
}

/// No-op publish progress.
pub struct SilentPublishProgress;

impl PublishProgress for SilentPublishProgress {
    fn record_published(&self, _current: usize, _total: usize, _key: &str) {}
}

/// Serializes records and writes them to an [`ObjectStore`].
pub struct Publisher {
    store: Arc<dyn ObjectStore>,
}

impl Publisher {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Write every record, in order. The first failed upload stops the loop;
    /// objects already written stay written.
    #[instrument(skip_all, fields(records = records.len(), store = self.store.name()))]
    pub async fn publish(
        &self,
        records: &[ContentRecord],
        progress: &dyn PublishProgress,
    ) -> Result<Vec<PublishedRecord>> {
        let keys = batch_keys(records)?;
        let mut published = Vec::with_capacity(records.len());

        for (i, (record, key)) in records.iter().zip(keys).enumerate() {
            let body = serde_json::to_vec(record)?;
            self.store.put_object(&key, body, JSON_CONTENT_TYPE).await?;

            info!(%key, title = %record.title, "record published");
            progress.record_published(i + 1, records.len(), &key);

            published.push(PublishedRecord {
                title: record.title.clone(),
                key,
            });
        }

        Ok(published)
    }
}
