//! In-process backend, used by tests and by callers that want to inspect output.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use blogfactory_shared::{BlogFactoryError, Result};

use crate::ObjectStore;

/// A stored object body and its content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// Keeps objects in a map keyed by object key.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, StoredObject>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current object at `key`, if any.
    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().ok()?.get(key).cloned()
    }

    /// All keys currently stored, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .lock()
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Number of `put_object` calls, including overwrites.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| BlogFactoryError::Storage("memory store lock poisoned".into()))?;
        objects.insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_every_write_including_overwrites() {
        let store = MemoryStore::new();
        assert_eq!(store.write_count(), 0);

        store.put_object("a.json", b"1".to_vec(), "application/json").await.unwrap();
        store.put_object("a.json", b"2".to_vec(), "application/json").await.unwrap();
        store.put_object("b.json", b"3".to_vec(), "application/json").await.unwrap();

        assert_eq!(store.write_count(), 3);
        assert_eq!(store.keys(), vec!["a.json".to_string(), "b.json".to_string()]);
        assert_eq!(store.get("a.json").unwrap().body, b"2".to_vec());
    }
}
