//! Filesystem backend for dry runs: objects land under a local root directory.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use blogfactory_shared::{BlogFactoryError, Result};

use crate::ObjectStore;

/// Writes each object to `<root>/<key>`.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn put_object(&self, key: &str, body: Vec<u8>, _content_type: &str) -> Result<()> {
        let path = self.root.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BlogFactoryError::io(parent, e))?;
        }

        tokio::fs::write(&path, body)
            .await
            .map_err(|e| BlogFactoryError::io(&path, e))?;

        debug!(path = %path.display(), "object written");
        Ok(())
    }

    fn name(&self) -> &str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn writes_nested_key_and_overwrites() {
        let tmp_dir = std::env::temp_dir().join(format!("bf-local-test-{}", Uuid::now_v7()));
        let store = LocalStore::new(&tmp_dir);

        store
            .put_object("automated_blog/First.json", b"{\"v\":1}".to_vec(), "application/json")
            .await
            .unwrap();
        store
            .put_object("automated_blog/First.json", b"{\"v\":2}".to_vec(), "application/json")
            .await
            .unwrap();

        let written = std::fs::read_to_string(tmp_dir.join("automated_blog/First.json")).unwrap();
        assert_eq!(written, "{\"v\":2}");

        let _ = std::fs::remove_dir_all(&tmp_dir);
    }
}
