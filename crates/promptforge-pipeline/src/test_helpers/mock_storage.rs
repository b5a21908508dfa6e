//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use promptforge_storage::{Storage, StorageError, StorageResult};

/// Stores blobs in a map and hands out `https://files.test/...` URLs.
/// Optionally fails the upload of one named file.
#[derive(Default)]
pub struct MockStorage {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
    counter: AtomicU64,
    fail_on: Option<String>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload of a file with this name returns an error.
    pub fn failing_on(file_name: &str) -> Self {
        Self {
            fail_on: Some(file_name.to_string()),
            ..Self::default()
        }
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.lock().expect("blobs lock poisoned").len()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn upload(
        &self,
        filename: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<(String, String)> {
        if self.fail_on.as_deref() == Some(filename) {
            return Err(StorageError::UploadFailed(format!(
                "simulated upload failure for {}",
                filename
            )));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let key = format!("prompt-files/{}-{}", n, filename);
        let url = format!("https://files.test/{}", key);
        self.blobs
            .lock()
            .expect("blobs lock poisoned")
            .insert(key.clone(), data);
        Ok((key, url))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.blobs
            .lock()
            .expect("blobs lock poisoned")
            .get(storage_key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.blobs
            .lock()
            .expect("blobs lock poisoned")
            .remove(storage_key);
        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        Ok(self
            .blobs
            .lock()
            .expect("blobs lock poisoned")
            .contains_key(storage_key))
    }
}
