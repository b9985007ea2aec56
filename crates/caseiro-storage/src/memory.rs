use crate::error::{Result, StorageError};
use crate::{ObjectMeta, ObjectStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
    pub last_modified: DateTime<Utc>,
}

/// In-process backend keyed by `(bucket, key)`. Lists in key order like S3.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<(String, String), StoredObject>>,
    failing: Mutex<HashSet<&'static str>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an object with an explicit last-modified time.
    pub fn insert_at(&self, bucket: &str, key: &str, body: impl Into<Vec<u8>>, last_modified: DateTime<Utc>) {
        self.lock().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body: body.into(),
                content_type: None,
                last_modified,
            },
        );
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.lock()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.lock()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }

    /// Makes every later call of `operation` (`"ListObjectsV2"`, `"GetObject"`,
    /// `"PutObject"`, `"Presign"`) fail with a service error.
    pub fn fail_operation(&self, operation: &'static str) {
        self.failing
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(operation);
    }

    fn check(&self, operation: &'static str) -> Result<()> {
        let failing = self
            .failing
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if failing.contains(operation) {
            return Err(StorageError::service(operation, "injected failure"));
        }
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<(String, String), StoredObject>> {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn backend(&self) -> &str {
        "memory"
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectMeta>> {
        self.check("ListObjectsV2")?;
        Ok(self
            .lock()
            .iter()
            .filter(|((b, k), _)| b == bucket && k.starts_with(prefix))
            .map(|((_, k), obj)| ObjectMeta {
                key: k.clone(),
                last_modified: obj.last_modified,
            })
            .collect())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.check("GetObject")?;
        self.object(bucket, key)
            .map(|o| o.body)
            .ok_or_else(|| StorageError::service("GetObject", format!("NoSuchKey: {key}")))
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<()> {
        self.check("PutObject")?;
        self.lock().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: content_type.map(str::to_string),
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn presign_get(&self, bucket: &str, key: &str, expires_in: Duration) -> Result<String> {
        self.check("Presign")?;
        Ok(format!(
            "memory://{bucket}/{key}?expires_in={}",
            expires_in.as_secs()
        ))
    }
}
