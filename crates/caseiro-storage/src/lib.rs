//! Object storage layer for trigger events and alert documents.
//!
//! [`ObjectStore`] is the backend seam (Amazon S3 in production,
//! [`memory::MemoryObjectStore`] for tests and local runs). A [`Gateway`]
//! binds a backend to one bucket and is what the stores in [`store`] use.

pub mod error;
pub mod memory;
pub mod s3;
pub mod store;


use async_trait::async_trait;
use chrono::{DateTime, Utc};
use error::Result;
use std::sync::Arc;
use std::time::Duration;

pub use store::alerts::AlertStore;
pub use store::triggers::TriggerDispatcher;

/// Listing entry for one stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    pub key: String,
    /// Storage-reported last-modified time. Objects without one sort as the epoch.
    pub last_modified: DateTime<Utc>,
}

/// Bucket-addressed object storage backend.
///
/// Every method is a single service call; implementations never retry.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Backend name for logs, e.g. `"s3"`.
    fn backend(&self) -> &str;

    /// Lists every object under `prefix`, following pagination to the end.
    /// Order is whatever the backend returns.
    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectMeta>>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<()>;

    /// Returns a credential-free GET link valid for `expires_in`.
    async fn presign_get(&self, bucket: &str, key: &str, expires_in: Duration) -> Result<String>;
}

/// An [`ObjectStore`] bound to one bucket.
#[derive(Clone)]
pub struct Gateway {
    store: Arc<dyn ObjectStore>,
    bucket: String,
}

impl Gateway {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    pub async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectMeta>> {
        self.store.list_objects(&self.bucket, prefix).await
    }

    /// `.json` objects under `prefix`, newest first. Equal timestamps keep
    /// listing order.
    pub async fn list_json_objects(&self, prefix: &str) -> Result<Vec<ObjectMeta>> {
        let mut objects: Vec<ObjectMeta> = self
            .list_objects(prefix)
            .await?
            .into_iter()
            .filter(|o| has_extension(&o.key, ".json"))
            .collect();
        objects.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
        Ok(objects)
    }

    pub async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        self.store.get_object(&self.bucket, key).await
    }

    pub async fn put_object(&self, key: &str, body: Vec<u8>, content_type: Option<&str>) -> Result<()> {
        tracing::debug!(
            backend = self.store.backend(),
            bucket = %self.bucket,
            key = %key,
            bytes = body.len(),
            "Writing object"
        );
        self.store
            .put_object(&self.bucket, key, body, content_type)
            .await
    }

    pub async fn presign(&self, key: &str, ttl_minutes: u64) -> Result<String> {
        let expires_in = Duration::from_secs(ttl_minutes.saturating_mul(60));
        self.store.presign_get(&self.bucket, key, expires_in).await
    }

    /// `s3://bucket/key` form used in messages and logs.
    pub fn uri(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}

/// Case-insensitive suffix check, e.g. `has_extension("a/B.JSON", ".json")`.
pub fn has_extension(key: &str, ext: &str) -> bool {
    key.to_lowercase().ends_with(ext)
}
