use crate::error::{Result, StorageError};
use crate::{ObjectMeta, ObjectStore};
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use caseiro_common::aws::AwsSettings;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Amazon S3 backend.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn connect(settings: &AwsSettings) -> Self {
        let sdk_config = settings.load().await;
        tracing::info!(
            region = %settings.region,
            static_credentials = settings.has_static_credentials(),
            "S3 client configured"
        );
        Self::new(Client::new(&sdk_config))
    }
}

fn to_chrono(ts: &aws_sdk_s3::primitives::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos()).unwrap_or_default()
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn backend(&self) -> &str {
        "s3"
    }

    async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<ObjectMeta>> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .into_paginator()
            .send();

        let mut objects = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page
                .map_err(|e| StorageError::service("ListObjectsV2", DisplayErrorContext(&e)))?;
            for obj in page.contents() {
                let Some(key) = obj.key() else {
                    continue;
                };
                objects.push(ObjectMeta {
                    key: key.to_string(),
                    last_modified: obj.last_modified().map(to_chrono).unwrap_or_default(),
                });
            }
        }

        tracing::debug!(bucket = %bucket, prefix = %prefix, count = objects.len(), "Listed objects");
        Ok(objects)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::service("GetObject", DisplayErrorContext(&e)))?;

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| StorageError::service("GetObject", e))?;
        Ok(body.into_bytes().to_vec())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .set_content_type(content_type.map(str::to_string))
            .send()
            .await
            .map_err(|e| StorageError::service("PutObject", DisplayErrorContext(&e)))?;
        Ok(())
    }

    async fn presign_get(&self, bucket: &str, key: &str, expires_in: Duration) -> Result<String> {
        let config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::service("Presign", e))?;
        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(config)
            .await
            .map_err(|e| StorageError::service("Presign", DisplayErrorContext(&e)))?;
        Ok(request.uri().to_string())
    }
}
