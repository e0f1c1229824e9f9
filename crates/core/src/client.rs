//! S3 client implementation using the AWS S3 SDK

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::storage::ObjectStore;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{
    primitives::ByteStream,
    types::{BucketLocationConstraint, CreateBucketConfiguration},
    Client,
};
use std::future::Future;
use std::path::Path;
use tokio::runtime::Runtime;

/// Region where buckets are created without a location constraint
const DEFAULT_REGION: &str = "us-east-1";

/// Blocking S3 store.
///
/// Owns a current-thread tokio runtime and drives every SDK call to
/// completion on it, so callers stay fully synchronous.
pub struct S3Store {
    runtime: Runtime,
    client: Client,
    region: Option<String>,
}

impl S3Store {
    /// Create a new S3 store from the storage settings
    pub fn connect(config: &StorageConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = runtime.block_on(loader.load());

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();

        let region = s3_config.region().map(|r| r.as_ref().to_string());
        tracing::debug!(region = ?region, endpoint = ?config.endpoint, "S3 client ready");

        Ok(Self {
            runtime,
            client: Client::from_conf(s3_config),
            region,
        })
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn location_constraint(&self) -> Option<CreateBucketConfiguration> {
        self.region
            .as_deref()
            .filter(|region| *region != DEFAULT_REGION)
            .map(|region| {
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build()
            })
    }

    /// List bucket names
    pub async fn fetch_buckets(&self) -> Result<Vec<String>> {
        let response = self.client.list_buckets().send().await?;

        Ok(response
            .buckets()
            .iter()
            .filter_map(|b| b.name())
            .map(str::to_string)
            .collect())
    }

    /// List every key in a bucket, following continuation tokens
    pub async fn fetch_keys(&self, bucket: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page?;
            keys.extend(page.contents().iter().filter_map(|o| o.key()).map(str::to_string));
        }

        Ok(keys)
    }

    /// Create a bucket in the configured region
    pub async fn put_bucket(&self, name: &str) -> Result<()> {
        self.client
            .create_bucket()
            .bucket(name)
            .set_create_bucket_configuration(self.location_constraint())
            .send()
            .await?;

        tracing::info!(bucket = name, "bucket created");
        Ok(())
    }

    /// Delete an empty bucket
    pub async fn remove_bucket(&self, name: &str) -> Result<()> {
        self.client.delete_bucket().bucket(name).send().await?;

        tracing::info!(bucket = name, "bucket deleted");
        Ok(())
    }

    /// Upload a local file
    pub async fn put_file(&self, bucket: &str, local_path: &Path, key: &str) -> Result<()> {
        // Detect content type
        let content_type = mime_guess::from_path(local_path)
            .first_or_octet_stream()
            .to_string();

        let body = ByteStream::from_path(local_path).await?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await?;

        tracing::info!(bucket, key, path = %local_path.display(), "object uploaded");
        Ok(())
    }

    /// Download an object into a local file
    pub async fn get_file(&self, bucket: &str, key: &str, local_path: &Path) -> Result<()> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;

        let body = response.body.collect().await?.into_bytes();
        tokio::fs::write(local_path, &body).await?;

        tracing::info!(bucket, key, path = %local_path.display(), "object downloaded");
        Ok(())
    }

    /// Delete a single object
    pub async fn remove_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;

        tracing::info!(bucket, key, "object deleted");
        Ok(())
    }

    /// Server-side copy between buckets
    pub async fn copy_between(&self, src_bucket: &str, key: &str, dst_bucket: &str) -> Result<()> {
        self.client
            .copy_object()
            .bucket(dst_bucket)
            .key(key)
            .copy_source(copy_source(src_bucket, key))
            .send()
            .await?;

        tracing::info!(src_bucket, dst_bucket, key, "object copied");
        Ok(())
    }
}

impl ObjectStore for S3Store {
    fn list_buckets(&self) -> Result<Vec<String>> {
        self.block_on(self.fetch_buckets())
    }

    fn list_objects(&self, bucket: &str) -> Result<Vec<String>> {
        self.block_on(self.fetch_keys(bucket))
    }

    fn create_bucket(&self, name: &str) -> Result<()> {
        self.block_on(self.put_bucket(name))
    }

    fn delete_bucket(&self, name: &str) -> Result<()> {
        self.block_on(self.remove_bucket(name))
    }

    fn upload_object(&self, bucket: &str, local_path: &Path, key: &str) -> Result<()> {
        if !local_path.is_file() {
            return Err(Error::FileNotFound(local_path.to_path_buf()));
        }

        self.block_on(self.put_file(bucket, local_path, key))
    }

    fn download_object(&self, bucket: &str, key: &str, local_path: &Path) -> Result<()> {
        let parent = local_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        if !parent.is_dir() {
            return Err(Error::InvalidDirectory(parent.to_path_buf()));
        }

        self.block_on(self.get_file(bucket, key, local_path))
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.block_on(self.remove_object(bucket, key))
    }

    fn copy_object(&self, src_bucket: &str, key: &str, dst_bucket: &str) -> Result<()> {
        self.block_on(self.copy_between(src_bucket, key, dst_bucket))
    }
}

/// Build the `x-amz-copy-source` value: `bucket/key` with each segment of
/// the key percent-encoded and its `/` separators kept.
fn copy_source(bucket: &str, key: &str) -> String {
    let encoded: Vec<_> = key.split('/').map(urlencoding::encode).collect();
    format!("{}/{}", bucket, encoded.join("/"))
}
