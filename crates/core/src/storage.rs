//! ObjectStore trait definition
//!
//! The interactive actions only talk to storage through this trait, so the
//! session can run against the S3 client or against an in-memory double.

use std::path::Path;

use crate::error::Result;

/// Blocking object-storage operations used by the menu actions.
///
/// Every call runs to completion before returning; implementations that
/// wrap an async SDK block on it internally.
pub trait ObjectStore {
    /// Names of all buckets visible to the caller
    fn list_buckets(&self) -> Result<Vec<String>>;

    /// Keys of every object in `bucket`
    fn list_objects(&self, bucket: &str) -> Result<Vec<String>>;

    fn create_bucket(&self, name: &str) -> Result<()>;

    /// Delete an empty bucket
    fn delete_bucket(&self, name: &str) -> Result<()>;

    /// Upload `local_path` to `bucket` under `key`.
    ///
    /// Fails with [`crate::Error::FileNotFound`] when `local_path` is not a file.
    fn upload_object(&self, bucket: &str, local_path: &Path, key: &str) -> Result<()>;

    /// Download `key` from `bucket` into `local_path`.
    ///
    /// Fails with [`crate::Error::InvalidDirectory`] when the parent of
    /// `local_path` is not an existing directory.
    fn download_object(&self, bucket: &str, key: &str, local_path: &Path) -> Result<()>;

    fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;

    /// Copy `key` from `src_bucket` to `dst_bucket`, keeping the key.
    fn copy_object(&self, src_bucket: &str, key: &str, dst_bucket: &str) -> Result<()>;
}
