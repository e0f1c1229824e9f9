//! In-memory object store for action and menu tests

use s3menu_core::{Error, ObjectStore, Result};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

type Bucket = BTreeMap<String, Vec<u8>>;

/// Buckets kept in name order, with a log of every call made.
#[derive(Default)]
pub struct MemoryStore {
    buckets: RefCell<BTreeMap<String, Bucket>>,
    calls: RefCell<Vec<&'static str>>,
    failing: RefCell<BTreeSet<&'static str>>,
    allowance: RefCell<HashMap<&'static str, usize>>,
    lagging: Cell<bool>,
    discarding: Cell<bool>,
    hidden_buckets: RefCell<BTreeSet<String>>,
    hidden_objects: RefCell<BTreeSet<(String, String)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_buckets(names: &[&str]) -> Self {
        let store = Self::new();
        for name in names {
            store.buckets.borrow_mut().insert(name.to_string(), Bucket::new());
        }
        store
    }

    /// Seed an object without recording a call
    pub fn put(&self, bucket: &str, key: &str, data: &[u8]) {
        self.buckets
            .borrow_mut()
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), data.to_vec());
    }

    /// Make the named operation fail with a storage error
    pub fn fail_on(&self, operation: &'static str) {
        self.failing.borrow_mut().insert(operation);
    }

    /// Let the named operation succeed `successes` times, then fail
    pub fn fail_after(&self, operation: &'static str, successes: usize) {
        self.allowance.borrow_mut().insert(operation, successes);
    }

    /// Downloads report success without writing anything
    pub fn discard_downloads(&self) {
        self.discarding.set(true);
    }

    /// From now on, writes succeed but never show up in listings
    pub fn hide_writes_from_listings(&self) {
        self.lagging.set(true);
    }

    pub fn bucket_names(&self) -> Vec<String> {
        self.buckets.borrow().keys().cloned().collect()
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.buckets
            .borrow()
            .get(bucket)
            .map(|b| b.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn object_data(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.buckets.borrow().get(bucket)?.get(key).cloned()
    }

    pub fn calls_to(&self, operation: &str) -> usize {
        self.calls.borrow().iter().filter(|c| **c == operation).count()
    }

    fn record(&self, operation: &'static str) -> Result<()> {
        self.calls.borrow_mut().push(operation);
        let exhausted = match self.allowance.borrow_mut().get_mut(operation) {
            Some(0) => true,
            Some(left) => {
                *left -= 1;
                false
            }
            None => false,
        };
        if exhausted || self.failing.borrow().contains(operation) {
            return Err(Error::Storage(format!("{} rejected by test store", operation)));
        }
        Ok(())
    }

    fn insert(&self, bucket: &str, key: &str, data: Vec<u8>) -> Result<()> {
        let mut buckets = self.buckets.borrow_mut();
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| Error::Storage(format!("NoSuchBucket: {}", bucket)))?;
        objects.insert(key.to_string(), data);

        if self.lagging.get() {
            self.hidden_objects
                .borrow_mut()
                .insert((bucket.to_string(), key.to_string()));
        }
        Ok(())
    }

    fn read(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.buckets
            .borrow()
            .get(bucket)
            .ok_or_else(|| Error::Storage(format!("NoSuchBucket: {}", bucket)))?
            .get(key)
            .cloned()
            .ok_or_else(|| Error::Storage(format!("NoSuchKey: {}", key)))
    }
}

impl ObjectStore for MemoryStore {
    fn list_buckets(&self) -> Result<Vec<String>> {
        self.record("list_buckets")?;
        let hidden = self.hidden_buckets.borrow();
        Ok(self
            .bucket_names()
            .into_iter()
            .filter(|name| !hidden.contains(name))
            .collect())
    }

    fn list_objects(&self, bucket: &str) -> Result<Vec<String>> {
        self.record("list_objects")?;
        let buckets = self.buckets.borrow();
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| Error::Storage(format!("NoSuchBucket: {}", bucket)))?;

        let hidden = self.hidden_objects.borrow();
        Ok(objects
            .keys()
            .filter(|key| !hidden.contains(&(bucket.to_string(), key.to_string())))
            .cloned()
            .collect())
    }

    fn create_bucket(&self, name: &str) -> Result<()> {
        self.record("create_bucket")?;
        let mut buckets = self.buckets.borrow_mut();
        if buckets.contains_key(name) {
            return Err(Error::Storage(format!("BucketAlreadyOwnedByYou: {}", name)));
        }
        buckets.insert(name.to_string(), Bucket::new());

        if self.lagging.get() {
            self.hidden_buckets.borrow_mut().insert(name.to_string());
        }
        Ok(())
    }

    fn delete_bucket(&self, name: &str) -> Result<()> {
        self.record("delete_bucket")?;
        let mut buckets = self.buckets.borrow_mut();
        let is_empty = buckets
            .get(name)
            .map(|objects| objects.is_empty())
            .ok_or_else(|| Error::Storage(format!("NoSuchBucket: {}", name)))?;
        if !is_empty {
            return Err(Error::Storage(format!("BucketNotEmpty: {}", name)));
        }
        buckets.remove(name);
        Ok(())
    }

    fn upload_object(&self, bucket: &str, local_path: &Path, key: &str) -> Result<()> {
        self.record("upload_object")?;
        if !local_path.is_file() {
            return Err(Error::FileNotFound(local_path.to_path_buf()));
        }
        let data = std::fs::read(local_path)?;
        self.insert(bucket, key, data)
    }

    fn download_object(&self, bucket: &str, key: &str, local_path: &Path) -> Result<()> {
        self.record("download_object")?;
        let parent = local_path.parent().unwrap_or_else(|| Path::new("."));
        if !parent.is_dir() {
            return Err(Error::InvalidDirectory(parent.to_path_buf()));
        }
        let data = self.read(bucket, key)?;
        if !self.discarding.get() {
            std::fs::write(local_path, data)?;
        }
        Ok(())
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.record("delete_object")?;
        if let Some(objects) = self.buckets.borrow_mut().get_mut(bucket) {
            objects.remove(key);
        }
        Ok(())
    }

    fn copy_object(&self, src_bucket: &str, key: &str, dst_bucket: &str) -> Result<()> {
        self.record("copy_object")?;
        let data = self.read(src_bucket, key)?;
        self.insert(dst_bucket, key, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_is_stable_without_mutation() {
        let store = MemoryStore::with_buckets(&["b", "a"]);
        store.put("a", "2", b"");
        store.put("a", "1", b"");

        assert_eq!(store.list_buckets().unwrap(), store.list_buckets().unwrap());
        assert_eq!(store.list_objects("a").unwrap(), vec!["1", "2"]);
        assert_eq!(store.list_objects("a").unwrap(), store.list_objects("a").unwrap());
    }

    #[test]
    fn test_fail_after_allows_some_calls() {
        let store = MemoryStore::with_buckets(&["a"]);
        store.fail_after("list_objects", 2);
        assert!(store.list_objects("a").is_ok());
        assert!(store.list_objects("a").is_ok());
        assert!(store.list_objects("a").is_err());
        assert_eq!(store.calls_to("list_objects"), 3);
    }

    #[test]
    fn test_delete_non_empty_bucket_fails() {
        let store = MemoryStore::with_buckets(&["a"]);
        store.put("a", "k", b"v");
        assert!(store.delete_bucket("a").is_err());
    }
}
