//! Versioned precache storage
//!
//! Named cache buckets mapping request URLs to stored response snapshots.
//! The agent stages a bucket aside while populating it and only inserts it
//! wholesale, so a failed install never disturbs an existing version.

use std::collections::HashMap;

/// An immutable response snapshot.
///
/// Used both as the result of a network fetch and as a stored cache entry,
/// so precached content is byte-for-byte what was fetched at install time.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl CachedResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            status_text: "OK".to_string(),
            headers: HashMap::new(),
            body,
        }
    }

    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Check if the status is a success (2xx)
    pub fn ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// A named cache bucket of URL → response entries.
#[derive(Debug, Clone)]
pub struct Bucket {
    name: String,
    entries: HashMap<String, CachedResponse>,
}

impl Bucket {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a response to the bucket
    pub fn put(&mut self, url: &str, response: CachedResponse) {
        self.entries.insert(url.to_string(), response);
    }

    /// Get a stored response
    pub fn match_url(&self, url: &str) -> Option<&CachedResponse> {
        self.entries.get(url)
    }

    /// Delete a stored response
    pub fn delete(&mut self, url: &str) -> bool {
        self.entries.remove(url).is_some()
    }

    /// Get all stored URLs
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All bucket versions known to the store.
///
/// Written only during install (wholesale bucket insertion) and activation
/// (version pruning); steady-state access is read-only.
#[derive(Debug, Default)]
pub struct CacheStorage {
    buckets: HashMap<String, Bucket>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully populated bucket, replacing any same-named one.
    pub fn install(&mut self, bucket: Bucket) {
        self.buckets.insert(bucket.name().to_string(), bucket);
    }

    /// Open or create a bucket
    pub fn open(&mut self, name: &str) -> &mut Bucket {
        self.buckets
            .entry(name.to_string())
            .or_insert_with(|| Bucket::new(name))
    }

    /// Get a bucket by version name
    pub fn bucket(&self, name: &str) -> Option<&Bucket> {
        self.buckets.get(name)
    }

    /// Delete a bucket
    pub fn delete(&mut self, name: &str) -> bool {
        self.buckets.remove(name).is_some()
    }

    /// Check if a bucket exists
    pub fn has(&self, name: &str) -> bool {
        self.buckets.contains_key(name)
    }

    /// Get all bucket names
    pub fn keys(&self) -> Vec<&str> {
        self.buckets.keys().map(|s| s.as_str()).collect()
    }

    /// Delete every bucket whose name is not `current`; returns removed names.
    pub fn prune(&mut self, current: &str) -> Vec<String> {
        let stale: Vec<String> = self
            .buckets
            .keys()
            .filter(|name| name.as_str() != current)
            .cloned()
            .collect();

        for name in &stale {
            self.buckets.remove(name);
        }

        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_put_match() {
        let mut bucket = Bucket::new("v1");
        bucket.put("/index.html", CachedResponse::new(200, b"<html>".to_vec()));

        let entry = bucket.match_url("/index.html").unwrap();
        assert_eq!(entry.body, b"<html>");
        assert!(bucket.match_url("/missing.html").is_none());
    }

    #[test]
    fn test_install_replaces_same_version() {
        let mut storage = CacheStorage::new();

        let mut first = Bucket::new("v1");
        first.put("/", CachedResponse::new(200, b"old".to_vec()));
        storage.install(first);

        let mut second = Bucket::new("v1");
        second.put("/", CachedResponse::new(200, b"new".to_vec()));
        storage.install(second);

        let entry = storage.bucket("v1").unwrap().match_url("/").unwrap();
        assert_eq!(entry.body, b"new");
        assert_eq!(storage.keys().len(), 1);
    }

    #[test]
    fn test_prune_keeps_only_current() {
        let mut storage = CacheStorage::new();
        storage.install(Bucket::new("v1"));
        storage.install(Bucket::new("v2"));
        storage.install(Bucket::new("v3"));

        let mut removed = storage.prune("v2");
        removed.sort();

        assert_eq!(removed, vec!["v1".to_string(), "v3".to_string()]);
        assert_eq!(storage.keys(), vec!["v2"]);
    }

    #[test]
    fn test_prune_is_idempotent() {
        let mut storage = CacheStorage::new();
        storage.install(Bucket::new("v2"));

        assert!(storage.prune("v2").is_empty());
        assert!(storage.prune("v2").is_empty());
        assert_eq!(storage.keys(), vec!["v2"]);
    }

    #[test]
    fn test_delete_missing_bucket() {
        let mut storage = CacheStorage::new();
        assert!(!storage.delete("v9"));
    }

    #[test]
    fn test_open_creates_bucket() {
        let mut storage = CacheStorage::new();
        storage.open("v1").put("/", CachedResponse::new(200, vec![]));

        assert!(storage.has("v1"));
        assert_eq!(storage.bucket("v1").unwrap().len(), 1);
    }
}
