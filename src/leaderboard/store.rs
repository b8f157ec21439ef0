use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::warn;

/// The key-value persistence surface the ranker writes through. Any failure
/// on either side is reported as "absent"/false; the ranker degrades to an
/// empty board instead of surfacing storage trouble.
pub trait BlobStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> bool;
}

/// Blob-per-key files under a storage directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.blob_path(key);
        match fs::read_to_string(&path) {
            Ok(blob) => Some(blob),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read blob, treating as absent");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        let path = self.blob_path(key);
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(path = %path.display(), error = %e, "Could not create storage directory");
                return false;
            }
        }
        match fs::write(&path, value) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not persist blob");
                false
            }
        }
    }
}

/// Shared in-memory store. Used in tests and wherever no durable storage is
/// available; clones see the same map, mirroring a single storage resource.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MemoryStore {
    blobs: Arc<Mutex<HashMap<String, String>>>,
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.blobs
            .lock()
            .expect("memory store lock poisoned")
            .get(key)
            .cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        self.blobs
            .lock()
            .expect("memory store lock poisoned")
            .insert(key.to_string(), value.to_string());
        true
    }
}
