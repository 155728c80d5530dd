use crate::errors::StoreError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Raw bytes under a bucket + key, overwritten in full on every put.
pub trait ObjectStore {
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError>;
    fn put(&self, bucket: &str, key: &str, body: &[u8]) -> Result<(), StoreError>;
}

impl<T: ObjectStore + ?Sized> ObjectStore for &T {
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        (**self).get(bucket, key)
    }

    fn put(&self, bucket: &str, key: &str, body: &[u8]) -> Result<(), StoreError> {
        (**self).put(bucket, key, body)
    }
}

/// Directory-backed object store: `<root>/<bucket>/<key>`.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.root.join(bucket).join(key)
    }
}

fn io_err(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl ObjectStore for FsObjectStore {
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.object_path(bucket, key);
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            },
            _ => io_err(&path, e),
        })
    }

    fn put(&self, bucket: &str, key: &str, body: &[u8]) -> Result<(), StoreError> {
        let dir = self.root.join(bucket);
        fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;

        // Readers see the old object or the new one, never a partial write.
        let path = self.object_path(bucket, key);
        let tmp = dir.join(format!(".{key}.tmp"));
        fs::write(&tmp, body).map_err(|e| io_err(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
        Ok(())
    }
}
