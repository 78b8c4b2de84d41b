//! FsObjectStore - filesystem 上の object store
//!
//! object は `{root}/{region}/{bucket}/{key}` に置きます。
//! versioning は無いので acknowledgment に version id は入りません。
//! CLI では service backend と local stand-in の両方に使います。

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;

use crate::domain::relocation::{CopyObjectRequest, RelocationResult};
use crate::ports::{ObjectStore, ObjectStoreProvider, StorageError};

/// region ごとの FsRegionStore を開く ObjectStoreProvider
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn in_region(&self, region: impl Into<String>) -> FsRegionStore {
        FsRegionStore {
            root: self.root.clone(),
            region: region.into(),
        }
    }
}

impl ObjectStoreProvider for FsObjectStore {
    fn store_for_region(&self, region: &str) -> Result<Arc<dyn ObjectStore>, StorageError> {
        Ok(Arc::new(self.in_region(region)))
    }
}

/// 1 つの region に scope された ObjectStore
#[derive(Debug, Clone)]
pub struct FsRegionStore {
    root: PathBuf,
    region: String,
}

impl FsRegionStore {
    /// region / bucket / key のどれも root の外を指せない
    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(&self.region).join(bucket).join(key);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::Backend(format!(
                "invalid object location: {}/{bucket}/{key}",
                self.region
            )));
        }
        Ok(self.root.join(relative))
    }

    /// copy を経由せずに object を書き込む
    pub async fn put_object(&self, bucket: &str, key: &str, body: &[u8]) -> Result<(), StorageError> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(path, body).await?;
        Ok(())
    }

    pub async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.object_path(bucket, key)?;
        fs::read(&path).await.map_err(|e| not_found_or_io(e, bucket, key))
    }
}

#[async_trait]
impl ObjectStore for FsRegionStore {
    async fn copy_object(&self, request: CopyObjectRequest) -> Result<RelocationResult, StorageError> {
        let source = self.object_path(&request.source.bucket, &request.source.key)?;
        let destination = self.object_path(&request.destination.bucket, &request.destination.key)?;

        // source が無ければ copy 先のディレクトリも作らない
        fs::metadata(&source)
            .await
            .map_err(|e| not_found_or_io(e, &request.source.bucket, &request.source.key))?;

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).await?;
        }

        let size = fs::copy(&source, &destination)
            .await
            .map_err(|e| not_found_or_io(e, &request.source.bucket, &request.source.key))?;

        let last_modified = fs::metadata(&destination)
            .await?
            .modified()
            .ok()
            .map(DateTime::<Utc>::from);

        Ok(RelocationResult {
            bucket: request.destination.bucket,
            key: request.destination.key,
            version_id: None,
            last_modified,
            size,
            server_side_encryption: request.server_side_encryption,
        })
    }
}

fn not_found_or_io(e: std::io::Error, bucket: &str, key: &str) -> StorageError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StorageError::NoSuchKey {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    } else {
        StorageError::Io(e)
    }
}
