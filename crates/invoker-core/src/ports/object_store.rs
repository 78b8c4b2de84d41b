//! ObjectStore port - artefact store への server-side copy
//!
//! 呼び出し側は `copy_object` という capability だけに依存し、
//! どの backend が動いているかは知りません。
//!
//! # 実装
//! - **InMemoryBucket**: bucket 名 + region で引く in-process の stand-in（local mode）
//! - **FsObjectStore**: `<root>/<region>/<bucket>/<key>` に置く filesystem backend
//! - 本物の object store client は `ObjectStoreProvider` 経由で差し込む

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::relocation::{CopyObjectRequest, RelocationResult};

/// StorageError は object store 操作のエラー
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("no such key: {bucket}/{key}")]
    NoSuchKey { bucket: String, key: String },

    #[error("bucket mismatch: store is scoped to '{expected}', request targets '{actual}'")]
    BucketMismatch { expected: String, actual: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Backend(String),
}

/// ObjectStore は copy を受け付ける backend
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn copy_object(&self, request: CopyObjectRequest) -> Result<RelocationResult, StorageError>;
}

/// region ごとの本物の object store client を返す
pub trait ObjectStoreProvider: Send + Sync {
    fn store_for_region(&self, region: &str) -> Result<Arc<dyn ObjectStore>, StorageError>;
}
