//! InMemoryBuckets - local mode 用の in-process bucket stand-in
//!
//! # 実装詳細
//! - HashMap<BucketId, BTreeMap<key, StoredObject>> で (bucket 名, region) ごとに管理
//! - Mutex で排他制御（await を跨いでロックを持たない）
//! - プロセス全体で共有する registry は `InMemoryBuckets::global()`
//!
//! # 使用例
//! ```ignore
//! let buckets = InMemoryBuckets::global();
//! buckets.put_object("src", "us-east-1", "builds/app.zip", b"zip".to_vec());
//! let bucket = buckets.bucket("artefacts", "us-east-1");
//! bucket.copy_object(request).await?;
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::relocation::{
    CopyObjectRequest, ObjectAcl, RelocationResult, ServerSideEncryption,
};
use crate::ports::{
    Clock, ObjectStore, StorageError, SystemClock, UlidVersionGenerator, VersionIdGenerator,
};

/// bucket は名前と region の組で識別する
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketId {
    pub name: String,
    pub region: String,
}

impl BucketId {
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub version_id: String,
    pub last_modified: DateTime<Utc>,
    pub acl: Option<ObjectAcl>,
    pub server_side_encryption: Option<ServerSideEncryption>,
}

type Buckets = HashMap<BucketId, BTreeMap<String, StoredObject>>;

pub struct InMemoryBuckets {
    buckets: Mutex<Buckets>,
    clock: Arc<dyn Clock>,
    versions: Arc<dyn VersionIdGenerator>,
}

static GLOBAL: OnceLock<Arc<InMemoryBuckets>> = OnceLock::new();

impl InMemoryBuckets {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    pub fn with_clock<C: Clock + Clone + 'static>(clock: C) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            clock: Arc::new(clock.clone()),
            versions: Arc::new(UlidVersionGenerator::new(clock)),
        }
    }

    /// プロセス全体で共有される registry
    pub fn global() -> Arc<Self> {
        GLOBAL.get_or_init(|| Arc::new(Self::new())).clone()
    }

    /// (name, region) で scope された stand-in bucket を開く
    pub fn bucket(self: &Arc<Self>, name: impl Into<String>, region: impl Into<String>) -> InMemoryBucket {
        InMemoryBucket {
            id: BucketId::new(name, region),
            registry: Arc::clone(self),
        }
    }

    pub fn put_object(
        &self,
        name: &str,
        region: &str,
        key: &str,
        body: impl Into<Vec<u8>>,
    ) -> StoredObject {
        let object = self.new_object(body.into(), None, None);
        self.lock()
            .entry(BucketId::new(name, region))
            .or_default()
            .insert(key.to_string(), object.clone());
        object
    }

    pub fn get_object(&self, name: &str, region: &str, key: &str) -> Option<StoredObject> {
        self.lock()
            .get(&BucketId::new(name, region))
            .and_then(|objects| objects.get(key))
            .cloned()
    }

    pub fn list_keys(&self, name: &str, region: &str) -> Vec<String> {
        self.lock()
            .get(&BucketId::new(name, region))
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn copy(&self, region: &str, request: CopyObjectRequest) -> Result<RelocationResult, StorageError> {
        let mut buckets = self.lock();

        let source_body = buckets
            .get(&BucketId::new(&request.source.bucket, region))
            .and_then(|objects| objects.get(&request.source.key))
            .map(|object| object.body.clone())
            .ok_or_else(|| StorageError::NoSuchKey {
                bucket: request.source.bucket.clone(),
                key: request.source.key.clone(),
            })?;

        let size = source_body.len() as u64;
        let object = self.new_object(
            source_body,
            Some(request.acl),
            Some(request.server_side_encryption),
        );
        let result = RelocationResult {
            bucket: request.destination.bucket.clone(),
            key: request.destination.key.clone(),
            version_id: Some(object.version_id.clone()),
            last_modified: Some(object.last_modified),
            size,
            server_side_encryption: request.server_side_encryption,
        };

        buckets
            .entry(BucketId::new(request.destination.bucket, region))
            .or_default()
            .insert(request.destination.key, object);

        Ok(result)
    }

    fn new_object(
        &self,
        body: Vec<u8>,
        acl: Option<ObjectAcl>,
        server_side_encryption: Option<ServerSideEncryption>,
    ) -> StoredObject {
        StoredObject {
            body,
            version_id: self.versions.next_version_id(),
            last_modified: self.clock.now(),
            acl,
            server_side_encryption,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Buckets> {
        // 保持中に panic しても map 自体は一貫している
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryBuckets {
    fn default() -> Self {
        Self::new()
    }
}

/// InMemoryBucket は 1 つの (name, region) に scope された ObjectStore
///
/// source object は同じ region の bucket から読みます（cross-region copy は無い）。
#[derive(Clone)]
pub struct InMemoryBucket {
    id: BucketId,
    registry: Arc<InMemoryBuckets>,
}

impl InMemoryBucket {
    pub fn id(&self) -> &BucketId {
        &self.id
    }
}

#[async_trait]
impl ObjectStore for InMemoryBucket {
    async fn copy_object(&self, request: CopyObjectRequest) -> Result<RelocationResult, StorageError> {
        if request.destination.bucket != self.id.name {
            return Err(StorageError::BucketMismatch {
                expected: self.id.name.clone(),
                actual: request.destination.bucket,
            });
        }
        self.registry.copy(&self.id.region, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::relocation::ObjectLocation;
    use crate::ports::FixedClock;
    use chrono::TimeZone;

    fn request(dest_bucket: &str) -> CopyObjectRequest {
        CopyObjectRequest::artefact_copy(
            ObjectLocation::latest("src", "builds/app.zip"),
            ObjectLocation::latest(dest_bucket, "artefacts/acme/app.zip"),
        )
    }

    #[tokio::test]
    async fn copy_writes_destination_with_policy() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let buckets = Arc::new(InMemoryBuckets::with_clock(FixedClock::new(at)));
        buckets.put_object("src", "us-east-1", "builds/app.zip", b"zip-bytes".to_vec());

        let bucket = buckets.bucket("artefacts", "us-east-1");
        let result = bucket.copy_object(request("artefacts")).await.unwrap();

        assert_eq!(result.bucket, "artefacts");
        assert_eq!(result.key, "artefacts/acme/app.zip");
        assert_eq!(result.size, 9);
        assert_eq!(result.last_modified, Some(at));
        assert!(result.version_id.is_some());

        let stored = buckets
            .get_object("artefacts", "us-east-1", "artefacts/acme/app.zip")
            .unwrap();
        assert_eq!(stored.body, b"zip-bytes");
        assert_eq!(stored.acl, Some(ObjectAcl::BucketOwnerFullControl));
        assert_eq!(stored.server_side_encryption, Some(ServerSideEncryption::Aes256));
        assert_eq!(Some(stored.version_id), result.version_id);
    }

    #[tokio::test]
    async fn missing_source_is_no_such_key() {
        let buckets = Arc::new(InMemoryBuckets::new());
        let bucket = buckets.bucket("artefacts", "us-east-1");

        let err = bucket.copy_object(request("artefacts")).await.unwrap_err();
        assert!(matches!(err, StorageError::NoSuchKey { .. }));
        assert!(buckets.list_keys("artefacts", "us-east-1").is_empty());
    }

    #[tokio::test]
    async fn source_in_other_region_is_not_visible() {
        let buckets = Arc::new(InMemoryBuckets::new());
        buckets.put_object("src", "eu-west-1", "builds/app.zip", b"zip".to_vec());

        let bucket = buckets.bucket("artefacts", "us-east-1");
        let err = bucket.copy_object(request("artefacts")).await.unwrap_err();
        assert!(matches!(err, StorageError::NoSuchKey { .. }));
    }

    #[tokio::test]
    async fn destination_must_match_opened_bucket() {
        let buckets = Arc::new(InMemoryBuckets::new());
        buckets.put_object("src", "us-east-1", "builds/app.zip", b"zip".to_vec());

        let bucket = buckets.bucket("artefacts", "us-east-1");
        let err = bucket.copy_object(request("elsewhere")).await.unwrap_err();
        assert!(matches!(err, StorageError::BucketMismatch { .. }));
    }

    #[test]
    fn distinct_buckets_do_not_conflict() {
        let buckets = InMemoryBuckets::new();
        buckets.put_object("a", "us-east-1", "k", b"1".to_vec());
        buckets.put_object("b", "us-east-1", "k", b"2".to_vec());
        buckets.put_object("a", "eu-west-1", "k", b"3".to_vec());

        assert_eq!(buckets.get_object("a", "us-east-1", "k").unwrap().body, b"1");
        assert_eq!(buckets.get_object("b", "us-east-1", "k").unwrap().body, b"2");
        assert_eq!(buckets.get_object("a", "eu-west-1", "k").unwrap().body, b"3");
    }

    #[test]
    fn global_registry_is_shared() {
        let a = InMemoryBuckets::global();
        let b = InMemoryBuckets::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
