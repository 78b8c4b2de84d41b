//! ArtefactRelocator - build package を artefact store へ copy する
//!
//! # 前提条件（この順にチェック、それぞれ別の致命的エラー）
//! 1. Package.BucketRegion == artefact store の region（same-region copy のみ）
//! 2. Package.Key が空でない
//!
//! backend は Package.Mode で決まる:
//! - local: (bucket 名, region) の stand-in（既定は in-memory、差し替え可能）
//! - service: region ごとの本物の object store
//!
//! region チェックは mode に関係なく常に行う。

use std::sync::Arc;

use crate::config::{ArtefactStore, InvokerConfig};
use crate::domain::deployment::{KeyStyle, ObjectCategory};
use crate::domain::errors::InvokerError;
use crate::domain::relocation::{CopyObjectRequest, ObjectLocation, RelocationResult};
use crate::domain::task::{StorageMode, TaskPayload};
use crate::impls::InMemoryBuckets;
use crate::ports::{ObjectStore, ObjectStoreProvider};

/// local mode の copy 先
enum LocalBackend {
    Memory(Arc<InMemoryBuckets>),
    Store(Arc<dyn ObjectStoreProvider>),
}

pub struct ArtefactRelocator {
    artefacts: ArtefactStore,
    service: Arc<dyn ObjectStoreProvider>,
    local: LocalBackend,
}

impl ArtefactRelocator {
    /// artefact bucket 名 / region が未設定なら ConfigurationError
    pub fn new(
        config: &InvokerConfig,
        service: Arc<dyn ObjectStoreProvider>,
    ) -> Result<Self, InvokerError> {
        Ok(Self {
            artefacts: config.validate_for_relocation()?,
            service,
            local: LocalBackend::Memory(InMemoryBuckets::global()),
        })
    }

    /// local mode で使う bucket registry を差し替える（テストではプロセス共有を避ける）
    pub fn with_local_buckets(mut self, buckets: Arc<InMemoryBuckets>) -> Self {
        self.local = LocalBackend::Memory(buckets);
        self
    }

    /// local mode の stand-in を任意の backend（filesystem など）にする
    ///
    /// プロセスをまたいで package を置いておきたい CLI 向け。
    pub fn with_local_store(mut self, store: Arc<dyn ObjectStoreProvider>) -> Self {
        self.local = LocalBackend::Store(store);
        self
    }

    pub fn artefact_store(&self) -> &ArtefactStore {
        &self.artefacts
    }

    pub async fn relocate(&self, task: &TaskPayload) -> Result<RelocationResult, InvokerError> {
        let package = &task.package;

        if package.bucket_region != self.artefacts.bucket_region {
            return Err(InvokerError::region_mismatch(&self.artefacts.bucket_region));
        }
        if package.key.is_empty() {
            return Err(InvokerError::InvalidArgument(
                "Package key not found in task payload".to_string(),
            ));
        }

        let destination = ObjectLocation::latest(&self.artefacts.bucket_name, destination_key(task));
        let source = ObjectLocation::latest(&package.bucket_name, &package.key);

        tracing::info!(
            source = ?package,
            destination = ?destination,
            "Copying object to artefacts"
        );

        let store = self.store_for(package.mode)?;
        let result = store
            .copy_object(CopyObjectRequest::artefact_copy(source, destination))
            .await?;
        Ok(result)
    }

    fn store_for(&self, mode: StorageMode) -> Result<Arc<dyn ObjectStore>, InvokerError> {
        let region = &self.artefacts.bucket_region;
        match (mode, &self.local) {
            (StorageMode::Local, LocalBackend::Memory(buckets)) => {
                Ok(Arc::new(buckets.bucket(&self.artefacts.bucket_name, region)))
            }
            (StorageMode::Local, LocalBackend::Store(store)) => Ok(store.store_for_region(region)?),
            (StorageMode::Service, _) => Ok(self.service.store_for_region(region)?),
        }
    }
}

/// artefact store 内の copy 先 key
///
/// source key の最後のセグメントを base name にして、DeploymentDetails に
/// artefacts カテゴリの key を作らせる。service mode なら object store 形式。
pub fn destination_key(task: &TaskPayload) -> String {
    let style = match task.package.mode {
        StorageMode::Service => KeyStyle::ObjectStore,
        StorageMode::Local => KeyStyle::Filesystem,
    };
    task.deployment_details
        .object_key(ObjectCategory::Artefacts, task.package.object_name(), style)
}
