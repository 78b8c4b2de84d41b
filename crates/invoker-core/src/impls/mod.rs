//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **LocalTarget / RemoteTarget**: ExecutionTarget
//! - **HttpInvoker**: HTTP endpoint を呼ぶ RemoteInvoker
//! - **InMemoryBuckets / InMemoryBucket**: local mode 用の stand-in bucket
//! - **FsObjectStore**: filesystem 上の object store（開発・デモ用の service backend）

pub mod dispatch;
pub mod fs_store;
pub mod http_invoker;
pub mod inmem_bucket;

// 主要な型を再エクスポート
pub use self::dispatch::{LocalTarget, RemoteTarget};
pub use self::fs_store::{FsObjectStore, FsRegionStore};
pub use self::http_invoker::HttpInvoker;
pub use self::inmem_bucket::{BucketId, InMemoryBucket, InMemoryBuckets, StoredObject};
