//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（compiler / runner handler, remote compute unit,
//! object store）へのインターフェースを提供し、実装の詳細を隠蔽します。

pub mod clock;
pub mod dispatch;
pub mod handler;
pub mod id_generator;
pub mod object_store;
pub mod remote;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::dispatch::ExecutionTarget;
pub use self::handler::{ExecutionContext, LocalHandler, TaskHandler, TypedHandler};
pub use self::id_generator::{UlidVersionGenerator, VersionIdGenerator};
pub use self::object_store::{ObjectStore, ObjectStoreProvider, StorageError};
pub use self::remote::RemoteInvoker;
