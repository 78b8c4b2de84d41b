//! App - アプリケーション層
//!
//! ports を組み合わせて invoker の 2 つの責務を実装します。
//!
//! # 主要コンポーネント
//! - **DispatcherBuilder**: Dispatcher の構築とワイヤリング
//! - **Dispatcher**: compile / run を local handler か remote compute unit に振り分ける
//! - **TargetResolver**: mode と operation から実行先を決める
//! - **HandlerRegistry**: local handler の登録
//! - **ArtefactRelocator**: build package を artefact store へ copy する

pub mod builder;
pub mod dispatcher;
pub mod registry;
pub mod relocator;
pub mod resolver;

pub use self::builder::DispatcherBuilder;
pub use self::dispatcher::Dispatcher;
pub use self::registry::HandlerRegistry;
pub use self::relocator::{ArtefactRelocator, destination_key};
pub use self::resolver::{ResolvedTarget, TargetResolver};
