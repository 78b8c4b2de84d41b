//! Errors - エラー型と分類
//!
//! dispatch / relocate のどちらも、失敗はすべて呼び出し元へそのまま伝播します。
//! この層では retry も握りつぶしも行いません。

use thiserror::Error;

use super::operation::OperationKind;
use crate::ports::object_store::StorageError;

/// 外部 transport / client から来るエラーの型消去
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// InvokerError は dispatch / relocate のドメインエラー
#[derive(Debug, Error)]
pub enum InvokerError {
    /// remote address / bucket / region / local handler の設定不足
    #[error("configuration error: {0}")]
    Configuration(String),

    /// transport は成功したが envelope が壊れている
    #[error("{0}")]
    Protocol(String),

    /// source bucket の region が artefact store の region と一致しない
    #[error("{message}")]
    RegionMismatch { expected: String, message: String },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("handler failed: {0}")]
    Handler(String),

    #[error("transport failure invoking {target}: {source}")]
    Transport {
        target: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("duplicate handler for operation={0}")]
    DuplicateHandler(OperationKind),

    #[error("missing handlers for operations: {0:?}")]
    MissingHandlers(Vec<OperationKind>),

    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl InvokerError {
    pub fn region_mismatch(expected: impl Into<String>) -> Self {
        let expected = expected.into();
        let message = format!("Source bucket must be in region '{expected}'");
        Self::RegionMismatch { expected, message }
    }

    pub fn transport(target: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            target: target.into(),
            source: source.into(),
        }
    }
}
