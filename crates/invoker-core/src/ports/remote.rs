//! RemoteInvoker port - 独立してデプロイされた compute unit の呼び出し
//!
//! address + payload を渡し、生の結果（envelope 検証前）を受け取る。
//! transport の詳細（HTTP, SDK など）は実装側に閉じ込めます。
//!
//! # 実装
//! - **HttpInvoker**: endpoint URL に JSON を POST（impls/http_invoker）

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::InvokerError;

/// RemoteInvoker は 1 回の呼び出しにつき 1 回だけ request を送る
///
/// # 設計原則
/// - retry しない（失敗はそのまま `InvokerError::Transport`）
/// - timeout は transport 側で強制する
#[async_trait]
pub trait RemoteInvoker: Send + Sync {
    async fn invoke(&self, address: &str, payload: Value) -> Result<Value, InvokerError>;
}
