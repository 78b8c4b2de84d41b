//! ExecutionTarget port - 解決済みの実行先
//!
//! local / remote の分岐を 1 つの trait にまとめ、
//! Dispatcher 側に mode の条件分岐を散らばらせないようにします。
//!
//! # 実装
//! - **LocalTarget**: 登録済み LocalHandler を in-process で呼ぶ
//! - **RemoteTarget**: RemoteInvoker で呼び、ResponseEnvelope を検証する

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::InvokerError;
use crate::domain::operation::OperationKind;

/// ExecutionTarget は serialize 済みの payload を実行し、
/// 呼び出し元から見て同じ形の結果を返す
///
/// - local: handler の戻り値をそのまま
/// - remote: envelope の `Response` の中身
#[async_trait]
pub trait ExecutionTarget: Send + Sync {
    async fn execute(&self, operation: OperationKind, payload: Value) -> Result<Value, InvokerError>;

    /// ログ用の短い説明
    fn describe(&self) -> String;
}
