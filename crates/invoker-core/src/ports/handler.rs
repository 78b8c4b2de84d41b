//! LocalHandler port - in-process で実行される handler
//!
//! # 二層構造
//! - **内部（Dyn）**: `LocalHandler` - JSON レベル、object-safe
//! - **表層（Typed）**: `TaskHandler` - デコード済みの `TaskPayload` を受け取る
//!
//! `TypedHandler<H>` が TaskHandler を LocalHandler に変換します（type erasure）。
//! compiler / runner の中身はこのクレートの外にあり、ここでは契約だけを定義します。

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::InvokerError;
use crate::domain::task::TaskPayload;

/// handler に渡される実行コンテキスト
///
/// dispatcher は常に `None` を渡します。
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    pub request_id: Option<String>,
}

/// LocalHandler はシリアライズ済みの TaskPayload を受け取り、
/// envelope で包まれていない素の結果 mapping を返す
#[async_trait]
pub trait LocalHandler: Send + Sync {
    async fn handle(
        &self,
        payload: Value,
        ctx: Option<ExecutionContext>,
    ) -> Result<Value, InvokerError>;
}

/// TaskHandler は型付きの handler
///
/// # 使用例
/// ```ignore
/// struct Compiler;
///
/// #[async_trait]
/// impl TaskHandler for Compiler {
///     async fn handle(&self, task: TaskPayload) -> Result<Value, InvokerError> {
///         Ok(json!({ "Status": "compiled", "Task": task.task }))
///     }
/// }
/// ```
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn handle(&self, task: TaskPayload) -> Result<Value, InvokerError>;
}

/// TaskHandler → LocalHandler のアダプタ
pub struct TypedHandler<H> {
    handler: H,
}

impl<H: TaskHandler> TypedHandler<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl<H: TaskHandler> LocalHandler for TypedHandler<H> {
    async fn handle(
        &self,
        payload: Value,
        _ctx: Option<ExecutionContext>,
    ) -> Result<Value, InvokerError> {
        let task: TaskPayload = serde_json::from_value(payload)
            .map_err(|e| InvokerError::InvalidArgument(format!("task payload decode: {e}")))?;
        self.handler.handle(task).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeploymentDetails, PackageDetails, StorageMode};
    use serde_json::json;

    struct EchoTask;

    #[async_trait]
    impl TaskHandler for EchoTask {
        async fn handle(&self, task: TaskPayload) -> Result<Value, InvokerError> {
            Ok(json!({ "Task": task.task, "Key": task.package.key }))
        }
    }

    #[tokio::test]
    async fn typed_handler_decodes_payload() {
        let task = TaskPayload::new(
            "compile",
            DeploymentDetails::new("acme"),
            PackageDetails::new(StorageMode::Local, "b", "us-east-1", "builds/app.zip"),
        );
        let handler = TypedHandler::new(EchoTask);

        let result = handler.handle(task.to_wire().unwrap(), None).await.unwrap();
        assert_eq!(result, json!({ "Task": "compile", "Key": "builds/app.zip" }));
    }

    #[tokio::test]
    async fn typed_handler_rejects_malformed_payload() {
        let handler = TypedHandler::new(EchoTask);
        let err = handler.handle(json!({ "value": 100 }), None).await.unwrap_err();
        assert!(matches!(err, InvokerError::InvalidArgument(_)));
    }
}
