//! LocalTarget / RemoteTarget - ExecutionTarget の 2 つの実装
//!
//! 同じ serialize 済み payload を受け取り、呼び出し元には同じ形の結果を返します。
//! envelope の検証は RemoteTarget だけが行います。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::envelope::ResponseEnvelope;
use crate::domain::errors::InvokerError;
use crate::domain::operation::OperationKind;
use crate::ports::{ExecutionTarget, LocalHandler, RemoteInvoker};

pub struct LocalTarget {
    handler: Arc<dyn LocalHandler>,
}

impl LocalTarget {
    pub fn new(handler: Arc<dyn LocalHandler>) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl ExecutionTarget for LocalTarget {
    async fn execute(&self, _operation: OperationKind, payload: Value) -> Result<Value, InvokerError> {
        // local handler は envelope で包まない
        self.handler.handle(payload, None).await
    }

    fn describe(&self) -> String {
        "local".to_string()
    }
}

pub struct RemoteTarget {
    invoker: Arc<dyn RemoteInvoker>,
    address: String,
}

impl RemoteTarget {
    pub fn new(invoker: Arc<dyn RemoteInvoker>, address: impl Into<String>) -> Self {
        Self {
            invoker,
            address: address.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl ExecutionTarget for RemoteTarget {
    async fn execute(&self, operation: OperationKind, payload: Value) -> Result<Value, InvokerError> {
        let raw = self.invoker.invoke(&self.address, payload).await?;
        ResponseEnvelope::new(raw)
            .into_response(operation)
            .inspect_err(|e| {
                tracing::warn!(%operation, address = %self.address, error = %e, "remote contract violation");
            })
    }

    fn describe(&self) -> String {
        format!("remote:{}", self.address)
    }
}
