//! Dispatcher - 3 種類の operation を解決済みの実行先で実行する
//!
//! # 流れ
//! 1. TaskPayload を wire 表現（JSON）に serialize（local / remote で同じ形）
//! 2. TargetResolver で local / remote を決める
//! 3. ExecutionTarget を 1 回だけ呼ぶ（retry なし）
//! 4. local は handler の戻り値、remote は envelope の `Response` を返す
//!
//! dispatch 同士は独立で、Dispatcher 自体は状態を持ちません。

use std::sync::Arc;

use serde_json::Value;

use crate::app::registry::HandlerRegistry;
use crate::app::resolver::{ResolvedTarget, TargetResolver};
use crate::domain::errors::InvokerError;
use crate::domain::operation::OperationKind;
use crate::domain::task::TaskPayload;
use crate::impls::{LocalTarget, RemoteTarget};
use crate::ports::{ExecutionTarget, RemoteInvoker};

pub struct Dispatcher {
    resolver: TargetResolver,
    registry: Arc<HandlerRegistry>,
    invoker: Option<Arc<dyn RemoteInvoker>>,
}

impl Dispatcher {
    pub fn new(
        resolver: TargetResolver,
        registry: Arc<HandlerRegistry>,
        invoker: Option<Arc<dyn RemoteInvoker>>,
    ) -> Self {
        Self {
            resolver,
            registry,
            invoker,
        }
    }

    pub fn resolver(&self) -> &TargetResolver {
        &self.resolver
    }

    pub async fn dispatch(
        &self,
        operation: OperationKind,
        task: &TaskPayload,
    ) -> Result<Value, InvokerError> {
        let payload = task.to_wire()?;
        let target = self.target_for(operation)?;

        tracing::debug!(
            %operation,
            target = %target.describe(),
            task = %task.task,
            "dispatching task"
        );

        target.execute(operation, payload).await
    }

    pub async fn compile_component(&self, task: &TaskPayload) -> Result<Value, InvokerError> {
        self.dispatch(OperationKind::ComponentCompile, task).await
    }

    pub async fn compile_deployspec(&self, task: &TaskPayload) -> Result<Value, InvokerError> {
        self.dispatch(OperationKind::DeployspecCompile, task).await
    }

    /// runner を起動する。Package / Action / State の場所は埋まっている前提。
    pub async fn run(&self, task: &TaskPayload) -> Result<Value, InvokerError> {
        self.dispatch(OperationKind::Run, task).await
    }

    fn target_for(&self, operation: OperationKind) -> Result<Box<dyn ExecutionTarget>, InvokerError> {
        match self.resolver.resolve(operation)? {
            ResolvedTarget::Local => {
                let handler = self.registry.get(operation).ok_or_else(|| {
                    InvokerError::Configuration(format!("no local handler registered for {operation}"))
                })?;
                Ok(Box::new(LocalTarget::new(handler)))
            }
            ResolvedTarget::Remote { address } => {
                let invoker = self.invoker.clone().ok_or_else(|| {
                    InvokerError::Configuration("no remote invoker configured".to_string())
                })?;
                Ok(Box::new(RemoteTarget::new(invoker, address)))
            }
        }
    }
}
