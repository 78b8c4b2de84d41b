//! DispatcherBuilder - Dispatcher の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - local mode: 3 種類すべての operation に handler が登録されているか build() 時にチェック
//! - 不足があれば dispatch を待たずにエラーを返す
//!
//! remote mode の address は operation ごとに dispatch 時に解決します。
//! runner だけを設定したデプロイでも run は呼べます。

use std::sync::Arc;
use std::time::Duration;

use crate::app::dispatcher::Dispatcher;
use crate::app::registry::HandlerRegistry;
use crate::app::resolver::TargetResolver;
use crate::config::{ExecutionMode, InvokerConfig};
use crate::domain::errors::InvokerError;
use crate::domain::operation::OperationKind;
use crate::impls::HttpInvoker;
use crate::ports::{LocalHandler, RemoteInvoker, TaskHandler};

/// # 使用例
/// ```ignore
/// let dispatcher = DispatcherBuilder::new(&config)
///     .register(OperationKind::ComponentCompile, ComponentCompiler)?
///     .register(OperationKind::DeployspecCompile, DeployspecCompiler)?
///     .register(OperationKind::Run, Runner)?
///     .build()?;
/// ```
pub struct DispatcherBuilder {
    resolver: TargetResolver,
    timeout: Duration,
    registry: HandlerRegistry,
    invoker: Option<Arc<dyn RemoteInvoker>>,
}

impl DispatcherBuilder {
    pub fn new(config: &InvokerConfig) -> Self {
        Self {
            resolver: TargetResolver::new(config),
            timeout: Duration::from_secs(config.http.timeout_secs),
            registry: HandlerRegistry::new(),
            invoker: None,
        }
    }

    /// 型付き handler を登録
    pub fn register<H: TaskHandler + 'static>(
        mut self,
        operation: OperationKind,
        handler: H,
    ) -> Result<Self, InvokerError> {
        self.registry.register_typed(operation, handler)?;
        Ok(self)
    }

    /// JSON レベルの handler を登録
    pub fn register_dyn(
        mut self,
        operation: OperationKind,
        handler: Arc<dyn LocalHandler>,
    ) -> Result<Self, InvokerError> {
        self.registry.register(operation, handler)?;
        Ok(self)
    }

    /// remote invoker を差し替える（未指定なら HttpInvoker）
    pub fn with_remote_invoker(mut self, invoker: Arc<dyn RemoteInvoker>) -> Self {
        self.invoker = Some(invoker);
        self
    }

    pub fn build(self) -> Result<Dispatcher, InvokerError> {
        let invoker = match self.resolver.mode() {
            ExecutionMode::Local => {
                let missing = self.registry.missing();
                if !missing.is_empty() {
                    return Err(InvokerError::MissingHandlers(missing));
                }
                self.invoker
            }
            ExecutionMode::Remote => match self.invoker {
                Some(invoker) => Some(invoker),
                None => Some(Arc::new(HttpInvoker::new(self.timeout)?) as Arc<dyn RemoteInvoker>),
            },
        };

        Ok(Dispatcher::new(
            self.resolver,
            Arc::new(self.registry),
            invoker,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemoteTargets;
    use crate::domain::{DeploymentDetails, PackageDetails, StorageMode, TaskPayload};
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct OkHandler;

    #[async_trait]
    impl TaskHandler for OkHandler {
        async fn handle(&self, _task: TaskPayload) -> Result<Value, InvokerError> {
            Ok(json!({}))
        }
    }

    struct Started;

    #[async_trait]
    impl RemoteInvoker for Started {
        async fn invoke(&self, _address: &str, _payload: Value) -> Result<Value, InvokerError> {
            Ok(json!({ "Response": { "Started": true } }))
        }
    }

    fn task() -> TaskPayload {
        TaskPayload::new(
            "deploy",
            DeploymentDetails::new("acme"),
            PackageDetails::new(StorageMode::Service, "src", "us-east-1", "builds/app.zip"),
        )
    }

    #[test]
    fn test_local_build_success() {
        let dispatcher = DispatcherBuilder::new(&InvokerConfig::local())
            .register(OperationKind::ComponentCompile, OkHandler)
            .unwrap()
            .register(OperationKind::DeployspecCompile, OkHandler)
            .unwrap()
            .register(OperationKind::Run, OkHandler)
            .unwrap()
            .build();
        assert!(dispatcher.is_ok());
    }

    #[test]
    fn test_local_build_missing_handlers() {
        let result = DispatcherBuilder::new(&InvokerConfig::local())
            .register(OperationKind::ComponentCompile, OkHandler)
            .unwrap()
            .build();
        assert!(matches!(
            result,
            Err(InvokerError::MissingHandlers(missing))
                if missing == vec![OperationKind::DeployspecCompile, OperationKind::Run]
        ));
    }

    #[test]
    fn test_duplicate_registration() {
        let result = DispatcherBuilder::new(&InvokerConfig::local())
            .register(OperationKind::Run, OkHandler)
            .unwrap()
            .register(OperationKind::Run, OkHandler);
        assert!(matches!(result, Err(InvokerError::DuplicateHandler(OperationKind::Run))));
    }

    #[tokio::test]
    async fn test_remote_address_is_resolved_per_operation() {
        let config = InvokerConfig {
            remote: RemoteTargets {
                component_compiler: None,
                deployspec_compiler: None,
                runner: Some("https://runner".to_string()),
            },
            ..Default::default()
        };
        let dispatcher = DispatcherBuilder::new(&config)
            .with_remote_invoker(Arc::new(Started))
            .build()
            .unwrap();

        let started = dispatcher.run(&task()).await.unwrap();
        assert_eq!(started, json!({ "Started": true }));

        let err = dispatcher.compile_component(&task()).await.unwrap_err();
        assert!(matches!(err, InvokerError::Configuration(ref m) if m.contains("component-compile")));
        let err = dispatcher.compile_deployspec(&task()).await.unwrap_err();
        assert!(matches!(err, InvokerError::Configuration(ref m) if m.contains("deployspec-compile")));
    }

    #[test]
    fn test_remote_build_defaults_to_http_invoker() {
        let config = InvokerConfig {
            remote: RemoteTargets {
                component_compiler: Some("https://compiler".to_string()),
                deployspec_compiler: Some("https://deployspec".to_string()),
                runner: Some("https://runner".to_string()),
            },
            ..Default::default()
        };
        assert!(DispatcherBuilder::new(&config).build().is_ok());
    }
}
