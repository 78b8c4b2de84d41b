//! HandlerRegistry - operation ごとの local handler
//!
//! local mode でだけ使います。1 つの operation に handler は 1 つまで。

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::errors::InvokerError;
use crate::domain::operation::OperationKind;
use crate::ports::{LocalHandler, TaskHandler, TypedHandler};

/// OperationKind → LocalHandler の対応表
///
/// - 初期化時に組み立てる（mutable）
/// - dispatch 中は `Arc` で共有して読むだけ（immutable）
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<OperationKind, Arc<dyn LocalHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// JSON レベルの handler を登録。同じ operation への 2 回目の登録はエラー
    pub fn register(
        &mut self,
        operation: OperationKind,
        handler: Arc<dyn LocalHandler>,
    ) -> Result<(), InvokerError> {
        if self.handlers.contains_key(&operation) {
            return Err(InvokerError::DuplicateHandler(operation));
        }
        self.handlers.insert(operation, handler);
        Ok(())
    }

    /// 型付き handler を登録（呼び出し前に payload をデコードする）
    pub fn register_typed<H: TaskHandler + 'static>(
        &mut self,
        operation: OperationKind,
        handler: H,
    ) -> Result<(), InvokerError> {
        self.register(operation, Arc::new(TypedHandler::new(handler)))
    }

    pub fn get(&self, operation: OperationKind) -> Option<Arc<dyn LocalHandler>> {
        self.handlers.get(&operation).cloned()
    }

    /// handler 未登録の operation（ALL の順）
    pub fn missing(&self) -> Vec<OperationKind> {
        OperationKind::ALL
            .into_iter()
            .filter(|op| !self.handlers.contains_key(op))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
