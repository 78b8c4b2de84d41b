//! TargetResolver - operation ごとに local / remote を決める
//!
//! プロセス全体の mode と operation → address の固定 lookup だけで決まる純粋関数です。
//! 設定は起動時に組み立てた InvokerConfig から受け取り、環境を直接読みません。

use crate::config::{ExecutionMode, InvokerConfig, RemoteTargets};
use crate::domain::errors::InvokerError;
use crate::domain::operation::OperationKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    Local,
    Remote { address: String },
}

#[derive(Debug, Clone)]
pub struct TargetResolver {
    mode: ExecutionMode,
    remote: RemoteTargets,
}

impl TargetResolver {
    pub fn new(config: &InvokerConfig) -> Self {
        Self {
            mode: config.mode,
            remote: config.remote.clone(),
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn resolve(&self, operation: OperationKind) -> Result<ResolvedTarget, InvokerError> {
        match self.mode {
            ExecutionMode::Local => Ok(ResolvedTarget::Local),
            ExecutionMode::Remote => self
                .remote
                .address(operation)
                .map(|address| ResolvedTarget::Remote {
                    address: address.to_string(),
                })
                .ok_or_else(|| {
                    InvokerError::Configuration(format!(
                        "no remote address configured for {operation}"
                    ))
                }),
        }
    }
}
