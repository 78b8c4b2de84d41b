//! Configuration for the invoker
//!
//! プロセス起動時に 1 回だけ組み立て、resolver / relocator に参照で渡します。
//! 途中で書き換えない前提です。

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::errors::InvokerError;
use crate::domain::operation::OperationKind;

/// 環境変数のプレフィックス（`INVOKER_MODE`, `INVOKER_ARTEFACTS__BUCKET_REGION` など）
pub const ENV_PREFIX: &str = "INVOKER";

/// プロセス全体の実行モード
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// in-process handler を呼ぶ（local / test mode）
    Local,
    /// remote compute unit を呼ぶ
    #[default]
    Remote,
}

/// Main invoker configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvokerConfig {
    #[serde(default)]
    pub mode: ExecutionMode,

    /// Artefact store (relocation destination)
    #[serde(default)]
    pub artefacts: ArtefactStoreConfig,

    /// Remote addresses per operation kind
    #[serde(default)]
    pub remote: RemoteTargets,

    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtefactStoreConfig {
    pub bucket_name: Option<String>,
    pub bucket_region: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteTargets {
    pub component_compiler: Option<String>,
    pub deployspec_compiler: Option<String>,
    pub runner: Option<String>,
}

impl RemoteTargets {
    /// 空文字列は未設定として扱う
    pub fn address(&self, operation: OperationKind) -> Option<&str> {
        let address = match operation {
            OperationKind::ComponentCompile => self.component_compiler.as_deref(),
            OperationKind::DeployspecCompile => self.deployspec_compiler.as_deref(),
            OperationKind::Run => self.runner.as_deref(),
        };
        address.map(str::trim).filter(|a| !a.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

/// 検証済みの artefact store 設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtefactStore {
    pub bucket_name: String,
    pub bucket_region: String,
}

impl InvokerConfig {
    /// Load configuration: defaults → file (optional) → `INVOKER_*` environment
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(path, Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load_with_env(
        path: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&InvokerConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder.add_source(env).build()?.try_deserialize()
    }

    pub fn local() -> Self {
        Self {
            mode: ExecutionMode::Local,
            ..Default::default()
        }
    }

    pub fn with_artefact_store(
        mut self,
        bucket_name: impl Into<String>,
        bucket_region: impl Into<String>,
    ) -> Self {
        self.artefacts = ArtefactStoreConfig {
            bucket_name: Some(bucket_name.into()),
            bucket_region: Some(bucket_region.into()),
        };
        self
    }

    pub fn is_local_mode(&self) -> bool {
        self.mode == ExecutionMode::Local
    }

    /// relocation に必要な bucket 名 / region が揃っているか
    pub fn validate_for_relocation(&self) -> Result<ArtefactStore, InvokerError> {
        let bucket_name = non_blank(self.artefacts.bucket_name.as_deref())
            .ok_or_else(|| InvokerError::Configuration("artefact bucket name is not configured".into()))?;
        let bucket_region = non_blank(self.artefacts.bucket_region.as_deref())
            .ok_or_else(|| InvokerError::Configuration("artefact bucket region is not configured".into()))?;
        Ok(ArtefactStore {
            bucket_name: bucket_name.to_string(),
            bucket_region: bucket_region.to_string(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
