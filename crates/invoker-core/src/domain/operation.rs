//! OperationKind - dispatch 対象となる 3 種類の操作
//!
//! 操作の種類は固定です（component-compile / deployspec-compile / run）。
//! remote address の lookup も、local handler の登録もこの enum をキーにします。

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    ComponentCompile,
    DeployspecCompile,
    Run,
}

impl OperationKind {
    pub const ALL: [OperationKind; 3] = [
        OperationKind::ComponentCompile,
        OperationKind::DeployspecCompile,
        OperationKind::Run,
    ];

    /// 設定ファイルや CLI で使う識別子
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ComponentCompile => "component-compile",
            Self::DeployspecCompile => "deployspec-compile",
            Self::Run => "run",
        }
    }

    /// エラーメッセージ用の表示名
    pub fn label(&self) -> &'static str {
        match self {
            Self::ComponentCompile => "Pipeline compiler",
            Self::DeployspecCompile => "Deployspec compiler",
            Self::Run => "Runner",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown operation kind: {s}"))
    }
}
