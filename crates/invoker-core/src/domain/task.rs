//! TaskPayload - dispatch / relocate に渡される作業単位
//!
//! wire 上は PascalCase の JSON です（local handler にも remote にも同じ形で渡す）。

use serde::{Deserialize, Serialize};
use std::fmt;

use super::deployment::DeploymentDetails;

/// package の保存先モード
///
/// `local` は in-process の stand-in bucket、`service` は本物の object store。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    Local,
    #[default]
    Service,
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Service => f.write_str("service"),
        }
    }
}

/// build artefact への参照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageDetails {
    #[serde(default)]
    pub mode: StorageMode,
    pub bucket_name: String,
    pub bucket_region: String,
    #[serde(default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy_spec: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compile_mode: Option<String>,
}

impl PackageDetails {
    pub fn new(
        mode: StorageMode,
        bucket_name: impl Into<String>,
        bucket_region: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            mode,
            bucket_name: bucket_name.into(),
            bucket_region: bucket_region.into(),
            key: key.into(),
            ..Default::default()
        }
    }

    /// key の最後の `/` 以降（object の base name）
    pub fn object_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or_default()
    }
}

/// TaskPayload は dispatch 境界を越える作業単位。
///
/// 上流（pipeline controller）が組み立て、dispatcher / relocator は読むだけ。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskPayload {
    pub task: String,
    #[serde(default)]
    pub force: bool,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    pub deployment_details: DeploymentDetails,
    pub package: PackageDetails,
}

impl TaskPayload {
    pub fn new(
        task: impl Into<String>,
        deployment_details: DeploymentDetails,
        package: PackageDetails,
    ) -> Self {
        Self {
            task: task.into(),
            force: false,
            dry_run: false,
            identity: None,
            deployment_details,
            package,
        }
    }

    /// wire 表現（local / remote で同一の形）
    pub fn to_wire(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> TaskPayload {
        TaskPayload::new(
            "deploy",
            DeploymentDetails::new("acme").with_app("web"),
            PackageDetails::new(StorageMode::Service, "src-bucket", "us-east-1", "builds/2024/app-v1.zip"),
        )
    }

    #[test]
    fn object_name_is_last_key_segment() {
        assert_eq!(payload().package.object_name(), "app-v1.zip");

        let flat = PackageDetails::new(StorageMode::Local, "b", "r", "app.zip");
        assert_eq!(flat.object_name(), "app.zip");

        let empty = PackageDetails::new(StorageMode::Local, "b", "r", "");
        assert_eq!(empty.object_name(), "");
    }

    #[test]
    fn wire_form_is_pascal_case() {
        let v = payload().to_wire().unwrap();
        assert_eq!(v["Task"], "deploy");
        assert_eq!(v["DryRun"], false);
        assert_eq!(v["Package"]["Mode"], "service");
        assert_eq!(v["Package"]["BucketRegion"], "us-east-1");
        assert_eq!(v["DeploymentDetails"]["Portfolio"], "acme");
    }

    #[test]
    fn mode_and_key_default_when_absent() {
        let v = serde_json::json!({
            "Task": "compile",
            "DeploymentDetails": { "Portfolio": "acme" },
            "Package": { "BucketName": "b", "BucketRegion": "us-east-1" }
        });
        let task: TaskPayload = serde_json::from_value(v).unwrap();
        assert_eq!(task.package.mode, StorageMode::Service);
        assert!(task.package.key.is_empty());
        assert!(!task.force);
    }
}
