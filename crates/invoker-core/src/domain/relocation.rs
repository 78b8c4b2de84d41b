//! Relocation model: copy request と backend からの acknowledgment。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// bucket + key (+ version)。version は常に None（最新版）で扱う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
    pub version_id: Option<String>,
}

impl ObjectLocation {
    pub fn latest(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            version_id: None,
        }
    }
}

impl fmt::Display for ObjectLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectAcl {
    #[serde(rename = "bucket-owner-full-control")]
    BucketOwnerFullControl,
}

impl ObjectAcl {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BucketOwnerFullControl => "bucket-owner-full-control",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerSideEncryption {
    #[serde(rename = "AES256")]
    Aes256,
}

impl ServerSideEncryption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aes256 => "AES256",
        }
    }
}

/// same-account の server-side copy 要求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CopyObjectRequest {
    pub destination: ObjectLocation,
    pub source: ObjectLocation,
    pub acl: ObjectAcl,
    pub server_side_encryption: ServerSideEncryption,
}

impl CopyObjectRequest {
    /// artefact store への relocation で使う固定ポリシー付きの copy
    pub fn artefact_copy(source: ObjectLocation, destination: ObjectLocation) -> Self {
        Self {
            destination,
            source,
            acl: ObjectAcl::BucketOwnerFullControl,
            server_side_encryption: ServerSideEncryption::Aes256,
        }
    }
}

/// backend の copy acknowledgment（そのまま呼び出し元へ返す）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RelocationResult {
    pub bucket: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    pub size: u64,
    pub server_side_encryption: ServerSideEncryption,
}
