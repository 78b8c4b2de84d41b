//! DeploymentDetails - artefact store 内の論理アドレス
//!
//! object key の導出は純粋関数です（同じ入力からは常に同じ key）。

use serde::{Deserialize, Serialize};
use std::fmt;

const BRANCH_SHORT_NAME_MAX_LEN: usize = 20;

/// artefact store 内のオブジェクト分類（key の先頭セグメント）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectCategory {
    Artefacts,
    Packages,
    Files,
}

impl ObjectCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Artefacts => "artefacts",
            Self::Packages => "packages",
            Self::Files => "files",
        }
    }
}

impl fmt::Display for ObjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// key のセパレータ
///
/// - ObjectStore: 常に `/`
/// - Filesystem: ホストのパスセパレータ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStyle {
    ObjectStore,
    Filesystem,
}

impl KeyStyle {
    pub fn separator(&self) -> char {
        match self {
            Self::ObjectStore => '/',
            Self::Filesystem => std::path::MAIN_SEPARATOR,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeploymentDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    pub portfolio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_short_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_center: Option<String>,
}

impl DeploymentDetails {
    pub fn new(portfolio: impl Into<String>) -> Self {
        Self {
            portfolio: portfolio.into(),
            ..Default::default()
        }
    }

    pub fn with_app(mut self, app: impl Into<String>) -> Self {
        self.app = Some(app.into());
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = Some(build.into());
        self
    }

    /// BranchShortName が無ければ Branch から導出する
    pub fn short_branch_name(&self) -> Option<String> {
        if let Some(short) = self.branch_short_name.as_deref()
            && !short.is_empty()
        {
            return Some(short.to_string());
        }
        self.branch.as_deref().filter(|b| !b.is_empty()).map(|branch| {
            branch
                .to_lowercase()
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
                .take(BRANCH_SHORT_NAME_MAX_LEN)
                .collect()
        })
    }

    /// category と name から namespaced な object key を作る
    ///
    /// - artefacts / packages: `{category}/{portfolio}/{app}/{branch}/{build}/{name}`
    /// - files: `{category}/{portfolio}/{app}/{name}`
    ///
    /// 空のセグメントは飛ばします。
    pub fn object_key(&self, category: ObjectCategory, name: &str, style: KeyStyle) -> String {
        let mut segments: Vec<String> = vec![category.as_str().to_string(), self.portfolio.clone()];
        segments.extend(self.app.clone());
        if category != ObjectCategory::Files {
            segments.extend(self.short_branch_name());
            segments.extend(self.build.clone());
        }
        segments.push(name.to_string());

        let separator = style.separator().to_string();
        segments
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(&separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> DeploymentDetails {
        DeploymentDetails::new("acme")
            .with_app("web")
            .with_branch("feature/Login_Page")
            .with_build("42")
    }

    #[test]
    fn artefact_key_uses_full_build_path() {
        let key = details().object_key(ObjectCategory::Artefacts, "app-v1.zip", KeyStyle::ObjectStore);
        assert_eq!(key, "artefacts/acme/web/feature-login-page/42/app-v1.zip");
    }

    #[test]
    fn files_key_stops_at_app() {
        let key = details().object_key(ObjectCategory::Files, "vars.yaml", KeyStyle::ObjectStore);
        assert_eq!(key, "files/acme/web/vars.yaml");
    }

    #[test]
    fn missing_segments_are_skipped() {
        let key = DeploymentDetails::new("acme").object_key(
            ObjectCategory::Packages,
            "pkg.zip",
            KeyStyle::ObjectStore,
        );
        assert_eq!(key, "packages/acme/pkg.zip");
    }

    #[test]
    fn filesystem_style_uses_host_separator() {
        let key = details().object_key(ObjectCategory::Artefacts, "a.zip", KeyStyle::Filesystem);
        let sep = std::path::MAIN_SEPARATOR.to_string();
        assert_eq!(key, ["artefacts", "acme", "web", "feature-login-page", "42", "a.zip"].join(&sep));
    }

    #[test]
    fn explicit_short_name_wins_and_long_branches_are_truncated() {
        let mut d = details();
        d.branch_short_name = Some("login".to_string());
        assert_eq!(d.short_branch_name().as_deref(), Some("login"));

        let d = DeploymentDetails::new("acme").with_branch("release/2024-very-long-branch-name");
        let short = d.short_branch_name().unwrap();
        assert_eq!(short.len(), 20);
        assert_eq!(short, "release-2024-very-lo");
    }

    #[test]
    fn details_use_pascal_case_on_the_wire() {
        let v = serde_json::to_value(details()).unwrap();
        assert_eq!(v["Portfolio"], "acme");
        assert_eq!(v["Branch"], "feature/Login_Page");
        assert!(v.get("Client").is_none());
    }
}
