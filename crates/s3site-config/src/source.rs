//! 設定ソース
//!
//! リコンサイラはこのトレイト越しに設定を読む。ファイル以外の設定元を追加する場合は
//! 新しい実装を足すだけでよい。

use crate::error::Result;
use crate::routing::RoutingRule;
use serde::{Deserialize, Serialize};

pub const DEFAULT_INDEX_DOCUMENT: &str = "index.html";
pub const DEFAULT_ERROR_DOCUMENT: &str = "error.html";

/// ウェブサイト 1 つ分の宣言的な設定を提供するトレイト
pub trait ConfigSource {
    fn access_key_id(&self) -> &str;

    fn secret_access_key(&self) -> &str;

    /// 主バケット名（リソースの主キー）
    fn bucket_name(&self) -> &str;

    /// リージョン識別子。未設定なら既定リージョン
    fn endpoint(&self) -> Option<&str>;

    fn index_document(&self) -> &str;

    fn error_document(&self) -> &str;

    fn routing_rules(&self) -> &[RoutingRule];

    /// 主バケットへ転送する追加のバケット名
    fn redirect_domains(&self) -> &[String];

    fn distribution_id(&self) -> Option<&str>;

    /// 新しく作成したディストリビューション ID を記録する
    fn set_distribution_id(&mut self, id: &str) -> Result<()>;

    /// 既定値に深くマージされるユーザー指定のディストリビューション設定
    fn distribution_config(&self) -> Option<&serde_json::Value>;

    fn dns_enabled(&self) -> bool;

    /// メッセージ表示用の設定元の説明（ファイルパスなど）
    fn description(&self) -> String;
}

/// 設定ファイルの内容
///
/// キー名は `s3_website.yml` の書式に合わせている。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(rename = "s3_id")]
    pub access_key_id: String,

    #[serde(rename = "s3_secret")]
    pub secret_access_key: String,

    #[serde(rename = "s3_bucket")]
    pub bucket: String,

    #[serde(rename = "s3_endpoint", default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub index_document: Option<String>,

    #[serde(default)]
    pub error_document: Option<String>,

    #[serde(default)]
    pub routing_rules: Option<Vec<RoutingRule>>,

    #[serde(default)]
    pub redirect_domains: Option<Vec<String>>,

    #[serde(rename = "cloudfront_distribution_id", default)]
    pub distribution_id: Option<String>,

    #[serde(rename = "cloudfront_distribution_config", default)]
    pub distribution_config: Option<serde_json::Value>,

    #[serde(default)]
    pub dns_enabled: bool,
}

impl SiteConfig {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            bucket: bucket.into(),
            ..Self::default()
        }
    }
}

impl ConfigSource for SiteConfig {
    fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    fn bucket_name(&self) -> &str {
        &self.bucket
    }

    fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref().filter(|e| !e.is_empty())
    }

    fn index_document(&self) -> &str {
        self.index_document
            .as_deref()
            .unwrap_or(DEFAULT_INDEX_DOCUMENT)
    }

    fn error_document(&self) -> &str {
        self.error_document
            .as_deref()
            .unwrap_or(DEFAULT_ERROR_DOCUMENT)
    }

    fn routing_rules(&self) -> &[RoutingRule] {
        self.routing_rules.as_deref().unwrap_or_default()
    }

    fn redirect_domains(&self) -> &[String] {
        self.redirect_domains.as_deref().unwrap_or_default()
    }

    fn distribution_id(&self) -> Option<&str> {
        self.distribution_id.as_deref().filter(|id| !id.is_empty())
    }

    fn set_distribution_id(&mut self, id: &str) -> Result<()> {
        self.distribution_id = Some(id.to_string());
        Ok(())
    }

    fn distribution_config(&self) -> Option<&serde_json::Value> {
        self.distribution_config.as_ref().filter(|c| !c.is_null())
    }

    fn dns_enabled(&self) -> bool {
        self.dns_enabled
    }

    fn description(&self) -> String {
        format!("in-memory configuration for {}", self.bucket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SiteConfig::new("id", "secret", "example.com");
        assert_eq!(config.index_document(), "index.html");
        assert_eq!(config.error_document(), "error.html");
        assert!(config.routing_rules().is_empty());
        assert!(config.redirect_domains().is_empty());
        assert!(config.endpoint().is_none());
        assert!(config.distribution_id().is_none());
        assert!(!config.dns_enabled());
    }

    #[test]
    fn test_empty_endpoint_means_default_region() {
        let mut config = SiteConfig::new("id", "secret", "example.com");
        config.endpoint = Some(String::new());
        assert!(config.endpoint().is_none());

        config.endpoint = Some("eu-central-1".to_string());
        assert_eq!(config.endpoint(), Some("eu-central-1"));
    }

    #[test]
    fn test_set_distribution_id() {
        let mut config = SiteConfig::new("id", "secret", "example.com");
        config.set_distribution_id("E123").unwrap();
        assert_eq!(config.distribution_id(), Some("E123"));
    }
}
