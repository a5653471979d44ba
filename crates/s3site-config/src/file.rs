//! YAML ファイルを設定元とする実装

use crate::error::{ConfigError, Result};
use crate::routing::RoutingRule;
use crate::source::{ConfigSource, SiteConfig};
use crate::template::expand_env;
use std::fs;
use std::path::{Path, PathBuf};

/// 必須キーと、エラーメッセージで使う人間向けの名前
const REQUIRED_KEYS: [(&str, &str); 3] = [
    ("s3_id", "access key id"),
    ("s3_secret", "secret key"),
    ("s3_bucket", "bucket name"),
];

const DISTRIBUTION_ID_KEY: &str = "cloudfront_distribution_id";

/// `s3_website.yml` 形式のファイルから読み込む設定元
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
    config: SiteConfig,
}

impl FileConfigSource {
    /// ファイルを読み込み、環境変数を展開して検証する
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let raw = fs::read_to_string(&path)?;
        let config = parse_config(&expand_env(&raw), &path)?;
        tracing::debug!("Loaded config for bucket {} from {}", config.bucket, path.display());
        Ok(Self { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }
}

fn parse_config(content: &str, path: &Path) -> Result<SiteConfig> {
    let document: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    validate_config(&document, path)?;

    serde_yaml::from_value(document).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// 必須キーが欠けていれば、欠けているもの全てを列挙したエラーを返す
fn validate_config(document: &serde_yaml::Value, path: &Path) -> Result<()> {
    let missing: Vec<String> = REQUIRED_KEYS
        .iter()
        .filter(|(key, _)| document.get(key).is_none_or(|v| v.is_null()))
        .map(|(key, name)| format!("{} ({})", key, name))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::MissingKeys {
            path: path.to_path_buf(),
            missing,
        })
    }
}

/// ファイル中の `cloudfront_distribution_id` 行を書き換える（無ければ末尾に追加）
///
/// YAML を再シリアライズせず行単位で編集するので、コメントや `{{ env.X }}` は残る。
fn write_distribution_id(path: &Path, id: &str) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let setting = format!("{}: {}", DISTRIBUTION_ID_KEY, id);

    let mut replaced = false;
    let mut lines: Vec<String> = Vec::new();
    for line in content.lines() {
        if line.starts_with(&format!("{}:", DISTRIBUTION_ID_KEY)) {
            lines.push(setting.clone());
            replaced = true;
        } else {
            lines.push(line.to_string());
        }
    }
    if !replaced {
        lines.push(setting);
    }

    let mut output = lines.join("\n");
    output.push('\n');
    fs::write(path, output)?;
    Ok(())
}

impl ConfigSource for FileConfigSource {
    fn access_key_id(&self) -> &str {
        self.config.access_key_id()
    }

    fn secret_access_key(&self) -> &str {
        self.config.secret_access_key()
    }

    fn bucket_name(&self) -> &str {
        self.config.bucket_name()
    }

    fn endpoint(&self) -> Option<&str> {
        self.config.endpoint()
    }

    fn index_document(&self) -> &str {
        self.config.index_document()
    }

    fn error_document(&self) -> &str {
        self.config.error_document()
    }

    fn routing_rules(&self) -> &[RoutingRule] {
        self.config.routing_rules()
    }

    fn redirect_domains(&self) -> &[String] {
        self.config.redirect_domains()
    }

    fn distribution_id(&self) -> Option<&str> {
        self.config.distribution_id()
    }

    /// 書き込みに失敗しても、この実行中はメモリ上の ID が使われる
    fn set_distribution_id(&mut self, id: &str) -> Result<()> {
        self.config.set_distribution_id(id)?;
        write_distribution_id(&self.path, id)
    }

    fn distribution_config(&self) -> Option<&serde_json::Value> {
        self.config.distribution_config()
    }

    fn dns_enabled(&self) -> bool {
        self.config.dns_enabled()
    }

    fn description(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("s3_website.yml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
s3_id: AKIA123
s3_secret: secret
s3_bucket: blog.example.com
s3_endpoint: eu-central-1
index_document: default.html
error_document: missing.html
dns_enabled: true
redirect_domains:
  - www.example.com
routing_rules:
  - condition:
      key_prefix_equals: blog/some_path
    redirect:
      host_name: blog.example.com
      replace_key_prefix_with: some_new_path/
      http_redirect_code: 301
cloudfront_distribution_config:
  default_cache_behavior:
    min_ttl: 900
"#,
        );

        let source = FileConfigSource::load(&path).unwrap();
        assert_eq!(source.bucket_name(), "blog.example.com");
        assert_eq!(source.endpoint(), Some("eu-central-1"));
        assert_eq!(source.index_document(), "default.html");
        assert_eq!(source.error_document(), "missing.html");
        assert!(source.dns_enabled());
        assert_eq!(source.redirect_domains(), ["www.example.com".to_string()]);
        assert_eq!(source.routing_rules().len(), 1);
        assert_eq!(
            source.routing_rules()[0].redirect.http_redirect_code.as_deref(),
            Some("301")
        );
        assert_eq!(
            source.distribution_config().unwrap()["default_cache_behavior"]["min_ttl"],
            serde_json::json!(900)
        );
        assert_eq!(source.description(), path.display().to_string());
    }

    #[test]
    fn test_missing_keys_are_all_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "s3_id: AKIA123\n");

        let err = FileConfigSource::load(&path).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("bucket name"), "{}", message);
        assert!(message.contains("secret key"), "{}", message);
        assert!(!message.contains("access key id"), "{}", message);

        match err {
            ConfigError::MissingKeys { missing, .. } => assert_eq!(missing.len(), 2),
            other => panic!("Expected MissingKeys, got {:?}", other),
        }
    }

    #[test]
    fn test_null_routing_rules_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "s3_id: a\ns3_secret: b\ns3_bucket: c\nrouting_rules:\nredirect_domains: []\n",
        );

        let source = FileConfigSource::load(&path).unwrap();
        assert!(source.routing_rules().is_empty());
        assert!(source.redirect_domains().is_empty());
    }

    #[test]
    fn test_invalid_yaml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "s3_id: [unclosed\n");

        let err = FileConfigSource::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_distribution_id_is_appended_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "# my site\ns3_id: \"{{ env.S3SITE_TEST_UNSET_ID }}\"\ns3_secret: b\ns3_bucket: c\n",
        );

        let mut source = FileConfigSource::load(&path).unwrap();
        source.set_distribution_id("E2EXAMPLE").unwrap();

        assert_eq!(source.distribution_id(), Some("E2EXAMPLE"));
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("# my site\n"));
        assert!(written.contains("{{ env.S3SITE_TEST_UNSET_ID }}"));
        assert!(written.ends_with("cloudfront_distribution_id: E2EXAMPLE\n"));

        let reloaded = FileConfigSource::load(&path).unwrap();
        assert_eq!(reloaded.distribution_id(), Some("E2EXAMPLE"));
    }

    #[test]
    fn test_distribution_id_line_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "s3_id: a\ns3_secret: b\ns3_bucket: c\ncloudfront_distribution_id: EOLD\n",
        );

        let mut source = FileConfigSource::load(&path).unwrap();
        source.set_distribution_id("ENEW").unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("cloudfront_distribution_id: ENEW"));
        assert!(!written.contains("EOLD"));
    }

    #[test]
    fn test_distribution_id_kept_in_memory_when_write_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "s3_id: a\ns3_secret: b\ns3_bucket: c\n");

        let mut source = FileConfigSource::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let err = source.set_distribution_id("E2EXAMPLE").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert_eq!(source.distribution_id(), Some("E2EXAMPLE"));
    }
}
