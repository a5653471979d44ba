pub mod error;
pub mod file;
pub mod routing;
pub mod source;
pub mod template;

pub use error::*;
pub use file::FileConfigSource;
pub use routing::{RoutingCondition, RoutingRedirect, RoutingRule};
pub use source::{ConfigSource, DEFAULT_ERROR_DOCUMENT, DEFAULT_INDEX_DOCUMENT, SiteConfig};

use std::path::PathBuf;

/// 設定ファイルのパスを直接指定する環境変数
pub const CONFIG_PATH_ENV: &str = "S3SITE_CONFIG_PATH";

const CANDIDATES: [&str; 2] = ["s3_website.yml", "s3_website.yaml"];

/// 設定ファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 S3SITE_CONFIG_PATH (直接パス指定)
/// 2. カレントディレクトリ: s3_website.yml, s3_website.yaml
pub fn find_config_file() -> Result<PathBuf> {
    // 1. 環境変数で直接指定
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!(
            "{} points to {}, which does not exist",
            CONFIG_PATH_ENV,
            path.display()
        );
    }

    // 2. カレントディレクトリで検索
    let current_dir = std::env::current_dir()?;
    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}
