//! 環境変数の展開
//!
//! 設定ファイル中の `{{ env.NAME }}` を環境変数の値で置き換える。
//! 秘密情報をファイルに直接書かずに済むようにするためのもの。

use regex::{Captures, Regex};
use std::sync::LazyLock;

static ENV_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*env\.(\w+)\s*\}\}").expect("valid env pattern"));

/// `{{ env.NAME }}` を展開する。未定義の変数はそのまま残す
pub fn expand_env(content: &str) -> String {
    expand_with(content, |name| std::env::var(name).ok())
}

fn expand_with<F>(content: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_PATTERN
        .replace_all(content, |caps: &Captures| {
            let name = &caps[1];
            match lookup(name) {
                Some(value) => value,
                None => {
                    tracing::warn!("Environment variable {} is not set", name);
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "S3_ID" => Some("AKIA123".to_string()),
            "S3_SECRET" => Some("shh".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_expand_known_variables() {
        let content = "s3_id: {{ env.S3_ID }}\ns3_secret: {{env.S3_SECRET}}\n";
        assert_eq!(
            expand_with(content, lookup),
            "s3_id: AKIA123\ns3_secret: shh\n"
        );
    }

    #[test]
    fn test_unknown_variable_is_left_alone() {
        let content = "s3_bucket: {{ env.MISSING }}";
        assert_eq!(expand_with(content, lookup), content);
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(expand_with("s3_bucket: example.com", lookup), "s3_bucket: example.com");
    }
}
