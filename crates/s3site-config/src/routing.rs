//! ルーティングルール
//!
//! S3 ウェブサイトのリダイレクト条件と転送先。YAML では数値で書かれることの多い
//! HTTP コードは、API が数値を受け付けないため常に文字列として保持する。

use serde::{Deserialize, Deserializer, Serialize};

/// 条件とリダイレクトの組
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRule {
    #[serde(default)]
    pub condition: Option<RoutingCondition>,
    pub redirect: RoutingRedirect,
}

/// リダイレクトを発動させる条件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingCondition {
    #[serde(default)]
    pub key_prefix_equals: Option<String>,
    #[serde(default, deserialize_with = "code_as_string")]
    pub http_error_code_returned_equals: Option<String>,
}

/// リダイレクト先
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRedirect {
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub replace_key_prefix_with: Option<String>,
    #[serde(default)]
    pub replace_key_with: Option<String>,
    #[serde(default, deserialize_with = "code_as_string")]
    pub http_redirect_code: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Code {
    Number(u64),
    Text(String),
}

/// `301` と `"301"` のどちらも `Some("301")` として読み込む
fn code_as_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let code = Option::<Code>::deserialize(deserializer)?;
    Ok(code.map(|c| match c {
        Code::Number(n) => n.to_string(),
        Code::Text(s) => s,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_redirect_code_becomes_string() {
        let yaml = r#"
condition:
  key_prefix_equals: blog/some_path
redirect:
  host_name: blog.example.com
  replace_key_prefix_with: some_new_path/
  http_redirect_code: 301
"#;
        let rule: RoutingRule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rule.redirect.http_redirect_code.as_deref(), Some("301"));
        assert_eq!(
            rule.condition.unwrap().key_prefix_equals.as_deref(),
            Some("blog/some_path")
        );
    }

    #[test]
    fn test_string_codes_are_kept() {
        let yaml = r#"
condition:
  http_error_code_returned_equals: "404"
redirect:
  replace_key_with: index.html
  http_redirect_code: "302"
"#;
        let rule: RoutingRule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            rule.condition.unwrap().http_error_code_returned_equals.as_deref(),
            Some("404")
        );
        assert_eq!(rule.redirect.http_redirect_code.as_deref(), Some("302"));
    }

    #[test]
    fn test_condition_is_optional() {
        let rule: RoutingRule = serde_yaml::from_str("redirect:\n  protocol: https\n").unwrap();
        assert!(rule.condition.is_none());
        assert_eq!(rule.redirect.protocol.as_deref(), Some("https"));
        assert!(rule.redirect.http_redirect_code.is_none());
    }
}
