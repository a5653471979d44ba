//! CloudFront `DistributionConfig` <-> snake_case mapping
//!
//! The reconcilers work on a nested `serde_json::Value` whose keys are the
//! snake_case member names of the CloudFront API (`default_cache_behavior`,
//! `min_ttl`, ...). Scalars are read leniently: `"true"`, `"86400"` and `86400`
//! are all accepted where the API wants a bool or a number.
//!
//! Members not covered here (viewer certificate, restrictions, custom error
//! responses, lambda associations, ...) are carried over from the live
//! distribution on update, so an update never resets them.

use crate::error::{Built, build_error, owned, slice, truthy};
use aws_sdk_cloudfront::types::{
    Aliases, AllowedMethods, CacheBehavior, CacheBehaviors, CachedMethods, CookieNames,
    CookiePreference, CustomOriginConfig, DefaultCacheBehavior, DistributionConfig,
    ForwardedValues, FunctionAssociations, Headers, ItemSelection, LambdaFunctionAssociations,
    LoggingConfig, Method, Origin, OriginProtocolPolicy, OriginSslProtocols, Origins, PriceClass,
    S3OriginConfig, SslProtocol, TrustedKeyGroups, TrustedSigners, ViewerProtocolPolicy,
};
use s3site_cloud::{CloudError, Result};
use serde_json::{Map, Value};

/// Position in the mapping, for error messages
#[derive(Clone, Copy)]
struct At<'a> {
    value: &'a Value,
    path: &'a str,
}

impl<'a> At<'a> {
    fn root(value: &'a Value) -> Self {
        Self { value, path: "" }
    }

    fn field_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.value.get(key).filter(|v| !v.is_null())
    }

    fn invalid(&self, key: &str, expected: &str) -> CloudError {
        CloudError::InvalidConfiguration(format!(
            "cloudfront_distribution_config: `{}` must be {}",
            self.field_path(key),
            expected
        ))
    }

    fn missing(&self, key: &str) -> CloudError {
        CloudError::InvalidConfiguration(format!(
            "cloudfront_distribution_config: `{}` is required",
            self.field_path(key)
        ))
    }

    fn string(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(_) => Err(self.invalid(key, "a string")),
        }
    }

    fn required_string(&self, key: &str) -> Result<String> {
        self.string(key)?.ok_or_else(|| self.missing(key))
    }

    fn flag(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(Some(true)),
            Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(Some(false)),
            Some(_) => Err(self.invalid(key, "true or false")),
        }
    }

    fn required_flag(&self, key: &str) -> Result<bool> {
        self.flag(key)?.ok_or_else(|| self.missing(key))
    }

    fn long(&self, key: &str) -> Result<Option<i64>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| self.invalid(key, "an integer")),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| self.invalid(key, "an integer")),
            Some(_) => Err(self.invalid(key, "an integer")),
        }
    }

    fn int(&self, key: &str) -> Result<Option<i32>> {
        match self.long(key)? {
            None => Ok(None),
            Some(n) => i32::try_from(n)
                .map(Some)
                .map_err(|_| self.invalid(key, "a 32-bit integer")),
        }
    }

    fn required_int(&self, key: &str) -> Result<i32> {
        self.int(key)?.ok_or_else(|| self.missing(key))
    }

    fn child(&self, key: &str, path: &'a mut String) -> Result<Option<At<'a>>> {
        match self.get(key) {
            None => Ok(None),
            Some(value @ Value::Object(_)) => {
                *path = self.field_path(key);
                Ok(Some(At { value, path }))
            }
            Some(_) => Err(self.invalid(key, "a mapping")),
        }
    }

    fn items(&self) -> Result<&'a [Value]> {
        match self.get("items") {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(self.invalid("items", "a list")),
        }
    }

    fn strings(&self) -> Result<Vec<String>> {
        self.items()?
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                _ => Err(self.invalid("items", "a list of strings")),
            })
            .collect()
    }

    /// `quantity` if given, otherwise the number of `items`
    fn quantity(&self) -> Result<i32> {
        match self.int("quantity")? {
            Some(q) => Ok(q),
            None => Ok(self.items()?.len() as i32),
        }
    }
}

/// Build a `DistributionConfig` from a mapping; `live` supplies the members the mapping does not cover
pub fn distribution_config_from_value(
    value: &Value,
    live: Option<&DistributionConfig>,
) -> Result<DistributionConfig> {
    if !value.is_object() {
        return Err(CloudError::InvalidConfiguration(
            "cloudfront_distribution_config must be a mapping".to_string(),
        ));
    }
    let root = At::root(value);

    let mut path = String::new();
    let origins = root
        .child("origins", &mut path)?
        .ok_or_else(|| root.missing("origins"))?;
    let live_origins: Vec<Origin> = match live.and_then(|l| Option::<&Origins>::from(l.origins())) {
        Some(origins) => {
            let items: &[Origin] = slice(origins.items());
            items.to_vec()
        }
        None => Vec::new(),
    };
    let origins = origins_from(origins, &live_origins)?;

    let mut path = String::new();
    let default_cache_behavior = root
        .child("default_cache_behavior", &mut path)?
        .ok_or_else(|| root.missing("default_cache_behavior"))?;
    let live_default = live.and_then(|l| Option::<&DefaultCacheBehavior>::from(l.default_cache_behavior()));
    let default_cache_behavior = default_cache_behavior_from(default_cache_behavior, live_default)?;

    let mut path = String::new();
    let aliases = match root.child("aliases", &mut path)? {
        Some(aliases) => Some(
            Aliases::builder()
                .quantity(aliases.quantity()?)
                .set_items(non_empty(aliases.strings()?))
                .build()
                .map_err(build_error)?,
        ),
        None => None,
    };

    let mut path = String::new();
    let live_behaviors: Vec<CacheBehavior> =
        match live.and_then(|l| l.cache_behaviors()) {
            Some(behaviors) => {
                let items: &[CacheBehavior] = slice(behaviors.items());
                items.to_vec()
            }
            None => Vec::new(),
        };
    let cache_behaviors = match root.child("cache_behaviors", &mut path)? {
        Some(behaviors) => Some(cache_behaviors_from(behaviors, &live_behaviors)?),
        None => None,
    };

    let mut path = String::new();
    let logging = match root.child("logging", &mut path)? {
        Some(logging) => Some(
            LoggingConfig::builder()
                .enabled(logging.flag("enabled")?.unwrap_or(false))
                .include_cookies(logging.flag("include_cookies")?.unwrap_or(false))
                .bucket(logging.string("bucket")?.unwrap_or_default())
                .prefix(logging.string("prefix")?.unwrap_or_default())
                .build()
                .built()?,
        ),
        None => None,
    };

    DistributionConfig::builder()
        .caller_reference(root.required_string("caller_reference")?)
        .set_aliases(aliases)
        .set_default_root_object(root.string("default_root_object")?)
        .origins(origins)
        .default_cache_behavior(default_cache_behavior)
        .set_cache_behaviors(cache_behaviors)
        .comment(root.string("comment")?.unwrap_or_default())
        .set_logging(logging)
        .set_price_class(
            root.string("price_class")?
                .map(|p| PriceClass::from(p.as_str())),
        )
        .enabled(root.required_flag("enabled")?)
        .set_custom_error_responses(live.and_then(|l| l.custom_error_responses().cloned()))
        .set_restrictions(live.and_then(|l| l.restrictions().cloned()))
        .set_viewer_certificate(live.and_then(|l| l.viewer_certificate().cloned()))
        .set_web_acl_id(live.and_then(|l| l.web_acl_id().map(str::to_string)))
        .set_http_version(live.and_then(|l| l.http_version().cloned()))
        .set_is_ipv6_enabled(live.and_then(|l| l.is_ipv6_enabled()))
        .set_origin_groups(live.and_then(|l| l.origin_groups().cloned()))
        .build()
        .map_err(build_error)
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}

fn origins_from(at: At<'_>, live: &[Origin]) -> Result<Origins> {
    let mut items = Vec::new();
    for (index, item) in at.items()?.iter().enumerate() {
        let path = format!("{}.items[{}]", at.path, index);
        let origin = At { value: item, path: &path };
        items.push(origin_from(origin, live)?);
    }

    Origins::builder()
        .quantity(at.int("quantity")?.unwrap_or(items.len() as i32))
        .set_items(Some(items))
        .build()
        .map_err(build_error)
}

fn origin_from(at: At<'_>, live: &[Origin]) -> Result<Origin> {
    let id = at.required_string("id")?;
    let previous = live.iter().find(|o| owned(o.id()) == id);

    let mut path = String::new();
    let custom_origin_config = match at.child("custom_origin_config", &mut path)? {
        Some(custom) => {
            let mut path = String::new();
            let ssl_protocols = match custom.child("origin_ssl_protocols", &mut path)? {
                Some(protocols) => Some(
                    OriginSslProtocols::builder()
                        .quantity(protocols.quantity()?)
                        .set_items(Some(
                            protocols
                                .strings()?
                                .iter()
                                .map(|p| SslProtocol::from(p.as_str()))
                                .collect(),
                        ))
                        .build()
                        .map_err(build_error)?,
                ),
                None => None,
            };
            Some(
                CustomOriginConfig::builder()
                    .http_port(custom.required_int("http_port")?)
                    .https_port(custom.required_int("https_port")?)
                    .origin_protocol_policy(OriginProtocolPolicy::from(
                        custom.required_string("origin_protocol_policy")?.as_str(),
                    ))
                    .set_origin_ssl_protocols(ssl_protocols)
                    .set_origin_read_timeout(custom.int("origin_read_timeout")?)
                    .set_origin_keepalive_timeout(custom.int("origin_keepalive_timeout")?)
                    .build()
                    .map_err(build_error)?,
            )
        }
        None => None,
    };

    let mut path = String::new();
    let s3_origin_config = match at.child("s3_origin_config", &mut path)? {
        Some(s3) => Some(
            S3OriginConfig::builder()
                .origin_access_identity(s3.string("origin_access_identity")?.unwrap_or_default())
                .build(),
        ),
        None => None,
    };

    Origin::builder()
        .id(id)
        .domain_name(at.required_string("domain_name")?)
        .set_origin_path(at.string("origin_path")?)
        .set_custom_origin_config(custom_origin_config)
        .set_s3_origin_config(s3_origin_config)
        .set_connection_attempts(at.int("connection_attempts")?)
        .set_connection_timeout(at.int("connection_timeout")?)
        .set_origin_access_control_id(at.string("origin_access_control_id")?)
        .set_custom_headers(previous.and_then(|o| o.custom_headers().cloned()))
        .set_origin_shield(previous.and_then(|o| o.origin_shield().cloned()))
        .build()
        .map_err(build_error)
}

fn trusted_signers_from(at: At<'_>) -> Result<TrustedSigners> {
    TrustedSigners::builder()
        .enabled(at.flag("enabled")?.unwrap_or(false))
        .quantity(at.quantity()?)
        .set_items(non_empty(at.strings()?))
        .build()
        .map_err(build_error)
}

fn forwarded_values_from(at: At<'_>) -> Result<ForwardedValues> {
    let mut path = String::new();
    let cookies = match at.child("cookies", &mut path)? {
        Some(cookies) => {
            let mut path = String::new();
            let names = match cookies.child("whitelisted_names", &mut path)? {
                Some(names) => Some(
                    CookieNames::builder()
                        .quantity(names.quantity()?)
                        .set_items(non_empty(names.strings()?))
                        .build()
                        .map_err(build_error)?,
                ),
                None => None,
            };
            CookiePreference::builder()
                .forward(ItemSelection::from(
                    cookies.required_string("forward")?.as_str(),
                ))
                .set_whitelisted_names(names)
                .build()
                .map_err(build_error)?
        }
        None => CookiePreference::builder()
            .forward(ItemSelection::None)
            .build()
            .map_err(build_error)?,
    };

    let mut path = String::new();
    let headers = match at.child("headers", &mut path)? {
        Some(headers) => Some(
            Headers::builder()
                .quantity(headers.quantity()?)
                .set_items(non_empty(headers.strings()?))
                .build()
                .map_err(build_error)?,
        ),
        None => None,
    };

    ForwardedValues::builder()
        .query_string(at.flag("query_string")?.unwrap_or(false))
        .cookies(cookies)
        .set_headers(headers)
        .build()
        .map_err(build_error)
}

fn allowed_methods_from(at: At<'_>) -> Result<AllowedMethods> {
    let methods = |names: Vec<String>| -> Vec<Method> {
        names.iter().map(|m| Method::from(m.as_str())).collect()
    };

    let mut path = String::new();
    let cached = match at.child("cached_methods", &mut path)? {
        Some(cached) => Some(
            CachedMethods::builder()
                .quantity(cached.quantity()?)
                .set_items(Some(methods(cached.strings()?)))
                .build()
                .map_err(build_error)?,
        ),
        None => None,
    };

    AllowedMethods::builder()
        .quantity(at.quantity()?)
        .set_items(Some(methods(at.strings()?)))
        .set_cached_methods(cached)
        .build()
        .map_err(build_error)
}

/// Behavior members kept from the live distribution when the mapping omits them
#[derive(Default)]
struct LiveBehavior {
    smooth_streaming: Option<bool>,
    cache_policy_id: Option<String>,
    origin_request_policy_id: Option<String>,
    response_headers_policy_id: Option<String>,
    trusted_key_groups: Option<TrustedKeyGroups>,
    lambda_function_associations: Option<LambdaFunctionAssociations>,
    function_associations: Option<FunctionAssociations>,
    field_level_encryption_id: Option<String>,
    realtime_log_config_arn: Option<String>,
}

impl LiveBehavior {
    fn of_default(live: &DefaultCacheBehavior) -> Self {
        Self {
            smooth_streaming: live.smooth_streaming(),
            cache_policy_id: live.cache_policy_id().map(str::to_string),
            origin_request_policy_id: live.origin_request_policy_id().map(str::to_string),
            response_headers_policy_id: live.response_headers_policy_id().map(str::to_string),
            trusted_key_groups: live.trusted_key_groups().cloned(),
            lambda_function_associations: live.lambda_function_associations().cloned(),
            function_associations: live.function_associations().cloned(),
            field_level_encryption_id: live.field_level_encryption_id().map(str::to_string),
            realtime_log_config_arn: live.realtime_log_config_arn().map(str::to_string),
        }
    }

    fn of_path(live: &CacheBehavior) -> Self {
        Self {
            smooth_streaming: live.smooth_streaming(),
            cache_policy_id: live.cache_policy_id().map(str::to_string),
            origin_request_policy_id: live.origin_request_policy_id().map(str::to_string),
            response_headers_policy_id: live.response_headers_policy_id().map(str::to_string),
            trusted_key_groups: live.trusted_key_groups().cloned(),
            lambda_function_associations: live.lambda_function_associations().cloned(),
            function_associations: live.function_associations().cloned(),
            field_level_encryption_id: live.field_level_encryption_id().map(str::to_string),
            realtime_log_config_arn: live.realtime_log_config_arn().map(str::to_string),
        }
    }
}

/// Members shared by the default and the path-specific cache behaviors
struct BehaviorFields {
    target_origin_id: String,
    viewer_protocol_policy: ViewerProtocolPolicy,
    trusted_signers: Option<TrustedSigners>,
    forwarded_values: Option<ForwardedValues>,
    allowed_methods: Option<AllowedMethods>,
    min_ttl: Option<i64>,
    default_ttl: Option<i64>,
    max_ttl: Option<i64>,
    compress: Option<bool>,
    smooth_streaming: Option<bool>,
    cache_policy_id: Option<String>,
    origin_request_policy_id: Option<String>,
    response_headers_policy_id: Option<String>,
}

fn behavior_fields(at: At<'_>, live: &LiveBehavior) -> Result<BehaviorFields> {
    let mut path = String::new();
    let trusted_signers = match at.child("trusted_signers", &mut path)? {
        Some(signers) => Some(trusted_signers_from(signers)?),
        None => None,
    };
    let mut path = String::new();
    let forwarded_values = match at.child("forwarded_values", &mut path)? {
        Some(values) => Some(forwarded_values_from(values)?),
        None => None,
    };
    let mut path = String::new();
    let allowed_methods = match at.child("allowed_methods", &mut path)? {
        Some(methods) => Some(allowed_methods_from(methods)?),
        None => None,
    };

    Ok(BehaviorFields {
        target_origin_id: at.required_string("target_origin_id")?,
        viewer_protocol_policy: ViewerProtocolPolicy::from(
            at.string("viewer_protocol_policy")?
                .unwrap_or_else(|| "allow-all".to_string())
                .as_str(),
        ),
        trusted_signers,
        forwarded_values,
        allowed_methods,
        min_ttl: at.long("min_ttl")?,
        default_ttl: at.long("default_ttl")?,
        max_ttl: at.long("max_ttl")?,
        compress: at.flag("compress")?,
        smooth_streaming: at.flag("smooth_streaming")?.or(live.smooth_streaming),
        cache_policy_id: at
            .string("cache_policy_id")?
            .or_else(|| live.cache_policy_id.clone()),
        origin_request_policy_id: at
            .string("origin_request_policy_id")?
            .or_else(|| live.origin_request_policy_id.clone()),
        response_headers_policy_id: at
            .string("response_headers_policy_id")?
            .or_else(|| live.response_headers_policy_id.clone()),
    })
}

fn default_cache_behavior_from(
    at: At<'_>,
    live: Option<&DefaultCacheBehavior>,
) -> Result<DefaultCacheBehavior> {
    let live = live.map(LiveBehavior::of_default).unwrap_or_default();
    let fields = behavior_fields(at, &live)?;
    DefaultCacheBehavior::builder()
        .target_origin_id(fields.target_origin_id)
        .viewer_protocol_policy(fields.viewer_protocol_policy)
        .set_trusted_signers(fields.trusted_signers)
        .set_forwarded_values(fields.forwarded_values)
        .set_allowed_methods(fields.allowed_methods)
        .set_min_ttl(fields.min_ttl)
        .set_default_ttl(fields.default_ttl)
        .set_max_ttl(fields.max_ttl)
        .set_compress(fields.compress)
        .set_smooth_streaming(fields.smooth_streaming)
        .set_cache_policy_id(fields.cache_policy_id)
        .set_origin_request_policy_id(fields.origin_request_policy_id)
        .set_response_headers_policy_id(fields.response_headers_policy_id)
        .set_trusted_key_groups(live.trusted_key_groups)
        .set_lambda_function_associations(live.lambda_function_associations)
        .set_function_associations(live.function_associations)
        .set_field_level_encryption_id(live.field_level_encryption_id)
        .set_realtime_log_config_arn(live.realtime_log_config_arn)
        .build()
        .map_err(build_error)
}

/// Path-specific behaviors; live members are matched by `path_pattern`
fn cache_behaviors_from(at: At<'_>, live: &[CacheBehavior]) -> Result<CacheBehaviors> {
    let mut items = Vec::new();
    for (index, item) in at.items()?.iter().enumerate() {
        let path = format!("{}.items[{}]", at.path, index);
        let behavior = At { value: item, path: &path };
        let path_pattern = behavior.required_string("path_pattern")?;
        let previous = live
            .iter()
            .find(|b| owned(b.path_pattern()) == path_pattern)
            .map(LiveBehavior::of_path)
            .unwrap_or_default();
        let fields = behavior_fields(behavior, &previous)?;
        items.push(
            CacheBehavior::builder()
                .path_pattern(path_pattern)
                .target_origin_id(fields.target_origin_id)
                .viewer_protocol_policy(fields.viewer_protocol_policy)
                .set_trusted_signers(fields.trusted_signers)
                .set_forwarded_values(fields.forwarded_values)
                .set_allowed_methods(fields.allowed_methods)
                .set_min_ttl(fields.min_ttl)
                .set_default_ttl(fields.default_ttl)
                .set_max_ttl(fields.max_ttl)
                .set_compress(fields.compress)
                .set_smooth_streaming(fields.smooth_streaming)
                .set_cache_policy_id(fields.cache_policy_id)
                .set_origin_request_policy_id(fields.origin_request_policy_id)
                .set_response_headers_policy_id(fields.response_headers_policy_id)
                .set_trusted_key_groups(previous.trusted_key_groups)
                .set_lambda_function_associations(previous.lambda_function_associations)
                .set_function_associations(previous.function_associations)
                .set_field_level_encryption_id(previous.field_level_encryption_id)
                .set_realtime_log_config_arn(previous.realtime_log_config_arn)
                .build()
                .map_err(build_error)?,
        );
    }

    CacheBehaviors::builder()
        .quantity(at.int("quantity")?.unwrap_or(items.len() as i32))
        .set_items(non_empty(items))
        .build()
        .map_err(build_error)
}

// SDK -> mapping

fn insert(map: &mut Map<String, Value>, key: &str, value: impl Into<Value>) {
    map.insert(key.to_string(), value.into());
}

fn insert_opt<T: Into<Value>>(map: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        insert(map, key, value);
    }
}

fn counted(quantity: impl Into<Option<i32>>, items: Vec<Value>) -> Value {
    let mut map = Map::new();
    insert(&mut map, "quantity", quantity.into().unwrap_or(items.len() as i32));
    if !items.is_empty() {
        insert(&mut map, "items", items);
    }
    Value::Object(map)
}

fn strings_value(items: &[String]) -> Vec<Value> {
    items.iter().map(|s| Value::from(s.as_str())).collect()
}

/// Snake_case mapping of a live `DistributionConfig`
pub fn value_from_distribution_config(config: &DistributionConfig) -> Value {
    let mut map = Map::new();
    insert(&mut map, "caller_reference", owned(config.caller_reference()));
    insert_opt(&mut map, "default_root_object", config.default_root_object());
    insert(&mut map, "comment", owned(config.comment()));
    insert(&mut map, "enabled", truthy(config.enabled()));
    insert_opt(
        &mut map,
        "price_class",
        config.price_class().map(|p| p.as_str().to_string()),
    );

    if let Some(aliases) = config.aliases() {
        let items: &[String] = slice(aliases.items());
        insert(&mut map, "aliases", counted(aliases.quantity(), strings_value(items)));
    }

    if let Some(origins) = Option::<&Origins>::from(config.origins()) {
        let items: &[Origin] = slice(origins.items());
        let items = items.iter().map(origin_value).collect();
        insert(&mut map, "origins", counted(origins.quantity(), items));
    }

    if let Some(behavior) = Option::<&DefaultCacheBehavior>::from(config.default_cache_behavior()) {
        let mut fields = Map::new();
        insert(&mut fields, "target_origin_id", owned(behavior.target_origin_id()));
        insert_opt(
            &mut fields,
            "viewer_protocol_policy",
            Option::<&ViewerProtocolPolicy>::from(behavior.viewer_protocol_policy())
                .map(|p| p.as_str().to_string()),
        );
        behavior_value(
            &mut fields,
            behavior.trusted_signers(),
            behavior.forwarded_values(),
            behavior.allowed_methods(),
            [behavior.min_ttl(), behavior.default_ttl(), behavior.max_ttl()],
            [behavior.compress(), behavior.smooth_streaming()],
            [
                behavior.cache_policy_id(),
                behavior.origin_request_policy_id(),
                behavior.response_headers_policy_id(),
            ],
        );
        insert(&mut map, "default_cache_behavior", fields);
    }

    if let Some(behaviors) = config.cache_behaviors() {
        let items: &[CacheBehavior] = slice(behaviors.items());
        let items = items
            .iter()
            .map(|behavior| {
                let mut fields = Map::new();
                insert(&mut fields, "path_pattern", owned(behavior.path_pattern()));
                insert(&mut fields, "target_origin_id", owned(behavior.target_origin_id()));
                insert_opt(
                    &mut fields,
                    "viewer_protocol_policy",
                    Option::<&ViewerProtocolPolicy>::from(behavior.viewer_protocol_policy())
                        .map(|p| p.as_str().to_string()),
                );
                behavior_value(
                    &mut fields,
                    behavior.trusted_signers(),
                    behavior.forwarded_values(),
                    behavior.allowed_methods(),
                    [behavior.min_ttl(), behavior.default_ttl(), behavior.max_ttl()],
                    [behavior.compress(), behavior.smooth_streaming()],
                    [
                        behavior.cache_policy_id(),
                        behavior.origin_request_policy_id(),
                        behavior.response_headers_policy_id(),
                    ],
                );
                Value::Object(fields)
            })
            .collect();
        insert(&mut map, "cache_behaviors", counted(behaviors.quantity(), items));
    }

    if let Some(logging) = config.logging() {
        let mut fields = Map::new();
        insert(&mut fields, "enabled", truthy(logging.enabled()));
        insert(&mut fields, "include_cookies", truthy(logging.include_cookies()));
        insert(&mut fields, "bucket", owned(logging.bucket()));
        insert(&mut fields, "prefix", owned(logging.prefix()));
        insert(&mut map, "logging", fields);
    }

    Value::Object(map)
}

fn origin_value(origin: &Origin) -> Value {
    let mut fields = Map::new();
    insert(&mut fields, "id", owned(origin.id()));
    insert(&mut fields, "domain_name", owned(origin.domain_name()));
    insert_opt(&mut fields, "origin_path", origin.origin_path());
    insert_opt(&mut fields, "connection_attempts", origin.connection_attempts());
    insert_opt(&mut fields, "connection_timeout", origin.connection_timeout());
    insert_opt(&mut fields, "origin_access_control_id", origin.origin_access_control_id());

    if let Some(custom) = origin.custom_origin_config() {
        let mut config = Map::new();
        insert(&mut config, "http_port", Option::<i32>::from(custom.http_port()));
        insert(&mut config, "https_port", Option::<i32>::from(custom.https_port()));
        insert_opt(
            &mut config,
            "origin_protocol_policy",
            Option::<&OriginProtocolPolicy>::from(custom.origin_protocol_policy())
                .map(|p| p.as_str().to_string()),
        );
        insert_opt(&mut config, "origin_read_timeout", custom.origin_read_timeout());
        insert_opt(&mut config, "origin_keepalive_timeout", custom.origin_keepalive_timeout());
        if let Some(protocols) = custom.origin_ssl_protocols() {
            let items: &[SslProtocol] = slice(protocols.items());
            let items = items.iter().map(|p| Value::from(p.as_str())).collect();
            insert(&mut config, "origin_ssl_protocols", counted(protocols.quantity(), items));
        }
        insert(&mut fields, "custom_origin_config", config);
    }

    if let Some(s3) = origin.s3_origin_config() {
        let mut config = Map::new();
        insert(&mut config, "origin_access_identity", owned(s3.origin_access_identity()));
        insert(&mut fields, "s3_origin_config", config);
    }

    Value::Object(fields)
}

fn behavior_value(
    fields: &mut Map<String, Value>,
    trusted_signers: Option<&TrustedSigners>,
    forwarded_values: Option<&ForwardedValues>,
    allowed_methods: Option<&AllowedMethods>,
    [min_ttl, default_ttl, max_ttl]: [Option<i64>; 3],
    [compress, smooth_streaming]: [Option<bool>; 2],
    [cache_policy_id, origin_request_policy_id, response_headers_policy_id]: [Option<&str>; 3],
) {
    if let Some(signers) = trusted_signers {
        let items: &[String] = slice(signers.items());
        let mut value = counted(signers.quantity(), strings_value(items));
        if let Value::Object(map) = &mut value {
            insert(map, "enabled", truthy(signers.enabled()));
        }
        insert(fields, "trusted_signers", value);
    }

    if let Some(forwarded) = forwarded_values {
        let mut values = Map::new();
        insert(&mut values, "query_string", truthy(forwarded.query_string()));
        if let Some(cookies) = forwarded.cookies() {
            let mut cookie_map = Map::new();
            insert_opt(
                &mut cookie_map,
                "forward",
                Option::<&ItemSelection>::from(cookies.forward()).map(|f| f.as_str().to_string()),
            );
            if let Some(names) = cookies.whitelisted_names() {
                let items: &[String] = slice(names.items());
                insert(
                    &mut cookie_map,
                    "whitelisted_names",
                    counted(names.quantity(), strings_value(items)),
                );
            }
            insert(&mut values, "cookies", cookie_map);
        }
        if let Some(headers) = forwarded.headers() {
            let items: &[String] = slice(headers.items());
            insert(&mut values, "headers", counted(headers.quantity(), strings_value(items)));
        }
        insert(fields, "forwarded_values", values);
    }

    if let Some(methods) = allowed_methods {
        let items: &[Method] = slice(methods.items());
        let mut value = counted(
            methods.quantity(),
            items.iter().map(|m| Value::from(m.as_str())).collect(),
        );
        if let (Value::Object(map), Some(cached)) = (&mut value, methods.cached_methods()) {
            let items: &[Method] = slice(cached.items());
            insert(
                map,
                "cached_methods",
                counted(
                    cached.quantity(),
                    items.iter().map(|m| Value::from(m.as_str())).collect(),
                ),
            );
        }
        insert(fields, "allowed_methods", value);
    }

    insert_opt(fields, "min_ttl", min_ttl);
    insert_opt(fields, "default_ttl", default_ttl);
    insert_opt(fields, "max_ttl", max_ttl);
    insert_opt(fields, "compress", compress);
    insert_opt(fields, "smooth_streaming", smooth_streaming);
    insert_opt(fields, "cache_policy_id", cache_policy_id);
    insert_opt(fields, "origin_request_policy_id", origin_request_policy_id);
    insert_opt(fields, "response_headers_policy_id", response_headers_policy_id);
}
