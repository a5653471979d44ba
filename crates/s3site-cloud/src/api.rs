//! Cloud API client traits
//!
//! The reconcilers talk to storage, CDN and DNS through these traits. The AWS
//! implementation lives in `s3site-cloud-aws`; tests use in-memory fakes.

use crate::error::Result;
use async_trait::async_trait;
use s3site_config::RoutingRule;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Website configuration submitted for a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebsiteConfig {
    /// Serve the bucket contents as a website
    Hosting {
        index_document: String,
        error_document: String,
        routing_rules: Vec<RoutingRule>,
    },
    /// Redirect every request to another host
    RedirectAll { host_name: String },
}

/// Object storage operations
#[async_trait]
pub trait StorageApi: Send + Sync {
    /// SetWebsiteConfig
    async fn put_website(&self, bucket: &str, website: &WebsiteConfig) -> Result<()>;

    /// SetBucketPolicy
    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> Result<()>;

    /// CreateBucket. `None` means the provider's default region
    async fn create_bucket(&self, bucket: &str, location_constraint: Option<&str>) -> Result<()>;
}

/// A CDN distribution as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub id: String,

    /// Domain name assigned by the CDN (e.g. `d111111abcdef8.cloudfront.net`)
    pub domain_name: String,

    /// Optimistic concurrency token for updates
    pub etag: Option<String>,

    /// Distribution config as a nested snake_case mapping
    pub config: serde_json::Value,
}

impl Distribution {
    /// Domain name of the first origin, if any
    pub fn origin_domain_name(&self) -> Option<&str> {
        self.config
            .pointer("/origins/items/0/domain_name")
            .and_then(|v| v.as_str())
    }
}

/// CDN operations
#[async_trait]
pub trait CdnApi: Send + Sync {
    async fn get_distribution(&self, id: &str) -> Result<Distribution>;

    async fn create_distribution(&self, config: &serde_json::Value) -> Result<Distribution>;

    /// UpdateDistribution guarded by the `if_match` ETag
    async fn update_distribution(
        &self,
        id: &str,
        if_match: &str,
        config: &serde_json::Value,
    ) -> Result<Distribution>;
}

/// DNS hosted zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZone {
    pub id: String,

    /// Fully qualified zone name with trailing dot (e.g. `example.com.`)
    pub name: String,
}

/// Result of creating a hosted zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneChange {
    pub zone: HostedZone,
    pub change_id: String,
    pub status: ChangeStatus,
}

/// Propagation status of a DNS change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    Pending,
    InSync,
}

/// Alias target of a DNS record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTarget {
    pub hosted_zone_id: String,
    pub dns_name: String,
    pub evaluate_target_health: bool,
}

/// DNS record set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Fully qualified name with trailing dot
    pub name: String,

    /// Record type (`A`, `CNAME`, ...)
    pub record_type: String,

    pub ttl: Option<i64>,

    /// Plain record values; empty for alias records
    pub values: Vec<String>,

    pub alias_target: Option<AliasTarget>,

    pub set_identifier: Option<String>,
}

impl DnsRecord {
    /// An `A` alias record
    pub fn alias(name: impl Into<String>, target: AliasTarget) -> Self {
        Self {
            name: name.into(),
            record_type: "A".to_string(),
            ttl: None,
            values: Vec::new(),
            alias_target: Some(target),
            set_identifier: None,
        }
    }
}

/// DNS operations
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// ListZones
    async fn list_zones(&self) -> Result<Vec<HostedZone>>;

    /// CreateZone. The zone is usable once its change reaches [`ChangeStatus::InSync`]
    async fn create_zone(&self, domain: &str) -> Result<ZoneChange>;

    /// GetZoneStatus
    async fn change_status(&self, change_id: &str) -> Result<ChangeStatus>;

    /// ListRecords
    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>>;

    /// CreateRecord
    async fn create_record(&self, zone_id: &str, record: &DnsRecord) -> Result<()>;

    /// DeleteRecord. `record` must match the existing record set exactly
    async fn delete_record(&self, zone_id: &str, record: &DnsRecord) -> Result<()>;
}

/// Retry configuration for polling operations
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_attempts: u32,

    /// Initial delay between retries
    pub initial_delay: Duration,

    /// Maximum delay between retries
    pub max_delay: Duration,

    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// Delay before the given attempt (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt as i32);
        self.initial_delay.mul_f64(factor).min(self.max_delay)
    }

    /// No waiting at all; for tests
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_and_caps() {
        let retry = RetryConfig::default();
        assert_eq!(retry.delay_for(0), Duration::from_secs(1));
        assert_eq!(retry.delay_for(1), Duration::from_millis(1500));
        assert!(retry.delay_for(3) > retry.delay_for(2));
        assert_eq!(retry.delay_for(19), Duration::from_secs(10));
    }

    #[test]
    fn test_origin_domain_name() {
        let distribution = Distribution {
            id: "E1".to_string(),
            domain_name: "d1.cloudfront.net".to_string(),
            etag: None,
            config: serde_json::json!({
                "origins": { "quantity": 1, "items": [{ "domain_name": "a.s3-website-us-east-1.amazonaws.com" }] }
            }),
        };
        assert_eq!(
            distribution.origin_domain_name(),
            Some("a.s3-website-us-east-1.amazonaws.com")
        );
    }
}
