//! In-memory API fakes recording every call

use crate::api::{
    CdnApi, ChangeStatus, Distribution, DnsApi, DnsRecord, HostedZone, StorageApi, WebsiteConfig,
    ZoneChange,
};
use crate::error::{CloudError, Result};
use crate::prompt::Interaction;
use async_trait::async_trait;
use s3site_config::{ConfigError, ConfigSource, RoutingRule, SiteConfig};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum StorageCall {
    PutWebsite {
        bucket: String,
        website: WebsiteConfig,
    },
    PutPolicy {
        bucket: String,
        policy: String,
    },
    CreateBucket {
        bucket: String,
        location_constraint: Option<String>,
    },
}

#[derive(Default)]
pub struct FakeStorage {
    pub buckets: Mutex<HashSet<String>>,
    pub calls: Mutex<Vec<StorageCall>>,
    /// CreateBucket succeeds but the bucket never shows up
    pub create_is_ineffective: bool,
    /// Every PutBucketWebsite fails with this code
    pub website_error_code: Option<String>,
    /// PutBucketWebsite succeeds on buckets that do not exist yet
    pub website_skips_existence_check: bool,
}

impl FakeStorage {
    pub fn with_buckets(buckets: &[&str]) -> Self {
        Self {
            buckets: Mutex::new(buckets.iter().map(|b| b.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<StorageCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> Vec<StorageCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, StorageCall::CreateBucket { .. }))
            .collect()
    }

    fn check_exists(&self, bucket: &str) -> Result<()> {
        if self.buckets.lock().unwrap().contains(bucket) {
            Ok(())
        } else {
            Err(CloudError::from_remote(
                "NoSuchBucket",
                "The specified bucket does not exist",
            ))
        }
    }
}

#[async_trait]
impl StorageApi for FakeStorage {
    async fn put_website(&self, bucket: &str, website: &WebsiteConfig) -> Result<()> {
        if let Some(code) = &self.website_error_code {
            return Err(CloudError::from_remote(code, "injected failure"));
        }
        if !self.website_skips_existence_check {
            self.check_exists(bucket)?;
        }
        self.calls.lock().unwrap().push(StorageCall::PutWebsite {
            bucket: bucket.to_string(),
            website: website.clone(),
        });
        Ok(())
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> Result<()> {
        self.check_exists(bucket)?;
        self.calls.lock().unwrap().push(StorageCall::PutPolicy {
            bucket: bucket.to_string(),
            policy: policy.to_string(),
        });
        Ok(())
    }

    async fn create_bucket(&self, bucket: &str, location_constraint: Option<&str>) -> Result<()> {
        self.calls.lock().unwrap().push(StorageCall::CreateBucket {
            bucket: bucket.to_string(),
            location_constraint: location_constraint.map(str::to_string),
        });
        if !self.create_is_ineffective {
            self.buckets.lock().unwrap().insert(bucket.to_string());
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeCdn {
    pub distributions: Mutex<HashMap<String, Distribution>>,
    pub created: Mutex<Vec<serde_json::Value>>,
    pub updated: Mutex<Vec<(String, String, serde_json::Value)>>,
    /// Every update fails as if another writer changed the distribution first
    pub reject_updates: bool,
}

impl FakeCdn {
    pub fn with_distribution(distribution: Distribution) -> Self {
        let cdn = Self::default();
        cdn.distributions
            .lock()
            .unwrap()
            .insert(distribution.id.clone(), distribution);
        cdn
    }

    pub fn created(&self) -> Vec<serde_json::Value> {
        self.created.lock().unwrap().clone()
    }

    /// (id, if_match, config) of every update
    pub fn updated(&self) -> Vec<(String, String, serde_json::Value)> {
        self.updated.lock().unwrap().clone()
    }
}

#[async_trait]
impl CdnApi for FakeCdn {
    async fn get_distribution(&self, id: &str) -> Result<Distribution> {
        self.distributions
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| {
                CloudError::from_remote("NoSuchDistribution", "The specified distribution does not exist")
            })
    }

    async fn create_distribution(&self, config: &serde_json::Value) -> Result<Distribution> {
        self.created.lock().unwrap().push(config.clone());
        let mut distributions = self.distributions.lock().unwrap();
        let n = distributions.len() + 1;
        let distribution = Distribution {
            id: format!("EFAKE{}", n),
            domain_name: format!("d{}.cloudfront.net", n),
            etag: Some("ETAG1".to_string()),
            config: config.clone(),
        };
        distributions.insert(distribution.id.clone(), distribution.clone());
        Ok(distribution)
    }

    async fn update_distribution(
        &self,
        id: &str,
        if_match: &str,
        config: &serde_json::Value,
    ) -> Result<Distribution> {
        let mut distributions = self.distributions.lock().unwrap();
        let current = distributions.get_mut(id).ok_or_else(|| {
            CloudError::from_remote("NoSuchDistribution", "The specified distribution does not exist")
        })?;
        if self.reject_updates || current.etag.as_deref() != Some(if_match) {
            return Err(CloudError::from_remote(
                "PreconditionFailed",
                "The If-Match version is missing or not valid",
            ));
        }
        self.updated
            .lock()
            .unwrap()
            .push((id.to_string(), if_match.to_string(), config.clone()));
        current.config = config.clone();
        current.etag = Some(format!("{}-next", if_match));
        Ok(current.clone())
    }
}

#[derive(Default)]
pub struct FakeDns {
    pub zones: Mutex<Vec<HostedZone>>,
    pub records: Mutex<HashMap<String, Vec<DnsRecord>>>,
    pub created_zones: Mutex<Vec<String>>,
    pub created_records: Mutex<Vec<(String, DnsRecord)>>,
    pub deleted_records: Mutex<Vec<(String, DnsRecord)>>,
    pub status_polls: Mutex<u32>,
    /// Number of status polls answered with `Pending` before `InSync`
    pub pending_polls: u32,
}

impl FakeDns {
    pub fn with_zone(name: &str, records: Vec<DnsRecord>) -> Self {
        let dns = Self::default();
        dns.add_zone(name, records);
        dns
    }

    pub fn add_zone(&self, name: &str, records: Vec<DnsRecord>) {
        let mut zones = self.zones.lock().unwrap();
        let id = format!("/hostedzone/Z{}", zones.len() + 1);
        zones.push(HostedZone {
            id: id.clone(),
            name: name.to_string(),
        });
        self.records.lock().unwrap().insert(id, records);
    }

    pub fn created_zones(&self) -> Vec<String> {
        self.created_zones.lock().unwrap().clone()
    }

    pub fn created_records(&self) -> Vec<(String, DnsRecord)> {
        self.created_records.lock().unwrap().clone()
    }

    pub fn deleted_records(&self) -> Vec<(String, DnsRecord)> {
        self.deleted_records.lock().unwrap().clone()
    }

    pub fn status_polls(&self) -> u32 {
        *self.status_polls.lock().unwrap()
    }
}

#[async_trait]
impl DnsApi for FakeDns {
    async fn list_zones(&self) -> Result<Vec<HostedZone>> {
        Ok(self.zones.lock().unwrap().clone())
    }

    async fn create_zone(&self, domain: &str) -> Result<ZoneChange> {
        self.created_zones.lock().unwrap().push(domain.to_string());
        self.add_zone(domain, Vec::new());
        let zone = self
            .zones
            .lock()
            .unwrap()
            .last()
            .cloned()
            .ok_or_else(|| CloudError::from_remote("InternalError", "zone vanished"))?;
        Ok(ZoneChange {
            zone,
            change_id: "/change/C1".to_string(),
            status: ChangeStatus::Pending,
        })
    }

    async fn change_status(&self, _change_id: &str) -> Result<ChangeStatus> {
        let mut polls = self.status_polls.lock().unwrap();
        *polls += 1;
        if *polls > self.pending_polls {
            Ok(ChangeStatus::InSync)
        } else {
            Ok(ChangeStatus::Pending)
        }
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        self.records
            .lock()
            .unwrap()
            .get(zone_id)
            .cloned()
            .ok_or_else(|| CloudError::from_remote("NoSuchHostedZone", "No hosted zone found"))
    }

    async fn create_record(&self, zone_id: &str, record: &DnsRecord) -> Result<()> {
        self.created_records
            .lock()
            .unwrap()
            .push((zone_id.to_string(), record.clone()));
        self.records
            .lock()
            .unwrap()
            .entry(zone_id.to_string())
            .or_default()
            .push(record.clone());
        Ok(())
    }

    async fn delete_record(&self, zone_id: &str, record: &DnsRecord) -> Result<()> {
        self.deleted_records
            .lock()
            .unwrap()
            .push((zone_id.to_string(), record.clone()));
        if let Some(records) = self.records.lock().unwrap().get_mut(zone_id) {
            records.retain(|r| r != record);
        }
        Ok(())
    }
}

/// Scripted answers plus captured output
#[derive(Default)]
pub struct ScriptedInteraction {
    answers: VecDeque<bool>,
    pub lines: Vec<String>,
    pub questions: Vec<String>,
}

impl ScriptedInteraction {
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn said(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl Interaction for ScriptedInteraction {
    fn say(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.questions.push(question.to_string());
        self.answers.pop_front().unwrap_or(false)
    }
}

/// Config whose file cannot be written; reads come from the wrapped config
pub struct ReadOnlyConfig(pub SiteConfig);

impl ConfigSource for ReadOnlyConfig {
    fn access_key_id(&self) -> &str {
        self.0.access_key_id()
    }

    fn secret_access_key(&self) -> &str {
        self.0.secret_access_key()
    }

    fn bucket_name(&self) -> &str {
        self.0.bucket_name()
    }

    fn endpoint(&self) -> Option<&str> {
        self.0.endpoint()
    }

    fn index_document(&self) -> &str {
        self.0.index_document()
    }

    fn error_document(&self) -> &str {
        self.0.error_document()
    }

    fn routing_rules(&self) -> &[RoutingRule] {
        self.0.routing_rules()
    }

    fn redirect_domains(&self) -> &[String] {
        self.0.redirect_domains()
    }

    fn distribution_id(&self) -> Option<&str> {
        self.0.distribution_id()
    }

    fn set_distribution_id(&mut self, _id: &str) -> s3site_config::Result<()> {
        Err(ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only file system",
        )))
    }

    fn distribution_config(&self) -> Option<&serde_json::Value> {
        self.0.distribution_config()
    }

    fn dns_enabled(&self) -> bool {
        self.0.dns_enabled()
    }

    fn description(&self) -> String {
        self.0.description()
    }
}

pub fn a_record(name: &str, value: &str) -> DnsRecord {
    DnsRecord {
        name: name.to_string(),
        record_type: "A".to_string(),
        ttl: Some(300),
        values: vec![value.to_string()],
        alias_target: None,
        set_identifier: None,
    }
}
