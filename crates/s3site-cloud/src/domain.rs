//! DNS reconciliation
//!
//! Points the main bucket's domain (and every redirect domain) at the website
//! through Route 53 alias records. Hosted zones are keyed by base domain (the
//! last two labels). A zone that does not exist is created only with the
//! user's consent and is polled until the change is in sync.

use crate::action::DomainOutcome;
use crate::api::{AliasTarget, CdnApi, ChangeStatus, DnsApi, DnsRecord, HostedZone, RetryConfig};
use crate::error::{CloudError, Result};
use crate::prompt::Interaction;
use crate::region::Region;
use s3site_config::ConfigSource;
use std::collections::HashMap;
use std::sync::Arc;

/// Hosted zone id for alias records pointing at any CloudFront distribution
pub const CDN_HOSTED_ZONE_ID: &str = "Z2FDTNDATAQYW2";

pub struct DomainReconciler {
    dns: Arc<dyn DnsApi>,
    cdn: Arc<dyn CdnApi>,
    retry: RetryConfig,
}

impl DomainReconciler {
    pub fn new(dns: Arc<dyn DnsApi>, cdn: Arc<dyn CdnApi>) -> Self {
        Self {
            dns,
            cdn,
            retry: RetryConfig::default(),
        }
    }

    /// Zone polling bounds
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub async fn reconcile(
        &self,
        config: &dyn ConfigSource,
        interaction: &mut dyn Interaction,
    ) -> Result<DomainOutcome> {
        let mut outcome = DomainOutcome::default();
        let region = Region::lookup(config.endpoint())?;
        let bucket = config.bucket_name();
        let website_target = AliasTarget {
            hosted_zone_id: region.website_hosted_zone_id.to_string(),
            dns_name: region.website_hostname.clone(),
            evaluate_target_health: false,
        };

        // Zones already resolved this run, by base domain. `None` = declined
        let mut zones: HashMap<String, Option<HostedZone>> = HashMap::new();

        let main_base = base_domain(bucket);
        let main_zone = self.ensure_zone(&main_base, interaction, &mut outcome).await?;
        zones.insert(main_base.clone(), main_zone.clone());

        if let Some(zone) = &main_zone {
            let target = match config.distribution_id() {
                Some(id) => {
                    let distribution = self.cdn.get_distribution(id).await?;
                    AliasTarget {
                        hosted_zone_id: CDN_HOSTED_ZONE_ID.to_string(),
                        dns_name: distribution.domain_name,
                        evaluate_target_health: false,
                    }
                }
                None => website_target.clone(),
            };
            self.upsert_record(zone, bucket, &target, interaction, &mut outcome)
                .await?;
        }

        for redirect in config.redirect_domains() {
            let base = base_domain(redirect);
            let zone = match zones.get(&base) {
                Some(zone) => zone.clone(),
                None => {
                    let zone = self.ensure_zone(&base, interaction, &mut outcome).await?;
                    zones.insert(base.clone(), zone.clone());
                    zone
                }
            };

            match zone {
                Some(zone) => {
                    self.upsert_record(&zone, redirect, &website_target, interaction, &mut outcome)
                        .await?
                }
                None => tracing::debug!("No hosted zone for {}, skipping {}", base, redirect),
            }
        }

        Ok(outcome)
    }

    /// Find the zone for `domain`, or create it if the user agrees
    async fn ensure_zone(
        &self,
        domain: &str,
        interaction: &mut dyn Interaction,
        outcome: &mut DomainOutcome,
    ) -> Result<Option<HostedZone>> {
        let zones = self.dns.list_zones().await?;
        if let Some(zone) = zones.into_iter().find(|z| same_name(&z.name, domain)) {
            tracing::debug!("Found hosted zone {} for {}", zone.id, domain);
            return Ok(Some(zone));
        }

        let question = format!(
            "A hosted zone for {} does not exist, create one now? [y/N]",
            domain
        );
        if !interaction.confirm(&question) {
            tracing::warn!("User declined creating a hosted zone for {}", domain);
            interaction.say(&format!(
                "Please create a hosted zone for {} at https://console.aws.amazon.com/route53/home before trying to configure Route 53",
                domain
            ));
            outcome.zones_declined.push(domain.to_string());
            return Ok(None);
        }

        let change = self.dns.create_zone(domain).await?;
        self.wait_in_sync(domain, &change.change_id, change.status)
            .await?;
        tracing::info!(zone = %change.zone.id, domain = %domain, "hosted zone created");
        interaction.say(&format!("Created hosted zone for {}", domain));
        outcome.zones_created.push(domain.to_string());
        Ok(Some(change.zone))
    }

    async fn wait_in_sync(&self, domain: &str, change_id: &str, initial: ChangeStatus) -> Result<()> {
        if initial == ChangeStatus::InSync {
            return Ok(());
        }

        for attempt in 0..self.retry.max_attempts {
            tokio::time::sleep(self.retry.delay_for(attempt)).await;
            let status = self.dns.change_status(change_id).await?;
            tracing::debug!(
                "Hosted zone {} change {} is {:?} (check {}/{})",
                domain,
                change_id,
                status,
                attempt + 1,
                self.retry.max_attempts
            );
            if status == ChangeStatus::InSync {
                return Ok(());
            }
        }

        Err(CloudError::Timeout(format!(
            "Hosted zone for {} was not in sync after {} status checks",
            domain, self.retry.max_attempts
        )))
    }

    /// Create the alias record for `name`, replacing an existing one if the user agrees
    async fn upsert_record(
        &self,
        zone: &HostedZone,
        name: &str,
        target: &AliasTarget,
        interaction: &mut dyn Interaction,
        outcome: &mut DomainOutcome,
    ) -> Result<()> {
        let records = self.dns.list_records(&zone.id).await?;
        let existing: Vec<DnsRecord> = records
            .into_iter()
            .filter(|r| same_name(&r.name, name) && matches!(r.record_type.as_str(), "A" | "CNAME"))
            .collect();

        match existing.as_slice() {
            [] => {}
            // Deleting only the identifier would leave weight, region or failover behind
            [record] if record.set_identifier.is_some() => {
                return Err(CloudError::InvalidConfiguration(format!(
                    "The record for {} uses a routing policy (set identifier {}). Remove it in the Route 53 console (https://console.aws.amazon.com/route53/home) and run again",
                    name,
                    record.set_identifier.as_deref().unwrap_or_default()
                )));
            }
            [record] => {
                let question = format!(
                    "A record already exists for {}. Re-create it and point it to your website? [y/N]",
                    name
                );
                if !interaction.confirm(&question) {
                    tracing::warn!("Keeping the existing record for {}", name);
                    interaction.say(&format!("Keeping the existing record for {}", name));
                    outcome.records_kept.push(name.to_string());
                    return Ok(());
                }
                self.dns.delete_record(&zone.id, record).await?;
                tracing::info!(record = %name, "existing record deleted");
            }
            many => {
                return Err(CloudError::InvalidConfiguration(format!(
                    "Found {} records for {}. Remove them in the Route 53 console (https://console.aws.amazon.com/route53/home) and run again",
                    many.len(),
                    name
                )));
            }
        }

        let record = DnsRecord::alias(fqdn(name), target.clone());
        self.dns.create_record(&zone.id, &record).await?;
        tracing::info!(record = %name, target = %target.dns_name, "alias record created");
        interaction.say(&format!(
            "Route 53 record created for {} pointing to {}",
            name, target.dns_name
        ));
        outcome.records_created.push(name.to_string());
        Ok(())
    }
}

/// Last two labels of `name` with a trailing dot (`blog.example.com` -> `example.com.`)
pub fn base_domain(name: &str) -> String {
    let labels: Vec<&str> = name.trim_end_matches('.').split('.').collect();
    let start = labels.len().saturating_sub(2);
    format!("{}.", labels[start..].join("."))
}

fn fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim_end_matches('.')
        .eq_ignore_ascii_case(b.trim_end_matches('.'))
}
