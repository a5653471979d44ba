//! Provisioning run
//!
//! Bucket → Distribution → Domain, in that order. A bucket failure ends the
//! run; distribution and domain failures are recorded and the run goes on.

use crate::action::{RunReport, Step};
use crate::api::{CdnApi, DnsApi, RetryConfig, StorageApi};
use crate::bucket::BucketProvisioner;
use crate::distribution::{DistributionReconciler, RunOptions};
use crate::domain::DomainReconciler;
use crate::prompt::{Interaction, Unattended};
use s3site_config::ConfigSource;
use std::sync::Arc;
use std::time::Instant;

/// API clients for one run
#[derive(Clone)]
pub struct Clients {
    pub storage: Arc<dyn StorageApi>,
    pub cdn: Arc<dyn CdnApi>,
    pub dns: Arc<dyn DnsApi>,
}

pub struct Orchestrator {
    bucket: BucketProvisioner,
    distribution: DistributionReconciler,
    domain: DomainReconciler,
}

impl Orchestrator {
    pub fn new(clients: Clients) -> Self {
        Self {
            bucket: BucketProvisioner::new(clients.storage),
            distribution: DistributionReconciler::new(clients.cdn.clone()),
            domain: DomainReconciler::new(clients.dns, clients.cdn),
        }
    }

    pub fn with_zone_retry(mut self, retry: RetryConfig) -> Self {
        self.domain = self.domain.with_retry(retry);
        self
    }

    pub async fn run(
        &self,
        config: &mut dyn ConfigSource,
        interaction: &mut dyn Interaction,
        options: &RunOptions,
    ) -> RunReport {
        let started = Instant::now();
        let mut report = RunReport::new();

        match self.bucket.configure(&*config, interaction).await {
            Ok(outcome) => {
                report.add_success(Step::Bucket, format!("{} is a website", outcome.bucket));
                report.bucket = Some(outcome);
            }
            Err(e) => {
                tracing::error!("Bucket step failed: {}", e);
                report.add_failure(Step::Bucket, e.to_string());
                report.duration_ms = started.elapsed().as_millis() as u64;
                return report;
            }
        }

        match self
            .distribution
            .reconcile(config, interaction, options)
            .await
        {
            Ok(outcome) => {
                report.add_success(Step::Distribution, format!("distribution {}", outcome));
                report.distribution = Some(outcome);
            }
            Err(e) => {
                tracing::error!("Distribution step failed: {}", e);
                report.add_failure(Step::Distribution, e.to_string());
            }
        }

        if config.dns_enabled() {
            let result = if options.headless {
                self.domain
                    .reconcile(&*config, &mut Unattended(interaction))
                    .await
            } else {
                self.domain.reconcile(&*config, interaction).await
            };

            match result {
                Ok(outcome) => {
                    report.add_success(
                        Step::Domain,
                        format!("{} record(s) created", outcome.records_created.len()),
                    );
                    report.domain = Some(outcome);
                }
                Err(e) => {
                    tracing::error!("Domain step failed: {}", e);
                    report.add_failure(Step::Domain, e.to_string());
                }
            }
        } else {
            tracing::debug!("dns_enabled is off, skipping Route 53");
        }

        report.duration_ms = started.elapsed().as_millis() as u64;
        report
    }
}
