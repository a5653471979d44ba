//! Bucket provisioning
//!
//! Turns the main bucket into a publicly readable website and points every
//! redirect bucket at it. A bucket that does not exist yet is created once and
//! the step that failed is retried; a bucket still missing after that is fatal.

use crate::action::BucketOutcome;
use crate::api::{StorageApi, WebsiteConfig};
use crate::error::{ResourceKind, Result};
use crate::prompt::Interaction;
use crate::region::Region;
use s3site_config::ConfigSource;
use std::sync::Arc;

pub struct BucketProvisioner {
    storage: Arc<dyn StorageApi>,
}

impl BucketProvisioner {
    pub fn new(storage: Arc<dyn StorageApi>) -> Self {
        Self { storage }
    }

    pub async fn configure(
        &self,
        config: &dyn ConfigSource,
        interaction: &mut dyn Interaction,
    ) -> Result<BucketOutcome> {
        let region = Region::lookup(config.endpoint())?;
        let bucket = config.bucket_name();
        let mut outcome = BucketOutcome {
            bucket: bucket.to_string(),
            created: Vec::new(),
            routing_rules: config.routing_rules().len(),
            redirect_buckets: Vec::new(),
        };

        let website = WebsiteConfig::Hosting {
            index_document: config.index_document().to_string(),
            error_document: config.error_document().to_string(),
            routing_rules: config.routing_rules().to_vec(),
        };

        let mut created = false;
        loop {
            match self.make_website(bucket, &website, interaction).await {
                Ok(()) => break,
                Err(e) if e.is_missing(ResourceKind::Bucket) && !created => {
                    tracing::debug!("Bucket {} does not exist: {}", bucket, e);
                    self.create_bucket(bucket, &region, interaction).await?;
                    outcome.created.push(bucket.to_string());
                    created = true;
                }
                Err(e) => return Err(e),
            }
        }

        for redirect in config.redirect_domains() {
            let website = WebsiteConfig::RedirectAll {
                host_name: bucket.to_string(),
            };

            let mut created = false;
            loop {
                match self.storage.put_website(redirect, &website).await {
                    Ok(()) => break,
                    Err(e) if e.is_missing(ResourceKind::Bucket) && !created => {
                        self.create_bucket(redirect, &region, interaction).await?;
                        outcome.created.push(redirect.clone());
                        created = true;
                    }
                    Err(e) => return Err(e),
                }
            }
            tracing::info!(bucket = %redirect, target = %bucket, "redirect bucket configured");
            interaction.say(&format!("Bucket {} now redirects to {}", redirect, bucket));
            outcome.redirect_buckets.push(redirect.clone());
        }

        Ok(outcome)
    }

    async fn make_website(
        &self,
        bucket: &str,
        website: &WebsiteConfig,
        interaction: &mut dyn Interaction,
    ) -> Result<()> {
        self.storage.put_website(bucket, website).await?;
        tracing::info!(bucket = %bucket, "website configuration applied");
        interaction.say(&format!("Bucket {} now functions as a website", bucket));

        if let WebsiteConfig::Hosting { routing_rules, .. } = website {
            if routing_rules.is_empty() {
                interaction.say(&format!("No redirects configured for {} bucket", bucket));
            } else {
                interaction.say(&format!(
                    "{} redirects configured for {} bucket",
                    routing_rules.len(),
                    bucket
                ));
            }
        }

        self.storage
            .put_bucket_policy(bucket, &public_read_policy(bucket))
            .await?;
        tracing::info!(bucket = %bucket, "public read policy applied");
        interaction.say(&format!("Bucket {} is now readable to the whole world", bucket));
        Ok(())
    }

    async fn create_bucket(
        &self,
        bucket: &str,
        region: &Region,
        interaction: &mut dyn Interaction,
    ) -> Result<()> {
        let location_constraint = (!region.is_default()).then_some(region.id);
        self.storage.create_bucket(bucket, location_constraint).await?;
        tracing::info!(bucket = %bucket, region = %region.id, "bucket created");
        interaction.say(&format!("Created bucket {}", bucket));
        Ok(())
    }
}

/// Policy granting anonymous read access to every object in the bucket
pub fn public_read_policy(bucket: &str) -> String {
    serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Sid": "PublicReadForGetBucketObjects",
            "Effect": "Allow",
            "Principal": "*",
            "Action": ["s3:GetObject"],
            "Resource": [format!("arn:aws:s3:::{}/*", bucket)]
        }]
    })
    .to_string()
}
