//! CDN distribution reconciliation
//!
//! With a distribution id in the configuration, the user's override is merged
//! onto the live distribution config and submitted under the live ETag.
//! Without one, a new distribution is built from computed defaults merged with
//! the override, either automatically (headless + autocreate) or after the
//! user agrees.

use crate::action::DistributionOutcome;
use crate::api::{CdnApi, Distribution};
use crate::error::{CloudError, Result};
use crate::merge::{deep_merge, sync_quantities};
use crate::prompt::Interaction;
use crate::region::Region;
use s3site_config::ConfigSource;
use serde_json::{Value, json};
use std::sync::Arc;

pub const CREATED_COMMENT: &str = "Created by s3site";
pub const UPDATED_COMMENT: &str = "Updated by s3site";

const CREATE_QUESTION: &str =
    "Do you want to deliver your website via CloudFront, Amazon's CDN service? [y/N]";

/// Run-wide switches
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Never prompt; every question is answered by the flags below
    pub headless: bool,

    /// Create a distribution in headless mode when none is configured
    pub autocreate_distribution: bool,

    /// Print raw API responses
    pub verbose: bool,
}

pub struct DistributionReconciler {
    cdn: Arc<dyn CdnApi>,
}

impl DistributionReconciler {
    pub fn new(cdn: Arc<dyn CdnApi>) -> Self {
        Self { cdn }
    }

    pub async fn reconcile(
        &self,
        config: &mut dyn ConfigSource,
        interaction: &mut dyn Interaction,
        options: &RunOptions,
    ) -> Result<DistributionOutcome> {
        let overrides = custom_settings(config)?;

        if let Some(id) = config.distribution_id() {
            let id = id.to_string();
            interaction.say(&format!(
                "Detected an existing CloudFront distribution (id {}) ...",
                id
            ));
            return match overrides {
                Some(overrides) => self.update(&id, &overrides, interaction).await,
                None => {
                    tracing::debug!("No custom distribution settings, leaving {} as is", id);
                    Ok(DistributionOutcome::Unchanged { id })
                }
            };
        }

        if options.headless {
            if !options.autocreate_distribution {
                tracing::info!("Headless run without autocreate, not creating a distribution");
                return Ok(DistributionOutcome::Skipped);
            }
            interaction.say("Creating a CloudFront distribution for your S3 website ...");
        } else if !interaction.confirm(CREATE_QUESTION) {
            tracing::warn!("User declined creating a CloudFront distribution");
            return Ok(DistributionOutcome::Declined);
        }

        self.create(config, overrides.as_ref(), interaction, options)
            .await
    }

    async fn update(
        &self,
        id: &str,
        overrides: &Value,
        interaction: &mut dyn Interaction,
    ) -> Result<DistributionOutcome> {
        let live = self.cdn.get_distribution(id).await?;
        let etag = live.etag.clone().ok_or_else(|| CloudError::RemoteApi {
            code: "MissingETag".to_string(),
            message: format!("GetDistribution for {} returned no ETag", id),
        })?;

        let caller_reference = live
            .config
            .get("caller_reference")
            .cloned()
            .unwrap_or(Value::Null);

        let mut merged = deep_merge(&live.config, overrides);
        if let Value::Object(map) = &mut merged {
            map.insert("caller_reference".to_string(), caller_reference);
            map.insert("comment".to_string(), Value::from(UPDATED_COMMENT));
        }
        sync_quantities(&mut merged);

        tracing::debug!("Updating distribution {} with If-Match {}", id, etag);
        self.cdn.update_distribution(id, &etag, &merged).await?;
        tracing::info!(distribution = %id, "distribution updated");

        report_custom_settings(overrides, interaction);
        Ok(DistributionOutcome::Updated { id: id.to_string() })
    }

    async fn create(
        &self,
        config: &mut dyn ConfigSource,
        overrides: Option<&Value>,
        interaction: &mut dyn Interaction,
        options: &RunOptions,
    ) -> Result<DistributionOutcome> {
        let region = Region::lookup(config.endpoint())?;
        let caller_reference = format!("s3site {}", chrono::Utc::now().to_rfc3339());
        let defaults = default_distribution_config(&*config, &region, &caller_reference);

        let mut effective = match overrides {
            Some(overrides) => deep_merge(&defaults, overrides),
            None => defaults,
        };
        sync_quantities(&mut effective);

        let distribution = self.cdn.create_distribution(&effective).await?;
        tracing::info!(distribution = %distribution.id, "distribution created");
        report_new_distribution(&distribution, interaction, options);

        match config.set_distribution_id(&distribution.id) {
            Ok(()) => interaction.say(&format!(
                "  Added setting 'cloudfront_distribution_id: {}' into {}",
                distribution.id,
                config.description()
            )),
            Err(e) => {
                tracing::warn!(distribution = %distribution.id, "failed to save distribution id: {}", e);
                interaction.say(&format!(
                    "  Could not save 'cloudfront_distribution_id: {}' into {} ({}). Add it by hand, or the next run creates another distribution",
                    distribution.id,
                    config.description(),
                    e
                ));
            }
        }

        if let Some(overrides) = overrides {
            report_custom_settings(overrides, interaction);
        }

        Ok(DistributionOutcome::Created {
            id: distribution.id,
            domain_name: distribution.domain_name,
        })
    }
}

/// The user's override, if it holds anything
fn custom_settings(config: &dyn ConfigSource) -> Result<Option<Value>> {
    match config.distribution_config() {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(value @ Value::Object(_)) => Ok(Some(value.clone())),
        Some(other) => Err(CloudError::InvalidConfiguration(format!(
            "cloudfront_distribution_config must be a mapping, got {}",
            other
        ))),
    }
}

fn origin_id(bucket: &str) -> String {
    format!("{}-S3-origin", bucket)
}

/// Distribution config for a new distribution serving the bucket's website endpoint
pub fn default_distribution_config(
    config: &dyn ConfigSource,
    region: &Region,
    caller_reference: &str,
) -> Value {
    let bucket = config.bucket_name();
    json!({
        "caller_reference": caller_reference,
        "default_root_object": config.index_document(),
        "origins": {
            "quantity": 1,
            "items": [{
                "id": origin_id(bucket),
                "domain_name": region.website_endpoint(bucket),
                "custom_origin_config": {
                    "http_port": 80,
                    "https_port": 443,
                    "origin_protocol_policy": "http-only"
                }
            }]
        },
        "logging": {
            "enabled": false,
            "include_cookies": false,
            "bucket": "",
            "prefix": ""
        },
        "enabled": true,
        "comment": CREATED_COMMENT,
        "aliases": { "quantity": 0 },
        "default_cache_behavior": {
            "target_origin_id": origin_id(bucket),
            "trusted_signers": { "enabled": false, "quantity": 0 },
            "forwarded_values": {
                "query_string": true,
                "cookies": { "forward": "all" }
            },
            "viewer_protocol_policy": "allow-all",
            "min_ttl": 86400
        },
        "cache_behaviors": { "quantity": 0 },
        "price_class": "PriceClass_All"
    })
}

fn report_new_distribution(
    distribution: &Distribution,
    interaction: &mut dyn Interaction,
    options: &RunOptions,
) {
    interaction.say(&format!(
        "  The distribution {} at {} now delivers the origin {}",
        distribution.id,
        distribution.domain_name,
        distribution.origin_domain_name().unwrap_or("(unknown)")
    ));
    interaction.say("    Please allow up to 15 minutes for the distribution to initialise");
    interaction.say(
        "    For more information on the distribution, see https://console.aws.amazon.com/cloudfront",
    );
    if options.verbose {
        interaction.say("  Below is the response from the CloudFront API:");
        match serde_json::to_string_pretty(distribution) {
            Ok(body) => interaction.say(&body),
            Err(e) => tracing::warn!("Failed to render distribution: {}", e),
        }
    }
}

fn report_custom_settings(settings: &Value, interaction: &mut dyn Interaction) {
    match serde_yaml::to_string(settings) {
        Ok(yaml) => {
            interaction.say("  Applied custom distribution settings:");
            for line in yaml.lines().filter(|l| *l != "---") {
                interaction.say(&format!("    {}", line));
            }
        }
        Err(e) => tracing::warn!("Failed to render custom distribution settings: {}", e),
    }
}
