//! CloudFront CDN client

use crate::convert::{distribution_config_from_value, value_from_distribution_config};
use crate::error::{from_sdk, owned};
use async_trait::async_trait;
use aws_sdk_cloudfront::Client;
use aws_sdk_cloudfront::types::{self, DistributionConfig};
use s3site_cloud::{CdnApi, CloudError, Distribution, Result};

pub struct CloudFrontCdn {
    client: Client,
}

impl CloudFrontCdn {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn live_config(&self, id: &str) -> Result<DistributionConfig> {
        let output = self
            .client
            .get_distribution_config()
            .id(id)
            .send()
            .await
            .map_err(|e| from_sdk("GetDistributionConfig", e))?;
        output
            .distribution_config()
            .cloned()
            .ok_or_else(|| empty_response("GetDistributionConfig"))
    }
}

fn empty_response(operation: &str) -> CloudError {
    CloudError::RemoteApi {
        code: "EmptyResponse".to_string(),
        message: format!("{} returned no distribution", operation),
    }
}

fn to_distribution(
    operation: &str,
    distribution: Option<&types::Distribution>,
    etag: Option<&str>,
) -> Result<Distribution> {
    let distribution = distribution.ok_or_else(|| empty_response(operation))?;
    let config = Option::<&DistributionConfig>::from(distribution.distribution_config())
        .map(value_from_distribution_config)
        .unwrap_or_default();

    Ok(Distribution {
        id: owned(distribution.id()),
        domain_name: owned(distribution.domain_name()),
        etag: etag.map(str::to_string),
        config,
    })
}

#[async_trait]
impl CdnApi for CloudFrontCdn {
    async fn get_distribution(&self, id: &str) -> Result<Distribution> {
        tracing::debug!("GetDistribution {}", id);
        let output = self
            .client
            .get_distribution()
            .id(id)
            .send()
            .await
            .map_err(|e| from_sdk("GetDistribution", e))?;
        to_distribution("GetDistribution", output.distribution(), output.e_tag())
    }

    async fn create_distribution(&self, config: &serde_json::Value) -> Result<Distribution> {
        tracing::debug!("CreateDistribution");
        let config = distribution_config_from_value(config, None)?;
        let output = self
            .client
            .create_distribution()
            .distribution_config(config)
            .send()
            .await
            .map_err(|e| from_sdk("CreateDistribution", e))?;
        to_distribution("CreateDistribution", output.distribution(), output.e_tag())
    }

    async fn update_distribution(
        &self,
        id: &str,
        if_match: &str,
        config: &serde_json::Value,
    ) -> Result<Distribution> {
        tracing::debug!("UpdateDistribution {} (If-Match {})", id, if_match);
        let live = self.live_config(id).await?;
        let config = distribution_config_from_value(config, Some(&live))?;
        let output = self
            .client
            .update_distribution()
            .id(id)
            .if_match(if_match)
            .distribution_config(config)
            .send()
            .await
            .map_err(|e| from_sdk("UpdateDistribution", e))?;
        to_distribution("UpdateDistribution", output.distribution(), output.e_tag())
    }
}
