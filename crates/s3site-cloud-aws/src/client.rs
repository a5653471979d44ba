//! Client construction from a config source

use crate::cloudfront::CloudFrontCdn;
use crate::route53::Route53Dns;
use crate::s3::S3Storage;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region as SdkRegion};
use s3site_cloud::{Clients, Region, Result};
use s3site_config::ConfigSource;
use std::sync::Arc;

/// CloudFront and Route 53 are global services signed in this region
const GLOBAL_REGION: &str = "us-east-1";

pub struct AwsClients;

impl AwsClients {
    /// Build S3, CloudFront and Route 53 clients with the configured static credentials
    pub async fn connect(config: &dyn ConfigSource) -> Result<Clients> {
        let region = Region::lookup(config.endpoint())?;
        tracing::debug!(
            "Using S3 region {} ({}, {})",
            region.id,
            region.display_name,
            region.api_hostname
        );

        let credentials = Credentials::new(
            config.access_key_id(),
            config.secret_access_key(),
            None,
            None,
            "s3site",
        );

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(SdkRegion::new(region.id))
            .load()
            .await;

        let s3 = aws_sdk_s3::Client::new(&shared);

        let cloudfront = aws_sdk_cloudfront::Client::from_conf(
            aws_sdk_cloudfront::config::Builder::from(&shared)
                .region(aws_sdk_cloudfront::config::Region::new(GLOBAL_REGION))
                .build(),
        );

        let route53 = aws_sdk_route53::Client::from_conf(
            aws_sdk_route53::config::Builder::from(&shared)
                .region(aws_sdk_route53::config::Region::new(GLOBAL_REGION))
                .build(),
        );

        Ok(Clients {
            storage: Arc::new(S3Storage::new(s3)),
            cdn: Arc::new(CloudFrontCdn::new(cloudfront)),
            dns: Arc::new(Route53Dns::new(route53)),
        })
    }
}
