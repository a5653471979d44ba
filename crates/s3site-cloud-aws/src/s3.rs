//! S3 storage client

use crate::error::{Built, build_error, from_sdk};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::types::{
    BucketLocationConstraint, Condition, CreateBucketConfiguration, ErrorDocument, IndexDocument,
    Protocol, Redirect, RedirectAllRequestsTo, RoutingRule, WebsiteConfiguration,
};
use s3site_cloud::{Result, StorageApi, WebsiteConfig};

pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn routing_rule(rule: &s3site_config::RoutingRule) -> Result<RoutingRule> {
    let condition = rule.condition.as_ref().map(|c| {
        Condition::builder()
            .set_key_prefix_equals(c.key_prefix_equals.clone())
            .set_http_error_code_returned_equals(c.http_error_code_returned_equals.clone())
            .build()
    });

    let redirect = &rule.redirect;
    let redirect = Redirect::builder()
        .set_host_name(redirect.host_name.clone())
        .set_protocol(redirect.protocol.as_deref().map(Protocol::from))
        .set_replace_key_prefix_with(redirect.replace_key_prefix_with.clone())
        .set_replace_key_with(redirect.replace_key_with.clone())
        .set_http_redirect_code(redirect.http_redirect_code.clone())
        .build();

    RoutingRule::builder()
        .set_condition(condition)
        .redirect(redirect)
        .build()
        .built()
}

fn website_configuration(website: &WebsiteConfig) -> Result<WebsiteConfiguration> {
    let builder = WebsiteConfiguration::builder();
    let builder = match website {
        WebsiteConfig::Hosting {
            index_document,
            error_document,
            routing_rules,
        } => {
            let rules = routing_rules
                .iter()
                .map(routing_rule)
                .collect::<Result<Vec<_>>>()?;
            builder
                .index_document(
                    IndexDocument::builder()
                        .suffix(index_document)
                        .build()
                        .map_err(build_error)?,
                )
                .error_document(
                    ErrorDocument::builder()
                        .key(error_document)
                        .build()
                        .map_err(build_error)?,
                )
                .set_routing_rules((!rules.is_empty()).then_some(rules))
        }
        WebsiteConfig::RedirectAll { host_name } => builder.redirect_all_requests_to(
            RedirectAllRequestsTo::builder()
                .host_name(host_name)
                .build()
                .map_err(build_error)?,
        ),
    };
    Ok(builder.build())
}

#[async_trait]
impl StorageApi for S3Storage {
    async fn put_website(&self, bucket: &str, website: &WebsiteConfig) -> Result<()> {
        tracing::debug!("PutBucketWebsite {}", bucket);
        self.client
            .put_bucket_website()
            .bucket(bucket)
            .website_configuration(website_configuration(website)?)
            .send()
            .await
            .map_err(|e| from_sdk("PutBucketWebsite", e))?;
        Ok(())
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> Result<()> {
        tracing::debug!("PutBucketPolicy {}", bucket);
        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy)
            .send()
            .await
            .map_err(|e| from_sdk("PutBucketPolicy", e))?;
        Ok(())
    }

    async fn create_bucket(&self, bucket: &str, location_constraint: Option<&str>) -> Result<()> {
        tracing::debug!(
            "CreateBucket {} (location constraint: {})",
            bucket,
            location_constraint.unwrap_or("none")
        );
        let configuration = location_constraint.map(|region| {
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region))
                .build()
        });
        self.client
            .create_bucket()
            .bucket(bucket)
            .set_create_bucket_configuration(configuration)
            .send()
            .await
            .map_err(|e| from_sdk("CreateBucket", e))?;
        Ok(())
    }
}
