//! AWS implementation of the s3site cloud API traits
//!
//! [`AwsClients::connect`] builds S3, CloudFront and Route 53 clients from a
//! config source and returns them as [`s3site_cloud::Clients`].
//!
//! CloudFront distribution configs cross the trait boundary as snake_case
//! `serde_json::Value` mappings; [`convert`] maps them onto the SDK shapes.

mod client;
mod cloudfront;
pub mod convert;
mod error;
mod route53;
mod s3;

pub use client::AwsClients;
pub use cloudfront::CloudFrontCdn;
pub use route53::Route53Dns;
pub use s3::S3Storage;
