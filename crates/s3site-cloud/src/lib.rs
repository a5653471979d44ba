//! s3site reconciliation core
//!
//! Makes an S3 bucket serve a static website, optionally puts a CloudFront
//! distribution in front of it and points Route 53 records at whichever of the
//! two serves the site.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   s3site CLI                     │
//! │                 (s3site apply)                   │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 s3site-cloud                     │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │               Orchestrator                │   │
//! │  │   bucket → distribution → domain          │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │ Region Table │  │  Deep Merge  │            │
//! │  └──────────────┘  └──────────────┘            │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │ trait StorageApi / CdnApi / DnsApi        │   │
//! │  └──────────────────────────────────────────┘   │
//! └───────────────────────┬─────────────────────────┘
//!                         │
//!                 ┌───────▼───────┐
//!                 │  s3site-cloud │
//!                 │      -aws     │
//!                 └───────────────┘
//! ```

pub mod action;
pub mod api;
pub mod bucket;
pub mod distribution;
pub mod domain;
pub mod error;
pub mod merge;
pub mod orchestrator;
pub mod prompt;
pub mod region;

#[cfg(test)]
mod testing;

// Re-exports
pub use action::{BucketOutcome, DistributionOutcome, DomainOutcome, RunReport, Step, StepResult};
pub use api::{
    AliasTarget, CdnApi, ChangeStatus, Distribution, DnsApi, DnsRecord, HostedZone, RetryConfig,
    StorageApi, WebsiteConfig, ZoneChange,
};
pub use bucket::BucketProvisioner;
pub use distribution::{DistributionReconciler, RunOptions};
pub use domain::{CDN_HOSTED_ZONE_ID, DomainReconciler};
pub use error::{CloudError, ResourceKind, Result};
pub use orchestrator::{Clients, Orchestrator};
pub use prompt::{Console, Interaction, Unattended};
pub use region::Region;
