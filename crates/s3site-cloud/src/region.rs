//! S3 region table
//!
//! Maps a region identifier to its display name, API hostname, website
//! hostname and the hosted zone id used for Route 53 alias records that point
//! at the region's website endpoint.

use crate::error::{CloudError, Result};

/// Region used when the configuration names none
pub const DEFAULT_REGION: &str = "us-east-1";

/// Regions whose website endpoint uses the older `s3-website-<region>` form
const LEGACY_WEBSITE_REGIONS: [&str; 8] = [
    "us-east-1",
    "us-west-1",
    "us-west-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    "eu-west-1",
    "sa-east-1",
];

/// (identifier, display name, website hosted zone id)
const REGIONS: [(&str, &str, &str); 16] = [
    ("us-east-1", "US East (N. Virginia)", "Z3AQBSTGFYJSTF"),
    ("us-east-2", "US East (Ohio)", "Z2O1EMRO9K5GLX"),
    ("us-west-1", "US West (N. California)", "Z2F56UZL2M1ACD"),
    ("us-west-2", "US West (Oregon)", "Z3BJ6K6RIION7M"),
    ("ca-central-1", "Canada (Central)", "Z1QDHH18159H29"),
    ("ap-south-1", "Asia Pacific (Mumbai)", "Z11RGJOFQNVJUP"),
    ("ap-northeast-1", "Asia Pacific (Tokyo)", "Z2M4EHUR26P7ZW"),
    ("ap-northeast-2", "Asia Pacific (Seoul)", "Z3W03O7B5YMIYP"),
    ("ap-southeast-1", "Asia Pacific (Singapore)", "Z3O0J2DXBE1FTB"),
    ("ap-southeast-2", "Asia Pacific (Sydney)", "Z1WCIGYICN2BYD"),
    ("eu-central-1", "EU (Frankfurt)", "Z21DNDUVLTQW6Q"),
    ("eu-west-1", "EU (Ireland)", "Z1BKCTXD74EZPE"),
    ("eu-west-2", "EU (London)", "Z3GKZC51ZF0DB4"),
    ("eu-west-3", "EU (Paris)", "Z3R1K369G5AVDG"),
    ("eu-north-1", "EU (Stockholm)", "Z3BAZG2TWCNX0D"),
    ("sa-east-1", "South America (São Paulo)", "Z7KQH4QJS55SO"),
];

/// A resolved S3 region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Canonical identifier (`EU` resolves to `eu-west-1`)
    pub id: &'static str,
    pub display_name: &'static str,
    pub api_hostname: String,
    pub website_hostname: String,
    pub website_hosted_zone_id: &'static str,
}

impl Region {
    /// Resolve a configured identifier. `None` and `""` mean [`DEFAULT_REGION`]
    pub fn lookup(identifier: Option<&str>) -> Result<Self> {
        let canonical = match identifier.unwrap_or("") {
            "" => DEFAULT_REGION,
            "EU" => "eu-west-1",
            other => other,
        };

        let (id, display_name, zone_id) = REGIONS
            .iter()
            .find(|(id, _, _)| *id == canonical)
            .copied()
            .ok_or_else(|| {
                CloudError::InvalidConfiguration(format!(
                    "Unknown region '{}'. Known regions: {}",
                    canonical,
                    REGIONS
                        .iter()
                        .map(|(id, _, _)| *id)
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;

        Ok(Self {
            id,
            display_name,
            api_hostname: api_hostname(id),
            website_hostname: website_hostname(id),
            website_hosted_zone_id: zone_id,
        })
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_REGION
    }

    /// Website endpoint of a bucket in this region
    pub fn website_endpoint(&self, bucket: &str) -> String {
        format!("{}.{}", bucket, self.website_hostname)
    }
}

fn is_legacy(region: &str) -> bool {
    LEGACY_WEBSITE_REGIONS.contains(&region)
}

fn website_hostname(region: &str) -> String {
    if is_legacy(region) {
        format!("s3-website-{}.amazonaws.com", region)
    } else {
        format!("s3-website.{}.amazonaws.com", region)
    }
}

fn api_hostname(region: &str) -> String {
    if region == DEFAULT_REGION {
        "s3.amazonaws.com".to_string()
    } else if is_legacy(region) {
        format!("s3-{}.amazonaws.com", region)
    } else {
        format!("s3.{}.amazonaws.com", region)
    }
}
