//! Cloud error types
//!
//! Remote failures are classified through [`CloudError::from_remote`], a fixed
//! table from provider error codes to the variants below. Codes the table does
//! not know become [`CloudError::RemoteApi`] carrying the raw code and message.

use thiserror::Error;

/// Kind of remote resource reported as missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Bucket,
    Distribution,
    HostedZone,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Bucket => write!(f, "bucket"),
            ResourceKind::Distribution => write!(f, "distribution"),
            ResourceKind::HostedZone => write!(f, "hosted zone"),
        }
    }
}

/// Cloud errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("The {kind} does not exist: {message}")]
    MissingResource { kind: ResourceKind, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Concurrent modification detected: {0}. Please run the command again")]
    ConcurrencyConflict(String),

    #[error("AWS API call failed ({code}): {message}")]
    RemoteApi { code: String, message: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Config error: {0}")]
    Config(#[from] s3site_config::ConfigError),
}

impl CloudError {
    /// Map a remote error code onto the error taxonomy
    pub fn from_remote(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            "NoSuchBucket" => CloudError::MissingResource {
                kind: ResourceKind::Bucket,
                message,
            },
            "NoSuchDistribution" => CloudError::MissingResource {
                kind: ResourceKind::Distribution,
                message,
            },
            "NoSuchHostedZone" => CloudError::MissingResource {
                kind: ResourceKind::HostedZone,
                message,
            },
            "PreconditionFailed" | "InvalidIfMatchVersion" => {
                CloudError::ConcurrencyConflict(message)
            }
            _ => CloudError::RemoteApi {
                code: code.to_string(),
                message,
            },
        }
    }

    pub fn is_missing(&self, kind: ResourceKind) -> bool {
        matches!(self, CloudError::MissingResource { kind: k, .. } if *k == kind)
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert!(CloudError::from_remote("NoSuchBucket", "gone").is_missing(ResourceKind::Bucket));
        assert!(
            CloudError::from_remote("NoSuchHostedZone", "gone")
                .is_missing(ResourceKind::HostedZone)
        );
        assert!(matches!(
            CloudError::from_remote("PreconditionFailed", "stale"),
            CloudError::ConcurrencyConflict(_)
        ));
        assert!(matches!(
            CloudError::from_remote("InvalidIfMatchVersion", "stale"),
            CloudError::ConcurrencyConflict(_)
        ));
    }

    #[test]
    fn test_unknown_code_keeps_raw_message() {
        let err = CloudError::from_remote("AccessDenied", "Access Denied");
        match &err {
            CloudError::RemoteApi { code, message } => {
                assert_eq!(code, "AccessDenied");
                assert_eq!(message, "Access Denied");
            }
            other => panic!("Expected RemoteApi, got {:?}", other),
        }
        assert!(err.to_string().contains("AccessDenied"));
        assert!(!err.is_missing(ResourceKind::Bucket));
    }
}
