//! SDK failures mapped onto [`CloudError`]

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use s3site_cloud::{CloudError, Result};
use std::fmt::Display;

/// Classify a failed SDK call by its service error code
pub(crate) fn from_sdk<E, R>(operation: &str, err: SdkError<E, R>) -> CloudError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if let Some(service_error) = err.as_service_error() {
        if let Some(code) = service_error.code() {
            let message = service_error.message().unwrap_or("no message");
            return CloudError::from_remote(code, format!("{}: {}", operation, message));
        }
    }

    CloudError::RemoteApi {
        code: "RequestFailed".to_string(),
        message: format!("{}: {}", operation, DisplayErrorContext(&err)),
    }
}

/// A request value the SDK refused to build
pub(crate) fn build_error(err: impl Display) -> CloudError {
    CloudError::InvalidConfiguration(format!("Invalid request: {}", err))
}

/// Builders for shapes with required members return `Result`, others the value
pub(crate) trait Built<T> {
    fn built(self) -> Result<T>;
}

impl<T, E: Display> Built<T> for std::result::Result<T, E> {
    fn built(self) -> Result<T> {
        self.map_err(build_error)
    }
}

impl Built<aws_sdk_s3::types::RoutingRule> for aws_sdk_s3::types::RoutingRule {
    fn built(self) -> Result<Self> {
        Ok(self)
    }
}

impl Built<aws_sdk_cloudfront::types::LoggingConfig> for aws_sdk_cloudfront::types::LoggingConfig {
    fn built(self) -> Result<Self> {
        Ok(self)
    }
}

/// Owned string from an accessor returning `&str` or `Option<&str>`
pub(crate) fn owned<'a>(value: impl Into<Option<&'a str>>) -> String {
    value.into().unwrap_or_default().to_string()
}

/// Flag from an accessor returning `bool` or `Option<bool>`
pub(crate) fn truthy(value: impl Into<Option<bool>>) -> bool {
    value.into().unwrap_or(false)
}

/// Slice from an accessor returning `&[T]` or `Option<&[T]>`
pub(crate) fn slice<'a, T>(value: impl Into<Option<&'a [T]>>) -> &'a [T] {
    value.into().unwrap_or_default()
}
