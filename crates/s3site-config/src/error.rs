use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Config file not found. Looked for:\n\
        - the S3SITE_CONFIG_PATH environment variable\n\
        - s3_website.yml or s3_website.yaml in the current directory\n\
        Pass --config-file to use another location"
    )]
    ConfigFileNotFound,

    #[error("File {} does not contain the required key(s) {}", .path.display(), .missing.join(", "))]
    MissingKeys { path: PathBuf, missing: Vec<String> },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
