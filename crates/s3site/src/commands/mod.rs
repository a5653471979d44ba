pub mod apply;
pub mod validate;

use s3site_config::FileConfigSource;
use std::path::PathBuf;

/// `--config-file` があればそれを、なければ探索して読み込む
pub fn load_config(config_file: Option<PathBuf>) -> anyhow::Result<FileConfigSource> {
    let path = match config_file {
        Some(path) => path,
        None => s3site_config::find_config_file()?,
    };
    tracing::debug!("Loading config from {}", path.display());
    Ok(FileConfigSource::load(&path)?)
}
