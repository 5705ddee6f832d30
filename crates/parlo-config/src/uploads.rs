use std::path::PathBuf;

use serde::Deserialize;

/// Staged upload handling
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploadsConfig {
    /// Directory for transient upload staging
    ///
    /// Defaults to the system temp directory. Files never outlive the
    /// request that created them.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl UploadsConfig {
    /// Resolve the staging directory
    pub fn staging_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
