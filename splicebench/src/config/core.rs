//! Core configuration structures for splicebench.

use std::path::PathBuf;

use burn::prelude::*;

use super::enums::DatasetKind;
use crate::error::{DatasetError, DatasetResult};

/// Configuration for one dataset façade.
///
/// Paths left unset fall back to the per-dataset defaults
/// `data/downloaded/<name>` and `data/raw/<name>/metadata.json`.
#[derive(Config, Debug)]
pub struct DatasetConfig {
    /// Which benchmark to load.
    pub kind: DatasetKind,
    /// Path-related configurations.
    #[config(default = "PathConfig::new()")]
    pub path: PathConfig,
    /// Skip authentic categories and index tampered images only.
    #[config(default = "false")]
    pub tampered_only: bool,
    /// Download and extract the dataset when it is not ready yet.
    #[config(default = "true")]
    pub prepare: bool,
}

/// Path-related configuration.
#[derive(Config, Debug)]
pub struct PathConfig {
    /// Directory holding the downloaded archives and their extracted contents.
    #[config(default = "None")]
    pub download_dir: Option<PathBuf>,
    /// Manifest listing the remote archives of the dataset.
    #[config(default = "None")]
    pub manifest_path: Option<PathBuf>,
}

impl DatasetConfig {
    /// Directory the dataset is downloaded to and extracted in.
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.path
            .download_dir
            .clone()
            .unwrap_or_else(|| self.kind.default_download_dir())
    }

    /// Manifest file of the dataset.
    pub fn resolved_manifest_path(&self) -> PathBuf {
        self.path
            .manifest_path
            .clone()
            .unwrap_or_else(|| self.kind.default_manifest_path())
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err(DatasetError::InvalidConfiguration)` when `tampered_only`
    /// is requested for a dataset without tampered images.
    pub fn validate(&self) -> DatasetResult<()> {
        if self.tampered_only && !self.kind.layout().has_tampered() {
            return Err(DatasetError::InvalidConfiguration {
                reason: format!(
                    "{} contains no tampered images, tampered_only would yield an empty dataset",
                    self.kind.name()
                ),
            });
        }
        Ok(())
    }
}
