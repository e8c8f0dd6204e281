//! Configuration for the demo binaries.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for dataset inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetTestConfig {
    /// Dataset name, e.g. `columbia` or `dso_1`.
    pub dataset: String,
    /// Directory holding the extracted dataset. None uses the dataset default.
    pub download_dir: Option<PathBuf>,
    /// Number of samples to inspect.
    pub num_samples: usize,
    /// Index tampered images only.
    pub tampered_only: bool,
    /// Download and extract the dataset when missing.
    pub prepare: bool,
}

impl Default for DatasetTestConfig {
    fn default() -> Self {
        Self {
            dataset: "columbia".to_string(),
            download_dir: None,
            num_samples: 10,
            tampered_only: false,
            prepare: false,
        }
    }
}
