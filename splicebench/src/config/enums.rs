//! Enumeration types for splicebench configuration.

use std::{path::PathBuf, str::FromStr};

use burn::prelude::*;

use crate::error::{DatasetError, DatasetResult};

/// The supported tampering benchmarks.
///
/// The catalog is closed: each variant carries its own on-disk layout,
/// documented sample counts and ground-truth encoding (see
/// [`DatasetKind::layout`](crate::DatasetKind::layout)).
#[derive(Config, Debug, PartialEq, Eq)]
pub enum DatasetKind {
    /// Columbia Uncompressed Image Splicing Detection Evaluation Dataset.
    Columbia,
    /// DSO-1 splicing dataset.
    Dso1,
    /// In-the-Wild splicing dataset (tampered images only).
    InTheWild,
    /// Realistic Tampering dataset, four camera models.
    RealisticTampering,
    /// MIRFLICKR-25k (authentic images only).
    Mirflickr25k,
}

impl DatasetKind {
    /// Every supported dataset, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::Columbia,
        Self::Dso1,
        Self::InTheWild,
        Self::RealisticTampering,
        Self::Mirflickr25k,
    ];

    /// Directory-friendly name of the dataset.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Columbia => "columbia",
            Self::Dso1 => "dso_1",
            Self::InTheWild => "in_the_wild",
            Self::RealisticTampering => "realistic_tampering",
            Self::Mirflickr25k => "mirflickr_25k",
        }
    }

    /// Default download and extraction directory, `data/downloaded/<name>`.
    pub fn default_download_dir(&self) -> PathBuf {
        PathBuf::from("data/downloaded").join(self.name())
    }

    /// Default manifest location, `data/raw/<name>/metadata.json`.
    pub fn default_manifest_path(&self) -> PathBuf {
        PathBuf::from("data/raw").join(self.name()).join("metadata.json")
    }
}

impl FromStr for DatasetKind {
    type Err = DatasetError;

    fn from_str(s: &str) -> DatasetResult<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| DatasetError::InvalidConfiguration {
                reason: format!(
                    "unknown dataset '{s}' - available datasets: {}",
                    Self::ALL.map(|kind| kind.name()).join(", ")
                ),
            })
    }
}

/// Compression applied to a downloaded archive.
#[derive(Config, Debug, PartialEq, Eq)]
pub enum Compression {
    /// Plain tar archive.
    None,
    /// Tar archive compressed with gzip.
    Gzip,
    /// Tar archive compressed with bzip2.
    Bzip2,
    /// Zip archive.
    Zip,
}

impl Compression {
    /// Infer the compression from an archive file name.
    ///
    /// Returns `None` when the extension is not recognized.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".tar.bz2") || lower.ends_with(".tbz2") || lower.ends_with(".tbz") {
            Some(Self::Bzip2)
        } else if lower.ends_with(".tar.gz") || lower.ends_with(".tgz") {
            Some(Self::Gzip)
        } else if lower.ends_with(".zip") {
            Some(Self::Zip)
        } else if lower.ends_with(".tar") {
            Some(Self::None)
        } else {
            None
        }
    }
}
