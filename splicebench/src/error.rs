//! Error types for dataset acquisition and sample decoding.
//!
//! Every failure is reported to the immediate caller and none is retried
//! internally. Preparation errors name the offending manifest entry or
//! archive, decode errors name the offending sample path.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for splicebench operations.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Network or I/O failure while downloading a manifest entry.
    #[error("Failed to fetch '{entry}' from {url}: {reason}")]
    Fetch {
        /// File name of the manifest entry being fetched.
        entry: String,
        /// Remote URL of the entry.
        url: String,
        /// Description of the underlying failure.
        reason: String,
    },

    /// A file on disk does not match the checksum listed in the manifest.
    ///
    /// The file is left in place for inspection.
    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    Integrity {
        /// The local file that failed verification.
        path: PathBuf,
        /// Digest listed in the manifest.
        expected: String,
        /// Digest computed from the file.
        actual: String,
    },

    /// An archive could not be unpacked, or did not produce the expected layout.
    #[error("Failed to extract {archive}: {reason}")]
    Extraction {
        /// The archive being extracted.
        archive: PathBuf,
        /// Description of the underlying failure.
        reason: String,
    },

    /// The number of enumerated samples disagrees with the documented count.
    #[error(
        "Expected {expected} {category} images in {directory}, found {found}; the dataset is incomplete or corrupted"
    )]
    Cardinality {
        /// Name of the category being enumerated.
        category: String,
        /// First directory of the category.
        directory: PathBuf,
        /// Documented sample count.
        expected: usize,
        /// Number of files actually found.
        found: usize,
    },

    /// An image or mask file could be read but did not pass validation.
    #[error("Failed to decode sample {path}: {reason}")]
    Decode {
        /// The image or mask file.
        path: PathBuf,
        /// What the validation rejected.
        reason: String,
    },

    /// Error when opening an image or mask file fails.
    #[error("Failed to open image: {path}")]
    ImageOpenFailed {
        /// The file that failed to open.
        path: PathBuf,
        /// The underlying image processing error.
        #[source]
        source: image::ImageError,
    },

    /// Sample access outside `[0, len)`.
    #[error("Sample index {index} out of range for dataset of length {len}")]
    Index {
        /// The requested index.
        index: i64,
        /// Length of the dataset.
        len: usize,
    },

    /// Error for when a dataset configuration is logically inconsistent.
    #[error("Invalid dataset configuration: {reason}")]
    InvalidConfiguration {
        /// The reason why the configuration is invalid.
        reason: String,
    },

    /// A manifest file could not be read or parsed.
    #[error("Invalid manifest {path}: {reason}")]
    Manifest {
        /// The manifest file.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// A filesystem operation failed.
    #[error("I/O error on {path}")]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn decode(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A specialized `Result` type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;
