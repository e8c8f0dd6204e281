//! # splicebench
//!
//! Acquisition and normalization of image-splicing benchmarks, built on the
//! Burn dataset API.
//!
//! Every supported benchmark is presented as an indexed sequence of
//! `(image, label, mask)` samples with one canonical contract: an RGB image
//! in channel-major order, a binary label (0 authentic, 1 tampered) and a
//! per-pixel binary mask with the same spatial size as the image.
//!
//! ## Modules
//!
//! - `config`: dataset selection and path configuration.
//! - `manifest`: remote archive lists, loaded from JSON.
//! - `fetch`: idempotent downloads with optional SHA-256 verification.
//! - `extract`: tar, tar.gz, tar.bz2 and zip unpacking.
//! - `prepare`: download and extraction orchestration.
//! - `layout` and `catalog`: on-disk layout of each benchmark.
//! - `index`: deterministic enumeration of sample files.
//! - `decode`: per-dataset ground-truth decoding into canonical samples.
//! - `dataset`: the [`ForgeryDataset`] façade.
//! - `error`: the error taxonomy shared by all of the above.

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod decode;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod index;
pub mod layout;
pub mod manifest;
pub mod prepare;

#[cfg(test)]
mod test_utils;

#[doc(inline)]
pub use config::{Compression, DatasetConfig, DatasetKind, PathConfig};
#[doc(inline)]
pub use dataset::ForgeryDataset;
#[doc(inline)]
pub use decode::{overlay_mask, ForgerySample, SampleDecoder};
#[doc(inline)]
pub use error::{DatasetError, DatasetResult};
#[doc(inline)]
pub use extract::{ArchiveExtractor, Extract};
#[doc(inline)]
pub use fetch::{ensure_downloaded, sha256_file, verify_checksum, Download, HttpDownloader};
#[doc(inline)]
pub use index::{build_index, IndexOptions, SampleDescriptor};
#[doc(inline)]
pub use layout::{Category, CategorySpec, DatasetLayout, GroundTruth, MaskLocation};
#[doc(inline)]
pub use manifest::{Manifest, ManifestEntry};
#[doc(inline)]
pub use prepare::{is_prepared, DatasetPreparer};
