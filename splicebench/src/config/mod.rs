//! Configuration module for splicebench.
//!
//! - `core`: the dataset configuration structures
//! - `enums`: enumeration types used in configurations and manifests

pub mod core;
pub mod enums;

pub use core::{DatasetConfig, PathConfig};

pub use enums::{Compression, DatasetKind};
