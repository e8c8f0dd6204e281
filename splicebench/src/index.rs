//! Sample index construction.
//!
//! The index is the ordered list of image files of a prepared dataset.
//! Position in the index is the externally visible identity of a sample.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{
    error::{DatasetError, DatasetResult},
    layout::{Category, CategorySpec, DatasetLayout},
};

/// Reference to one image of a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleDescriptor {
    /// Path of the image file.
    pub path: PathBuf,
    /// Category the image was enumerated from.
    pub category: Category,
    /// Position of the image's group in [`DatasetLayout::categories`].
    pub group: usize,
}

impl SampleDescriptor {
    /// Binary label implied by the category.
    pub const fn label(&self) -> u8 {
        self.category.label()
    }
}

/// Options for [`build_index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexOptions {
    /// Leave authentic groups out of the index.
    pub tampered_only: bool,
}

/// Enumerate the images of a prepared dataset.
///
/// Groups are visited in layout order; within a directory files are sorted
/// by name so the index is stable across runs and platforms.
///
/// # Errors
///
/// Returns `Err(DatasetError::Cardinality)` when a group does not hold its
/// documented number of images, including when its directories are missing.
pub fn build_index(
    root_dir: &Path,
    layout: &DatasetLayout,
    options: IndexOptions,
) -> DatasetResult<Vec<SampleDescriptor>> {
    let mut groups: Vec<(usize, &CategorySpec)> = layout
        .categories
        .iter()
        .enumerate()
        .filter(|(_, spec)| !(options.tampered_only && spec.category == Category::Authentic))
        .collect();
    // Authentic before tampered; stable sort keeps layout order within a category.
    groups.sort_by_key(|(_, spec)| spec.category != Category::Authentic);

    let mut index = Vec::new();
    for (group, spec) in groups {
        let paths = enumerate_group(root_dir, spec)?;
        if paths.len() != spec.expected {
            let directory = spec
                .dirs
                .first()
                .map_or_else(|| root_dir.to_path_buf(), |dir| root_dir.join(dir));
            warn!(
                dataset = layout.kind.name(),
                group = %spec.name,
                expected = spec.expected,
                found = paths.len(),
                "unexpected number of images"
            );
            return Err(DatasetError::Cardinality {
                category: spec.name.clone(),
                directory,
                expected: spec.expected,
                found: paths.len(),
            });
        }

        debug!(group = %spec.name, count = paths.len(), "indexed image group");
        index.extend(paths.into_iter().map(|path| SampleDescriptor {
            path,
            category: spec.category,
            group,
        }));
    }

    Ok(index)
}

fn enumerate_group(root_dir: &Path, spec: &CategorySpec) -> DatasetResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for dir in &spec.dirs {
        let dir = root_dir.join(dir);
        if !dir.is_dir() {
            continue;
        }

        let walker = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|e| DatasetError::io(&dir, e.into()))?;
            if entry.file_type().is_file() && matches_group(entry.path(), spec) {
                paths.push(entry.into_path());
            }
        }
    }
    Ok(paths)
}

fn matches_group(path: &Path, spec: &CategorySpec) -> bool {
    let extension_matches = path
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case(&spec.extension));
    let prefix_matches = spec.prefix.as_deref().is_none_or(|prefix| {
        path.file_name()
            .and_then(OsStr::to_str)
            .is_some_and(|name| name.starts_with(prefix))
    });
    extension_matches && prefix_matches
}
