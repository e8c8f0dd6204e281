//! On-disk layout of a prepared dataset.
//!
//! A [`DatasetLayout`] describes where the images of each category live,
//! how many there must be, and how the ground truth of tampered images is
//! encoded. The built-in layouts come from [`DatasetKind::layout`]; custom
//! layouts can be assembled by hand.
//!
//! [`DatasetKind::layout`]: crate::DatasetKind::layout

use std::path::{Path, PathBuf};

use crate::config::DatasetKind;

/// Whether an image was left untouched or manipulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Pristine camera output. Label 0.
    Authentic,
    /// Spliced or otherwise manipulated. Label 1.
    Tampered,
}

impl Category {
    /// Binary label of the category.
    pub const fn label(self) -> u8 {
        match self {
            Self::Authentic => 0,
            Self::Tampered => 1,
        }
    }

    /// Human-readable name used in log and error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Authentic => "authentic",
            Self::Tampered => "tampered",
        }
    }
}

/// Directory of a ground-truth companion file, relative to its image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskLocation {
    /// Same directory as the image.
    Same,
    /// Subdirectory of the image directory, e.g. `4cam_splc/edgemask`.
    Nested(PathBuf),
    /// Directory next to the image directory, e.g. `<camera>/ground-truth`.
    Sibling(PathBuf),
}

impl MaskLocation {
    /// Resolve the companion directory for an image stored in `image_dir`.
    pub fn resolve(&self, image_dir: &Path) -> PathBuf {
        match self {
            Self::Same => image_dir.to_path_buf(),
            Self::Nested(dir) => image_dir.join(dir),
            Self::Sibling(dir) => image_dir
                .parent()
                .map_or_else(|| dir.clone(), |parent| parent.join(dir)),
        }
    }
}

/// How the tamper localization of an image category is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroundTruth {
    /// No localization available; masks are all zero.
    None,
    /// A companion image where tampered pixels are painted in marker colors.
    ///
    /// A pixel is tampered when its RGB value equals any of `colors`
    /// exactly. The color set is dataset ground truth taken from the
    /// dataset documentation.
    ColorOverlay {
        /// Directory of the overlay images.
        location: MaskLocation,
        /// Appended to the image stem, e.g. `_edgemask`.
        suffix: String,
        /// Extension of the overlay files, without the dot.
        extension: String,
        /// RGB marker colors denoting the tampered region.
        colors: Vec<[u8; 3]>,
    },
    /// A companion grayscale mask.
    BinaryMask {
        /// Directory of the mask images.
        location: MaskLocation,
        /// Appended to the image stem.
        suffix: String,
        /// Extension of the mask files, without the dot.
        extension: String,
        /// Luma values strictly above the threshold are tampered.
        threshold: u8,
        /// Swap tampered and background, for masks that mark the region in black.
        invert: bool,
    },
}

impl GroundTruth {
    /// Path of the companion file for `image`, if the encoding uses one.
    pub fn companion_path(&self, image_dir: &Path, stem: &str) -> Option<PathBuf> {
        match self {
            Self::None => None,
            Self::ColorOverlay {
                location,
                suffix,
                extension,
                ..
            }
            | Self::BinaryMask {
                location,
                suffix,
                extension,
                ..
            } => Some(location.resolve(image_dir).join(format!("{stem}{suffix}.{extension}"))),
        }
    }
}

/// One labelled group of images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpec {
    /// Label of every image in the group.
    pub category: Category,
    /// Name used in error messages, e.g. `4cam_splc`.
    pub name: String,
    /// Directories holding the images, relative to the dataset root.
    pub dirs: Vec<PathBuf>,
    /// Image extension without the dot, matched case-insensitively.
    pub extension: String,
    /// Only files whose name starts with this prefix belong to the group.
    pub prefix: Option<String>,
    /// Documented number of images, summed over `dirs`.
    pub expected: usize,
    /// Encoding of the tamper localization.
    pub ground_truth: GroundTruth,
}

/// Layout of a prepared dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    /// The dataset this layout belongs to.
    pub kind: DatasetKind,
    /// Directories whose presence marks the dataset as extracted.
    pub prepared_dirs: Vec<PathBuf>,
    /// Image groups in index order.
    pub categories: Vec<CategorySpec>,
}

impl DatasetLayout {
    /// Whether any group holds tampered images.
    pub fn has_tampered(&self) -> bool {
        self.categories
            .iter()
            .any(|spec| spec.category == Category::Tampered)
    }

    /// Prepared directories resolved against the dataset root.
    pub fn prepared_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.prepared_dirs.iter().map(|dir| root.join(dir)).collect()
    }

    /// Documented sample count of a category, summed over its groups.
    pub fn expected_count(&self, category: Category) -> usize {
        self.categories
            .iter()
            .filter(|spec| spec.category == category)
            .map(|spec| spec.expected)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_category() {
        assert_eq!(Category::Authentic.label(), 0);
        assert_eq!(Category::Tampered.label(), 1);
    }

    #[test]
    fn mask_locations_resolve_relative_to_image_dir() {
        let image_dir = Path::new("root/Canon_60D/tampered-realistic");
        assert_eq!(MaskLocation::Same.resolve(image_dir), image_dir);
        assert_eq!(
            MaskLocation::Nested("edgemask".into()).resolve(image_dir),
            Path::new("root/Canon_60D/tampered-realistic/edgemask")
        );
        assert_eq!(
            MaskLocation::Sibling("ground-truth".into()).resolve(image_dir),
            Path::new("root/Canon_60D/ground-truth")
        );
    }

    #[test]
    fn companion_path_uses_stem_suffix_and_extension() {
        let gt = GroundTruth::ColorOverlay {
            location: MaskLocation::Nested("edgemask".into()),
            suffix: "_edgemask".to_string(),
            extension: "jpg".to_string(),
            colors: vec![[0, 255, 0]],
        };
        assert_eq!(
            gt.companion_path(Path::new("4cam_splc"), "canong3_canonxt_sub_01"),
            Some(PathBuf::from(
                "4cam_splc/edgemask/canong3_canonxt_sub_01_edgemask.jpg"
            ))
        );
        assert_eq!(GroundTruth::None.companion_path(Path::new("x"), "y"), None);
    }
}
