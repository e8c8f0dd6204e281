//! Built-in dataset catalog.
//!
//! Each [`DatasetKind`] maps to the directory layout its archives extract to,
//! the documented number of images per category, and the way its ground
//! truth is encoded.

use std::path::PathBuf;

use crate::{
    config::DatasetKind,
    layout::{Category, CategorySpec, DatasetLayout, GroundTruth, MaskLocation},
};

/// Marker colors of the Columbia edge masks. Both shades of green denote the
/// spliced region; the red outline is not part of the region.
pub const COLUMBIA_SPLICE_COLORS: [[u8; 3]; 2] = [[0, 255, 0], [0, 200, 0]];

/// Camera subdirectories of the Realistic Tampering dataset.
pub const REALISTIC_TAMPERING_CAMERAS: [&str; 4] =
    ["Canon_60D", "Nikon_D7000", "Nikon_D90", "Sony_A57"];

const MASK_THRESHOLD: u8 = 127;

fn group(
    category: Category,
    name: &str,
    dirs: Vec<PathBuf>,
    extension: &str,
    expected: usize,
    ground_truth: GroundTruth,
) -> CategorySpec {
    CategorySpec {
        category,
        name: name.to_string(),
        dirs,
        extension: extension.to_string(),
        prefix: None,
        expected,
        ground_truth,
    }
}

fn binary_mask(location: MaskLocation, extension: &str) -> GroundTruth {
    GroundTruth::BinaryMask {
        location,
        suffix: String::new(),
        extension: extension.to_string(),
        threshold: MASK_THRESHOLD,
        invert: false,
    }
}

impl DatasetKind {
    /// On-disk layout of the extracted dataset.
    pub fn layout(&self) -> DatasetLayout {
        match self {
            Self::Columbia => columbia(),
            Self::Dso1 => dso_1(),
            Self::InTheWild => in_the_wild(),
            Self::RealisticTampering => realistic_tampering(),
            Self::Mirflickr25k => mirflickr_25k(),
        }
    }
}

/// Columbia Uncompressed Image Splicing Detection Evaluation Dataset.
///
/// <https://www.ee.columbia.edu/ln/dvmm/downloads/authsplcuncmp/>
fn columbia() -> DatasetLayout {
    DatasetLayout {
        kind: DatasetKind::Columbia,
        prepared_dirs: vec!["4cam_auth".into(), "4cam_splc".into()],
        categories: vec![
            group(
                Category::Authentic,
                "4cam_auth",
                vec!["4cam_auth".into()],
                "tif",
                183,
                GroundTruth::None,
            ),
            group(
                Category::Tampered,
                "4cam_splc",
                vec!["4cam_splc".into()],
                "tif",
                180,
                GroundTruth::ColorOverlay {
                    location: MaskLocation::Nested("edgemask".into()),
                    suffix: "_edgemask".to_string(),
                    extension: "jpg".to_string(),
                    colors: COLUMBIA_SPLICE_COLORS.to_vec(),
                },
            ),
        ],
    }
}

/// DSO-1: 100 original and 100 spliced images sharing one directory.
fn dso_1() -> DatasetLayout {
    let images: PathBuf = ["tifs-database", "DSO-1"].iter().collect();
    let masks: PathBuf = ["tifs-database", "DSO-1-Fake-Images-Masks"].iter().collect();

    let mut normal = group(
        Category::Authentic,
        "DSO-1 normal",
        vec![images.clone()],
        "png",
        100,
        GroundTruth::None,
    );
    normal.prefix = Some("normal-".to_string());

    let mut splicing = group(
        Category::Tampered,
        "DSO-1 splicing",
        vec![images.clone()],
        "png",
        100,
        binary_mask(MaskLocation::Sibling("DSO-1-Fake-Images-Masks".into()), "png"),
    );
    splicing.prefix = Some("splicing-".to_string());

    DatasetLayout {
        kind: DatasetKind::Dso1,
        prepared_dirs: vec![images, masks],
        categories: vec![normal, splicing],
    }
}

/// In-the-Wild: 201 spliced images collected online, no authentic set.
fn in_the_wild() -> DatasetLayout {
    let images: PathBuf = ["label_in_wild", "images"].iter().collect();
    let masks: PathBuf = ["label_in_wild", "masks"].iter().collect();

    DatasetLayout {
        kind: DatasetKind::InTheWild,
        prepared_dirs: vec![images.clone(), masks],
        categories: vec![group(
            Category::Tampered,
            "label_in_wild",
            vec![images],
            "jpg",
            201,
            binary_mask(MaskLocation::Sibling("masks".into()), "png"),
        )],
    }
}

/// Realistic Tampering: 220 pristine and 220 tampered images over four cameras.
fn realistic_tampering() -> DatasetLayout {
    let camera_dirs = |leaf: &str| -> Vec<PathBuf> {
        REALISTIC_TAMPERING_CAMERAS
            .iter()
            .map(|camera| ["data-images", *camera, leaf].iter().collect())
            .collect()
    };

    DatasetLayout {
        kind: DatasetKind::RealisticTampering,
        prepared_dirs: REALISTIC_TAMPERING_CAMERAS
            .iter()
            .map(|camera| ["data-images", *camera].iter().collect())
            .collect(),
        categories: vec![
            group(
                Category::Authentic,
                "pristine",
                camera_dirs("pristine"),
                "tif",
                220,
                GroundTruth::None,
            ),
            group(
                Category::Tampered,
                "tampered-realistic",
                camera_dirs("tampered-realistic"),
                "tif",
                220,
                binary_mask(MaskLocation::Sibling("ground-truth".into()), "PNG"),
            ),
        ],
    }
}

/// MIRFLICKR-25k: 25 000 Flickr photos, used as a pool of authentic images.
fn mirflickr_25k() -> DatasetLayout {
    let mut photos = group(
        Category::Authentic,
        "mirflickr",
        vec!["mirflickr".into()],
        "jpg",
        25_000,
        GroundTruth::None,
    );
    photos.prefix = Some("im".to_string());

    DatasetLayout {
        kind: DatasetKind::Mirflickr25k,
        prepared_dirs: vec!["mirflickr".into()],
        categories: vec![photos],
    }
}
