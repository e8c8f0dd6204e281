//! Sample decoding: turns a [`SampleDescriptor`] into an image, a label and
//! a tamper-localization mask.
//!
//! Every dataset encodes its ground truth differently (colored overlays,
//! standalone masks, nothing at all). The decoder reconciles all of them into
//! the same representation: an RGB image laid out `[3, H, W]` and a mask
//! laid out `[H, W]` holding 0 or 1.

use std::path::{Path, PathBuf};

use burn::tensor::{backend::Backend, Int, Tensor, TensorData};
use image::{DynamicImage, GenericImageView, RgbImage};

use crate::{
    error::{DatasetError, DatasetResult},
    index::SampleDescriptor,
    layout::{Category, DatasetLayout, GroundTruth},
};

/// A decoded sample.
///
/// Raw data is kept on the host; [`ForgerySample::to_tensors`] moves it to a
/// burn device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgerySample {
    /// RGB pixels, channel-major `[3, H, W]`.
    pub image: Vec<u8>,
    /// 0 for authentic, 1 for tampered.
    pub label: u8,
    /// Tamper-localization mask `[H, W]`, values in {0, 1}.
    pub mask: Vec<u8>,
    /// Image height in pixels.
    pub height: usize,
    /// Image width in pixels.
    pub width: usize,
    /// Source image file.
    pub path: PathBuf,
}

impl ForgerySample {
    /// Shape of [`ForgerySample::image`].
    pub const fn image_shape(&self) -> [usize; 3] {
        [3, self.height, self.width]
    }

    /// Shape of [`ForgerySample::mask`].
    pub const fn mask_shape(&self) -> [usize; 2] {
        [self.height, self.width]
    }

    /// Value of channel `c` (0 = red) at row `y`, column `x`.
    pub fn pixel(&self, c: usize, y: usize, x: usize) -> u8 {
        self.image[(c * self.height + y) * self.width + x]
    }

    /// Mask value at row `y`, column `x`.
    pub fn mask_at(&self, y: usize, x: usize) -> u8 {
        self.mask[y * self.width + x]
    }

    /// Whether the sample is labelled authentic.
    pub const fn is_authentic(&self) -> bool {
        self.label == Category::Authentic.label()
    }

    /// Number of mask pixels marked tampered.
    pub fn tampered_pixels(&self) -> usize {
        self.mask.iter().filter(|&&v| v == 1).count()
    }

    /// Image `[3, H, W]` and mask `[H, W]` as integer tensors on `device`.
    pub fn to_tensors<B: Backend>(
        &self,
        device: &B::Device,
    ) -> (Tensor<B, 3, Int>, Tensor<B, 2, Int>) {
        let image = Tensor::<B, 3, Int>::from_data(
            TensorData::new(self.image.clone(), self.image_shape()),
            device,
        );
        let mask = Tensor::<B, 2, Int>::from_data(
            TensorData::new(self.mask.clone(), self.mask_shape()),
            device,
        );
        (image, mask)
    }
}

/// Decodes samples of one dataset layout.
#[derive(Debug, Clone)]
pub struct SampleDecoder {
    layout: DatasetLayout,
}

impl SampleDecoder {
    /// Create a decoder for `layout`.
    pub const fn new(layout: DatasetLayout) -> Self {
        Self { layout }
    }

    /// The layout samples are decoded against.
    pub const fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    /// Decode one sample.
    ///
    /// # Errors
    ///
    /// - `DatasetError::ImageOpenFailed` when the image or its companion
    ///   ground truth cannot be read.
    /// - `DatasetError::Decode` when the image is not 8-bit color, the
    ///   ground truth does not match the image size, or the descriptor's
    ///   group is not a category of this layout with the same role.
    pub fn decode(&self, descriptor: &SampleDescriptor) -> DatasetResult<ForgerySample> {
        let path = &descriptor.path;
        let rgb = load_rgb8(path)?;
        let (width, height) = rgb.dimensions();
        let (width, height) = (width as usize, height as usize);
        let image = to_channel_major(&rgb);

        let spec = self
            .layout
            .categories
            .get(descriptor.group)
            .filter(|spec| spec.category == descriptor.category)
            .ok_or_else(|| {
                DatasetError::decode(
                    path,
                    format!(
                        "group {} of the {} layout does not hold {} images",
                        descriptor.group,
                        self.layout.kind.name(),
                        descriptor.category.name()
                    ),
                )
            })?;
        let mask = match descriptor.category {
            Category::Tampered => tampered_mask(path, &spec.ground_truth, width, height)?,
            Category::Authentic => vec![0; width * height],
        };

        Ok(ForgerySample {
            image,
            label: descriptor.label(),
            mask,
            height,
            width,
            path: path.clone(),
        })
    }
}

fn tampered_mask(
    image_path: &Path,
    ground_truth: &GroundTruth,
    width: usize,
    height: usize,
) -> DatasetResult<Vec<u8>> {
    let image_dir = image_path.parent().unwrap_or_else(|| Path::new(""));
    let stem = image_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| DatasetError::decode(image_path, "file name is not valid UTF-8"))?;

    let Some(companion) = ground_truth.companion_path(image_dir, stem) else {
        return Ok(vec![0; width * height]);
    };
    let truth = open_image(&companion)?;
    let (truth_width, truth_height) = truth.dimensions();
    if (truth_width as usize, truth_height as usize) != (width, height) {
        return Err(DatasetError::decode(
            &companion,
            format!(
                "ground truth is {truth_width}x{truth_height} but image {} is {width}x{height}",
                image_path.display()
            ),
        ));
    }

    let mask = match ground_truth {
        GroundTruth::None => vec![0; width * height],
        GroundTruth::ColorOverlay { colors, .. } => overlay_mask(&truth.to_rgb8(), colors),
        GroundTruth::BinaryMask {
            threshold, invert, ..
        } => truth
            .to_luma8()
            .pixels()
            .map(|p| u8::from((p.0[0] > *threshold) != *invert))
            .collect(),
    };
    Ok(mask)
}

/// 1 where the overlay pixel equals any marker color, 0 elsewhere.
pub fn overlay_mask(overlay: &RgbImage, colors: &[[u8; 3]]) -> Vec<u8> {
    overlay
        .pixels()
        .map(|p| u8::from(colors.contains(&p.0)))
        .collect()
}

fn open_image(path: &Path) -> DatasetResult<DynamicImage> {
    image::open(path).map_err(|source| DatasetError::ImageOpenFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Load an image as 8-bit RGB.
///
/// 8-bit gray and alpha variants are expanded to RGB (alpha is dropped).
/// Deeper or floating point data is rejected rather than rescaled.
fn load_rgb8(path: &Path) -> DatasetResult<RgbImage> {
    let image = open_image(path)?;
    let rgb = match image {
        DynamicImage::ImageRgb8(rgb) => rgb,
        DynamicImage::ImageRgba8(_) | DynamicImage::ImageLuma8(_) | DynamicImage::ImageLumaA8(_) => {
            image.to_rgb8()
        }
        other => {
            return Err(DatasetError::decode(
                path,
                format!("expected 8-bit color data, got {:?}", other.color()),
            ))
        }
    };

    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(DatasetError::decode(path, "image has no pixels"));
    }
    let expected = 3 * width as usize * height as usize;
    if rgb.as_raw().len() != expected {
        return Err(DatasetError::decode(
            path,
            format!(
                "expected {expected} bytes for {width}x{height} RGB, got {}",
                rgb.as_raw().len()
            ),
        ));
    }
    Ok(rgb)
}

/// Reorder interleaved `[H, W, 3]` pixels into `[3, H, W]`.
fn to_channel_major(rgb: &RgbImage) -> Vec<u8> {
    let plane = rgb.width() as usize * rgb.height() as usize;
    let mut chw = vec![0; 3 * plane];
    for (i, pixel) in rgb.pixels().enumerate() {
        for (c, value) in pixel.0.iter().enumerate() {
            chw[c * plane + i] = *value;
        }
    }
    chw
}
