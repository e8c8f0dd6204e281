//! Dataset façade over a prepared tampering benchmark.
//!
//! [`ForgeryDataset`] holds the sample index and decodes on every access.
//! Nothing is cached, so memory stays flat regardless of dataset size and
//! each access pays the full decoding cost. The façade is immutable after
//! construction and can be shared read-only by dataloader workers.

use burn::data::dataset::Dataset;
use tracing::{error, info};

use crate::{
    config::{DatasetConfig, DatasetKind},
    decode::{ForgerySample, SampleDecoder},
    error::{DatasetError, DatasetResult},
    extract::Extract,
    fetch::Download,
    index::{build_index, IndexOptions, SampleDescriptor},
    layout::{Category, DatasetLayout},
    prepare::{is_prepared, DatasetPreparer},
};

/// Tampering dataset returning canonical `(image, label, mask)` samples.
#[derive(Debug, Clone)]
pub struct ForgeryDataset {
    decoder: SampleDecoder,
    index: Vec<SampleDescriptor>,
}

impl ForgeryDataset {
    /// Create a dataset, downloading and extracting it first if needed.
    ///
    /// # Arguments
    ///
    /// * `config` - Dataset selection, paths and indexing options
    ///
    /// # Errors
    ///
    /// Returns any preparation error, or `DatasetError::Cardinality` when the
    /// prepared directories do not hold the documented number of images.
    pub fn new(config: &DatasetConfig) -> DatasetResult<Self> {
        config.validate()?;
        if config.prepare {
            let download_dir = config.resolved_download_dir();
            if !is_prepared(&config.kind.layout().prepared_paths(&download_dir)) {
                DatasetPreparer::http()?.prepare_config(config)?;
            }
        }
        Self::open(config)
    }

    /// Create a dataset using a custom preparer.
    pub fn with_preparer<D: Download, E: Extract>(
        config: &DatasetConfig,
        preparer: &DatasetPreparer<D, E>,
    ) -> DatasetResult<Self> {
        config.validate()?;
        if config.prepare {
            preparer.prepare_config(config)?;
        }
        Self::open(config)
    }

    /// Index an already prepared dataset without touching the network.
    pub fn open(config: &DatasetConfig) -> DatasetResult<Self> {
        config.validate()?;
        let layout = config.kind.layout();
        let root = config.resolved_download_dir();
        let options = IndexOptions {
            tampered_only: config.tampered_only,
        };
        let index = build_index(&root, &layout, options)?;

        info!(
            dataset = config.kind.name(),
            samples = index.len(),
            root = %root.display(),
            "dataset indexed"
        );
        Ok(Self::from_index(layout, index))
    }

    /// Wrap a prebuilt index.
    pub fn from_index(layout: DatasetLayout, index: Vec<SampleDescriptor>) -> Self {
        Self {
            decoder: SampleDecoder::new(layout),
            index,
        }
    }

    /// Which benchmark this is.
    pub const fn kind(&self) -> &DatasetKind {
        &self.decoder.layout().kind
    }

    /// The sample index, in access order.
    pub fn descriptors(&self) -> &[SampleDescriptor] {
        &self.index
    }

    /// Number of samples of a category.
    pub fn count(&self, category: Category) -> usize {
        self.index
            .iter()
            .filter(|descriptor| descriptor.category == category)
            .count()
    }

    /// Decode the sample at `index`.
    ///
    /// # Errors
    ///
    /// - `DatasetError::Index` when `index >= len()`.
    /// - Any decoding error, naming the offending file.
    pub fn try_get(&self, index: usize) -> DatasetResult<ForgerySample> {
        let descriptor = self.index.get(index).ok_or_else(|| DatasetError::Index {
            index: i64::try_from(index).unwrap_or(i64::MAX),
            len: self.index.len(),
        })?;
        self.decoder.decode(descriptor)
    }

    /// Decode the sample at a signed `index`; negative indexes are out of range.
    pub fn try_get_signed(&self, index: i64) -> DatasetResult<ForgerySample> {
        let position = usize::try_from(index).map_err(|_| DatasetError::Index {
            index,
            len: self.index.len(),
        })?;
        self.try_get(position)
    }
}

impl Dataset<ForgerySample> for ForgeryDataset {
    /// Decode the sample at `index`, or `None` past the end.
    ///
    /// # Panics
    ///
    /// Panics with the decoding error when the file at `index` cannot be
    /// decoded. `None` ends iteration, so it is reserved for the end of the
    /// index. Use [`ForgeryDataset::try_get`] to handle failures.
    fn get(&self, index: usize) -> Option<ForgerySample> {
        let descriptor = self.index.get(index)?;
        match self.decoder.decode(descriptor) {
            Ok(sample) => Some(sample),
            Err(err) => {
                error!(index, path = %descriptor.path.display(), error = %err, "failed to decode sample");
                panic!("{err}");
            }
        }
    }

    fn len(&self) -> usize {
        self.index.len()
    }
}
