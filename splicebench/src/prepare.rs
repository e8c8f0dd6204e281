//! Dataset preparation: fetch and extract a dataset unless it is already on disk.
//!
//! Readiness is decided by directory presence only. Once the expected
//! directories exist the dataset is assumed correct and no network or disk
//! I/O happens on later calls. Preparation assumes a single writer; running
//! it from several processes at once is not supported.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    config::DatasetConfig,
    error::{DatasetError, DatasetResult},
    extract::{ArchiveExtractor, Extract},
    fetch::{ensure_downloaded, Download, HttpDownloader},
    manifest::Manifest,
};

/// Whether every directory in `expected_dirs` exists.
pub fn is_prepared(expected_dirs: &[PathBuf]) -> bool {
    expected_dirs.iter().all(|dir| dir.is_dir())
}

/// Orchestrates download and extraction of a dataset.
#[derive(Debug, Clone)]
pub struct DatasetPreparer<D = HttpDownloader, E = ArchiveExtractor> {
    downloader: D,
    extractor: E,
}

impl DatasetPreparer {
    /// Preparer that downloads over HTTP and extracts tar/zip archives.
    pub fn http() -> DatasetResult<Self> {
        Ok(Self::new(HttpDownloader::new()?, ArchiveExtractor))
    }
}

impl<D: Download, E: Extract> DatasetPreparer<D, E> {
    /// Create a preparer from its two collaborators.
    pub const fn new(downloader: D, extractor: E) -> Self {
        Self {
            downloader,
            extractor,
        }
    }

    /// The downloader in use.
    pub const fn downloader(&self) -> &D {
        &self.downloader
    }

    /// The extractor in use.
    pub const fn extractor(&self) -> &E {
        &self.extractor
    }

    /// Make the dataset described by `manifest` available under `download_dir`.
    ///
    /// Returns immediately when every directory in `expected_dirs` exists.
    /// Otherwise downloads missing archives and extracts all of them in
    /// manifest order. A failed extraction leaves earlier archives
    /// extracted; the next call starts again from the download step and
    /// reuses archives already on disk.
    ///
    /// # Errors
    ///
    /// Propagates `Fetch`, `Integrity` and `Extraction` errors. Also returns
    /// `DatasetError::Extraction` when the archives did not produce every
    /// expected directory.
    pub fn prepare(
        &self,
        manifest: &Manifest,
        download_dir: &Path,
        expected_dirs: &[PathBuf],
    ) -> DatasetResult<()> {
        if is_prepared(expected_dirs) {
            debug!(dataset = %manifest.name, "dataset already prepared");
            return Ok(());
        }

        let archives = ensure_downloaded(&self.downloader, manifest, download_dir)?;

        info!(dataset = %manifest.name, archives = archives.len(), "unpacking dataset");
        for (entry, archive) in manifest.sources.iter().zip(&archives) {
            self.extractor
                .extract(archive, &entry.compression, download_dir)?;
        }

        if let Some(missing) = expected_dirs.iter().find(|dir| !dir.is_dir()) {
            return Err(DatasetError::Extraction {
                archive: archives.last().cloned().unwrap_or_default(),
                reason: format!(
                    "archives did not produce expected directory {}",
                    missing.display()
                ),
            });
        }

        info!(dataset = %manifest.name, dir = %download_dir.display(), "dataset prepared");
        Ok(())
    }

    /// Prepare the dataset selected by `config`.
    ///
    /// The manifest is only read when the dataset is not ready yet.
    pub fn prepare_config(&self, config: &DatasetConfig) -> DatasetResult<()> {
        let download_dir = config.resolved_download_dir();
        let expected_dirs = config.kind.layout().prepared_paths(&download_dir);
        if is_prepared(&expected_dirs) {
            debug!(dataset = config.kind.name(), "dataset already prepared");
            return Ok(());
        }

        let manifest = Manifest::from_file(config.resolved_manifest_path())?;
        self.prepare(&manifest, &download_dir, &expected_dirs)
    }
}
