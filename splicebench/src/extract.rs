//! Archive extraction.
//!
//! Extraction is not idempotent on its own: unpacking twice overwrites the
//! first result. Callers decide whether extraction is needed at all.

use std::{
    fs::{self, File},
    io::{BufReader, Read, Seek},
    path::Path,
};

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use tar::Archive;
use tracing::info;
use zip::ZipArchive;

use crate::{
    config::Compression,
    error::{DatasetError, DatasetResult},
};

/// Unpacks a downloaded archive into a directory.
pub trait Extract {
    /// Extract `archive` into `destination`, preserving its internal layout.
    fn extract(
        &self,
        archive: &Path,
        compression: &Compression,
        destination: &Path,
    ) -> DatasetResult<()>;
}

/// Extractor for tar (plain, gzip, bzip2) and zip archives.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveExtractor;

impl Extract for ArchiveExtractor {
    fn extract(
        &self,
        archive: &Path,
        compression: &Compression,
        destination: &Path,
    ) -> DatasetResult<()> {
        fs::create_dir_all(destination).map_err(|e| DatasetError::io(destination, e))?;
        let file = File::open(archive).map_err(|e| DatasetError::io(archive, e))?;
        let reader = BufReader::new(file);

        info!(archive = %archive.display(), ?compression, "extracting archive");
        let result = match compression {
            Compression::None => unpack_tar(reader, destination),
            Compression::Gzip => unpack_tar(GzDecoder::new(reader), destination),
            Compression::Bzip2 => unpack_tar(BzDecoder::new(reader), destination),
            Compression::Zip => unpack_zip(reader, destination),
        };

        result.map_err(|reason| DatasetError::Extraction {
            archive: archive.to_path_buf(),
            reason,
        })
    }
}

fn unpack_tar<R: Read>(reader: R, destination: &Path) -> Result<(), String> {
    Archive::new(reader)
        .unpack(destination)
        .map_err(|e| e.to_string())
}

fn unpack_zip<R: Read + Seek>(reader: R, destination: &Path) -> Result<(), String> {
    let mut archive = ZipArchive::new(reader).map_err(|e| e.to_string())?;
    archive.extract(destination).map_err(|e| e.to_string())
}
