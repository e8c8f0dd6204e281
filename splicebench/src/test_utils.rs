//! Fixtures shared by the unit tests.

use std::{
    collections::HashMap,
    fs,
    io::{Cursor, Write},
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use image::{ImageFormat, Rgb, RgbImage};

use crate::{
    config::Compression,
    error::{DatasetError, DatasetResult},
    extract::{ArchiveExtractor, Extract},
    fetch::Download,
    manifest::ManifestEntry,
};

/// Serves registered payloads from memory and counts downloads.
#[derive(Default)]
pub struct MemoryDownloader {
    payloads: Mutex<HashMap<String, Vec<u8>>>,
    calls: AtomicUsize,
}

impl MemoryDownloader {
    /// Register `bytes` under `memory://<filename>` and return its manifest entry.
    pub fn serve(&self, filename: &str, bytes: Vec<u8>) -> ManifestEntry {
        let url = format!("memory://{filename}");
        self.payloads.lock().unwrap().insert(url.clone(), bytes);
        let compression = Compression::from_filename(filename).unwrap_or(Compression::None);
        ManifestEntry::new(url, filename.to_string()).with_compression(compression)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Download for MemoryDownloader {
    fn download(&self, entry: &ManifestEntry, destination: &Path) -> DatasetResult<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let payloads = self.payloads.lock().unwrap();
        let bytes = payloads.get(&entry.url).ok_or_else(|| DatasetError::Fetch {
            entry: entry.filename.clone(),
            url: entry.url.clone(),
            reason: "server responded with 404 Not Found".to_string(),
        })?;
        fs::write(destination, bytes).map_err(|e| DatasetError::io(destination, e))?;
        Ok(bytes.len() as u64)
    }
}

/// Delegates to [`ArchiveExtractor`] and counts extractions.
#[derive(Default)]
pub struct CountingExtractor {
    calls: AtomicUsize,
}

impl CountingExtractor {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Extract for CountingExtractor {
    fn extract(
        &self,
        archive: &Path,
        compression: &Compression,
        destination: &Path,
    ) -> DatasetResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ArchiveExtractor.extract(archive, compression, destination)
    }
}

/// Build a tar archive, optionally compressed, holding `files`.
pub fn tar_archive(files: &[(&str, &[u8])], compression: &Compression) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, bytes) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(bytes.len() as u64);
        header.set_mode(0o644);
        builder.append_data(&mut header, name, *bytes).unwrap();
    }
    let tar = builder.into_inner().unwrap();

    match compression {
        Compression::None => tar,
        Compression::Gzip => {
            let mut encoder =
                flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(&tar).unwrap();
            encoder.finish().unwrap()
        }
        Compression::Bzip2 => {
            let mut encoder =
                bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
            encoder.write_all(&tar).unwrap();
            encoder.finish().unwrap()
        }
        Compression::Zip => panic!("use zip_archive for zip fixtures"),
    }
}

/// Build a zip archive holding `files`.
pub fn zip_archive(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    for (name, bytes) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Encode a solid-color RGB image in `format`.
pub fn encoded_image(width: u32, height: u32, color: [u8; 3], format: ImageFormat) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb(color));
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

/// Write a solid-color RGB image, creating parent directories.
pub fn write_image(path: &Path, width: u32, height: u32, color: [u8; 3]) {
    let format = ImageFormat::from_path(path).unwrap();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, encoded_image(width, height, color, format)).unwrap();
}

/// Create empty files `<dir>/<prefix><i>.<extension>` for `i` in `0..count`.
pub fn touch_files(dir: &Path, prefix: &str, extension: &str, count: usize) {
    fs::create_dir_all(dir).unwrap();
    for i in 0..count {
        fs::write(dir.join(format!("{prefix}{i:03}.{extension}")), b"").unwrap();
    }
}
