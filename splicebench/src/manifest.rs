//! Declarative description of the remote archives that make up a raw dataset.
//!
//! Manifests are plain burn [`Config`] structs and therefore load from, and
//! save to, JSON:
//!
//! ```json
//! {
//!   "name": "columbia",
//!   "sources": [
//!     {
//!       "url": "https://example.org/4cam_auth.tar.bz2",
//!       "filename": "4cam_auth.tar.bz2",
//!       "sha256": null,
//!       "compression": "Bzip2"
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use burn::prelude::*;

use crate::{
    config::Compression,
    error::{DatasetError, DatasetResult},
};

/// One remote file of a dataset.
#[derive(Config, Debug)]
pub struct ManifestEntry {
    /// Remote location of the file.
    pub url: String,
    /// Local file name, relative to the download directory.
    pub filename: String,
    /// Optional lowercase hex SHA-256 digest of the file.
    #[config(default = "None")]
    pub sha256: Option<String>,
    /// How the archive is packed.
    #[config(default = "Compression::Bzip2")]
    pub compression: Compression,
}

/// The remote files of a dataset, in download and extraction order.
#[derive(Config, Debug)]
pub struct Manifest {
    /// Dataset name, used in log messages.
    pub name: String,
    /// Remote archives.
    pub sources: Vec<ManifestEntry>,
}

impl ManifestEntry {
    /// Create an entry whose compression is inferred from `filename`.
    ///
    /// # Errors
    ///
    /// Returns `Err(DatasetError::Manifest)` when the extension is not a
    /// known archive format.
    pub fn from_url(url: impl Into<String>, filename: impl Into<String>) -> DatasetResult<Self> {
        let filename = filename.into();
        let compression =
            Compression::from_filename(&filename).ok_or_else(|| DatasetError::Manifest {
                path: filename.clone().into(),
                reason: "cannot infer archive compression from file name".to_string(),
            })?;
        Ok(Self::new(url.into(), filename).with_compression(compression))
    }
}

impl Manifest {
    /// Read a manifest from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `Err(DatasetError::Manifest)` when the file is missing,
    /// unparsable, or fails [`Manifest::validate`].
    pub fn from_file(path: impl AsRef<Path>) -> DatasetResult<Self> {
        let path = path.as_ref();
        let manifest = Self::load(path).map_err(|e| DatasetError::Manifest {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        manifest.validate().map_err(|reason| DatasetError::Manifest {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(manifest)
    }

    /// Local file names in manifest order.
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|entry| entry.filename.as_str())
    }

    /// Check that file names are usable and unique.
    pub fn validate(&self) -> Result<(), String> {
        if self.sources.is_empty() {
            return Err("manifest lists no sources".to_string());
        }
        for (i, entry) in self.sources.iter().enumerate() {
            let name = Path::new(&entry.filename);
            if entry.filename.is_empty() || name.components().count() != 1 {
                return Err(format!(
                    "source {i}: filename '{}' must be a plain file name",
                    entry.filename
                ));
            }
            if self.sources[..i]
                .iter()
                .any(|other| other.filename == entry.filename)
            {
                return Err(format!("source {i}: duplicate filename '{}'", entry.filename));
            }
            if let Some(digest) = &entry.sha256 {
                if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err(format!(
                        "source {i}: sha256 '{digest}' is not a 64 character hex digest"
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(filename: &str) -> ManifestEntry {
        ManifestEntry::new(format!("https://example.org/{filename}"), filename.to_string())
    }

    #[test]
    fn compression_is_inferred_from_filename() {
        let entry = ManifestEntry::from_url("https://example.org/a.tgz", "a.tgz").unwrap();
        assert_eq!(entry.compression, Compression::Gzip);

        let err = ManifestEntry::from_url("https://example.org/a.rar", "a.rar").unwrap_err();
        assert!(matches!(err, DatasetError::Manifest { .. }));
    }

    #[test]
    fn manifest_round_trips_through_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        let manifest = Manifest::new(
            "columbia".to_string(),
            vec![
                entry("4cam_auth.tar.bz2"),
                entry("4cam_splc.tar.bz2").with_sha256(Some("ab".repeat(32))),
            ],
        );
        manifest.save(&path).unwrap();

        let loaded = Manifest::from_file(&path).unwrap();
        assert_eq!(
            loaded.filenames().collect::<Vec<_>>(),
            ["4cam_auth.tar.bz2", "4cam_splc.tar.bz2"]
        );
        assert_eq!(loaded.sources[1].sha256.as_deref(), Some("ab".repeat(32).as_str()));
        assert_eq!(loaded.sources[0].compression, Compression::Bzip2);
    }

    #[test]
    fn missing_manifest_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = Manifest::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Manifest { .. }));
    }

    #[test]
    fn validate_rejects_bad_entries() {
        let nested = Manifest::new("x".to_string(), vec![entry("../escape.tar")]);
        assert!(nested.validate().is_err());

        let duplicate = Manifest::new("x".to_string(), vec![entry("a.tar"), entry("a.tar")]);
        assert!(duplicate.validate().unwrap_err().contains("duplicate"));

        let bad_digest = Manifest::new(
            "x".to_string(),
            vec![entry("a.tar").with_sha256(Some("not-hex".to_string()))],
        );
        assert!(bad_digest.validate().unwrap_err().contains("sha256"));

        assert!(Manifest::new("x".to_string(), vec![]).validate().is_err());
    }

    #[test]
    fn bundled_manifests_are_valid() {
        let raw = Path::new(env!("CARGO_MANIFEST_DIR")).join("../data/raw");
        for name in ["columbia", "mirflickr_25k"] {
            let manifest = Manifest::from_file(raw.join(name).join("metadata.json")).unwrap();
            assert_eq!(manifest.name, name);
            for entry in &manifest.sources {
                assert_eq!(Compression::from_filename(&entry.filename).as_ref(), Some(&entry.compression));
            }
        }
    }
}
