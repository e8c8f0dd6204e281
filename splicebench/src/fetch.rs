//! Archive fetching: makes sure every file listed in a manifest exists locally.

use std::{
    fs::{self, File},
    io::{self, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::{
    error::{DatasetError, DatasetResult},
    manifest::{Manifest, ManifestEntry},
};

/// Transfers one remote file to a local path.
///
/// Implementations must not retry; failures are reported as
/// [`DatasetError::Fetch`].
pub trait Download {
    /// Download `entry` to `destination` and return the number of bytes written.
    fn download(&self, entry: &ManifestEntry, destination: &Path) -> DatasetResult<u64>;
}

/// Blocking HTTP(S) downloader.
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: reqwest::blocking::Client,
}

impl HttpDownloader {
    /// Connection timeout used by [`HttpDownloader::new`].
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
    /// Whole-transfer timeout used by [`HttpDownloader::new`]. Archives reach several GB.
    pub const TRANSFER_TIMEOUT: Duration = Duration::from_secs(4 * 60 * 60);

    /// Create a downloader with the default timeouts.
    ///
    /// # Errors
    ///
    /// Returns `Err(DatasetError::InvalidConfiguration)` if the HTTP client
    /// cannot be initialized.
    pub fn new() -> DatasetResult<Self> {
        Self::with_timeouts(Self::CONNECT_TIMEOUT, Self::TRANSFER_TIMEOUT)
    }

    /// Create a downloader with custom timeouts.
    pub fn with_timeouts(connect: Duration, transfer: Duration) -> DatasetResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(connect)
            .timeout(transfer)
            .user_agent(concat!("splicebench/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DatasetError::InvalidConfiguration {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

impl Download for HttpDownloader {
    fn download(&self, entry: &ManifestEntry, destination: &Path) -> DatasetResult<u64> {
        let fetch_error = |reason: String| DatasetError::Fetch {
            entry: entry.filename.clone(),
            url: entry.url.clone(),
            reason,
        };

        let mut response = self
            .client
            .get(&entry.url)
            .send()
            .map_err(|e| fetch_error(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("server responded with {status}")));
        }

        // Stream into a sibling file so an interrupted transfer never looks complete.
        let partial = partial_path(destination);
        let mut file = File::create(&partial)
            .map_err(|e| fetch_error(format!("failed to create {}: {e}", partial.display())))?;
        let written = match response.copy_to(&mut file) {
            Ok(written) => written,
            Err(e) => {
                drop(file);
                let _ = fs::remove_file(&partial);
                return Err(fetch_error(e.to_string()));
            }
        };
        if let Err(e) = file.sync_all() {
            drop(file);
            let _ = fs::remove_file(&partial);
            return Err(fetch_error(format!("failed to write {}: {e}", partial.display())));
        }
        drop(file);
        fs::rename(&partial, destination).map_err(|e| {
            fetch_error(format!(
                "failed to move {} to {}: {e}",
                partial.display(),
                destination.display()
            ))
        })?;

        Ok(written)
    }
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    destination.with_file_name(name)
}

/// Ensure every manifest entry exists under `destination_dir`.
///
/// Files already on disk are not downloaded again. Entries with a checksum
/// are verified whether they were just downloaded or already present.
///
/// # Returns
///
/// The local path of every entry, in manifest order.
///
/// # Errors
///
/// - `DatasetError::Fetch` when a download fails.
/// - `DatasetError::Integrity` when a checksum does not match. The file is
///   left in place.
/// - `DatasetError::Io` when `destination_dir` cannot be created.
pub fn ensure_downloaded<D: Download + ?Sized>(
    downloader: &D,
    manifest: &Manifest,
    destination_dir: &Path,
) -> DatasetResult<Vec<PathBuf>> {
    fs::create_dir_all(destination_dir).map_err(|e| DatasetError::io(destination_dir, e))?;

    let mut paths = Vec::with_capacity(manifest.sources.len());
    for entry in &manifest.sources {
        let path = destination_dir.join(&entry.filename);

        if path.is_file() {
            debug!(dataset = %manifest.name, file = %path.display(), "archive already downloaded");
        } else {
            info!(dataset = %manifest.name, url = %entry.url, "downloading archive");
            let bytes = downloader.download(entry, &path)?;
            info!(dataset = %manifest.name, file = %path.display(), bytes, "download finished");
        }

        if let Some(expected) = &entry.sha256 {
            verify_checksum(&path, expected)?;
        }
        paths.push(path);
    }

    Ok(paths)
}

/// Lowercase hex SHA-256 digest of a file.
pub fn sha256_file(path: impl AsRef<Path>) -> DatasetResult<String> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| DatasetError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher).map_err(|e| DatasetError::io(path, e))?;
    Ok(hex::encode(hasher.finalize()))
}

/// Compare a file against an expected SHA-256 digest (case-insensitive).
pub fn verify_checksum(path: impl AsRef<Path>, expected: &str) -> DatasetResult<()> {
    let path = path.as_ref();
    let actual = sha256_file(path)?;
    if !actual.eq_ignore_ascii_case(expected) {
        warn!(file = %path.display(), expected, actual = %actual, "checksum mismatch");
        return Err(DatasetError::Integrity {
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{
        io::{Read, Write},
        net::{SocketAddr, TcpListener},
        thread,
    };

    use super::*;
    use crate::test_utils::MemoryDownloader;

    /// Answer a single HTTP request on a local port with a canned response.
    fn serve_once(response: &'static str) -> (SocketAddr, thread::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = stream.write_all(response.as_bytes());
        });
        (addr, handle)
    }

    fn local_downloader() -> HttpDownloader {
        HttpDownloader::with_timeouts(Duration::from_secs(2), Duration::from_secs(5)).unwrap()
    }

    fn manifest_for(downloader: &MemoryDownloader, files: &[(&str, &[u8])]) -> Manifest {
        let sources = files
            .iter()
            .map(|(name, bytes)| downloader.serve(name, bytes.to_vec()))
            .collect();
        Manifest::new("test".to_string(), sources)
    }

    #[test]
    fn downloads_missing_files_and_creates_destination() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("nested").join("downloads");
        let downloader = MemoryDownloader::default();
        let manifest = manifest_for(&downloader, &[("a.tar", b"alpha"), ("b.tar", b"beta")]);

        let paths = ensure_downloaded(&downloader, &manifest, &destination).unwrap();

        assert_eq!(paths, [destination.join("a.tar"), destination.join("b.tar")]);
        assert_eq!(fs::read(&paths[1]).unwrap(), b"beta");
        assert_eq!(downloader.calls(), 2);
    }

    #[test]
    fn existing_files_are_not_downloaded_again() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = MemoryDownloader::default();
        let manifest = manifest_for(&downloader, &[("a.tar", b"alpha")]);
        fs::write(dir.path().join("a.tar"), b"already here").unwrap();

        ensure_downloaded(&downloader, &manifest, dir.path()).unwrap();

        assert_eq!(downloader.calls(), 0);
        assert_eq!(fs::read(dir.path().join("a.tar")).unwrap(), b"already here");
    }

    #[test]
    fn checksum_mismatch_keeps_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = MemoryDownloader::default();
        let mut manifest = manifest_for(&downloader, &[("a.tar", b"alpha")]);
        manifest.sources[0].sha256 = Some("0".repeat(64));

        let err = ensure_downloaded(&downloader, &manifest, dir.path()).unwrap_err();

        match err {
            DatasetError::Integrity { path, actual, .. } => {
                assert_eq!(path, dir.path().join("a.tar"));
                assert_eq!(actual, sha256_file(&path).unwrap());
            }
            other => panic!("Expected Integrity error, got {other:?}"),
        }
        assert!(dir.path().join("a.tar").exists());
    }

    #[test]
    fn matching_checksum_passes_in_any_case() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = MemoryDownloader::default();
        let mut manifest = manifest_for(&downloader, &[("a.tar", b"abc")]);
        // SHA-256("abc")
        manifest.sources[0].sha256 = Some(
            "BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD".to_string(),
        );

        assert!(ensure_downloaded(&downloader, &manifest, dir.path()).is_ok());
    }

    #[test]
    fn fetch_failure_names_the_entry() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = MemoryDownloader::default();
        let manifest = Manifest::new(
            "test".to_string(),
            vec![ManifestEntry::new(
                "memory://missing.tar".to_string(),
                "missing.tar".to_string(),
            )],
        );

        match ensure_downloaded(&downloader, &manifest, dir.path()) {
            Err(DatasetError::Fetch { entry, .. }) => assert_eq!(entry, "missing.tar"),
            other => panic!("Expected Fetch error, got {other:?}"),
        }
        assert!(!dir.path().join("missing.tar").exists());
    }

    #[test]
    fn partial_path_appends_suffix() {
        assert_eq!(
            partial_path(Path::new("/data/4cam_auth.tar.bz2")),
            Path::new("/data/4cam_auth.tar.bz2.part")
        );
    }

    #[test]
    fn unreachable_host_is_a_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let downloader =
            HttpDownloader::with_timeouts(Duration::from_millis(200), Duration::from_secs(1))
                .unwrap();
        let entry = ManifestEntry::new(
            "http://127.0.0.1:9/archive.tar".to_string(),
            "archive.tar".to_string(),
        );

        let err = downloader
            .download(&entry, &dir.path().join("archive.tar"))
            .unwrap_err();
        assert!(matches!(err, DatasetError::Fetch { .. }));
        assert!(!dir.path().join("archive.tar").exists());
    }

    #[test]
    fn error_status_is_a_fetch_error_and_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let (addr, server) =
            serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        let entry = ManifestEntry::new(format!("http://{addr}/a.tar"), "a.tar".to_string());

        let err = local_downloader()
            .download(&entry, &dir.path().join("a.tar"))
            .unwrap_err();
        server.join().unwrap();

        match err {
            DatasetError::Fetch { entry, reason, .. } => {
                assert_eq!(entry, "a.tar");
                assert!(reason.contains("404"), "unexpected reason: {reason}");
            }
            other => panic!("Expected Fetch error, got {other:?}"),
        }
        assert!(!dir.path().join("a.tar").exists());
        assert!(!dir.path().join("a.tar.part").exists());
    }

    #[test]
    fn successful_response_is_written_without_partial_leftover() {
        let dir = tempfile::tempdir().unwrap();
        let (addr, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nalpha",
        );
        let entry = ManifestEntry::new(format!("http://{addr}/a.tar"), "a.tar".to_string());
        let destination = dir.path().join("a.tar");

        let written = local_downloader().download(&entry, &destination).unwrap();
        server.join().unwrap();

        assert_eq!(written, 5);
        assert_eq!(fs::read(&destination).unwrap(), b"alpha");
        assert!(!dir.path().join("a.tar.part").exists());
    }

    #[test]
    fn unwritable_destination_is_a_fetch_error_naming_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let (addr, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nalpha",
        );
        let entry = ManifestEntry::new(format!("http://{addr}/a.tar"), "a.tar".to_string());
        let destination = dir.path().join("missing").join("a.tar");

        let err = local_downloader().download(&entry, &destination).unwrap_err();
        let _ = server.join();

        match err {
            DatasetError::Fetch { reason, .. } => {
                assert!(reason.contains("a.tar.part"), "unexpected reason: {reason}");
            }
            other => panic!("Expected Fetch error, got {other:?}"),
        }
    }
}
