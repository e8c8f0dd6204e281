//! splicebench demos
//!
//! Command-line utilities around the splicebench datasets.
//!
//! ## Available Binaries
//!
//! - `prepare`: download and extract one or more datasets
//! - `dataset_test`: index a prepared dataset and inspect its samples
//!
//! ## Usage
//!
//! ```bash
//! # Fetch and unpack Columbia into data/downloaded/columbia
//! cargo run --bin prepare -- columbia
//!
//! # Inspect the first samples of a prepared dataset
//! cargo run --bin dataset_test -- --dataset columbia --num-samples 5
//! ```

pub mod config;

use anyhow::{bail, Context, Result};
use splicebench::{Manifest, ManifestEntry};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use config::DatasetTestConfig;

/// Install a stderr `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build a manifest from archive URLs, naming each file after the last URL
/// path segment and inferring its compression from that name.
pub fn manifest_from_urls(name: &str, urls: &[String]) -> Result<Manifest> {
    let mut sources = Vec::with_capacity(urls.len());
    for url in urls {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let filename = path.rsplit('/').next().unwrap_or_default();
        if filename.is_empty() {
            bail!("URL {url} does not end in a file name");
        }
        let entry = ManifestEntry::from_url(url.as_str(), filename)
            .with_context(|| format!("Unsupported archive {url}"))?;
        sources.push(entry);
    }

    let manifest = Manifest::new(name.to_string(), sources);
    manifest.validate().map_err(anyhow::Error::msg)?;
    Ok(manifest)
}
