//! Dataset Preparation
//!
//! Downloads, verifies and extracts datasets, then checks that every
//! category holds its documented number of images.
//!
//! ## Usage
//!
//! ```bash
//! # Prepare Columbia using data/raw/columbia/metadata.json
//! cargo run --bin prepare -- columbia
//!
//! # Prepare several datasets under another data root
//! cargo run --bin prepare -- columbia mirflickr_25k --data-root /scratch/data
//!
//! # Write a manifest for a mirror when none exists yet
//! cargo run --bin prepare -- dso_1 --url https://mirror.example/DSO-1.zip
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use burn::prelude::Config;
use clap::Parser;
use splicebench::{
    is_prepared, Category, DatasetConfig, DatasetKind, DatasetPreparer, ForgeryDataset, Manifest,
    PathConfig,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Datasets to prepare (columbia, dso_1, in_the_wild, realistic_tampering, mirflickr_25k)
    #[arg(required = true)]
    datasets: Vec<String>,

    /// Root holding `raw/<name>/metadata.json` and `downloaded/<name>`
    #[arg(long, default_value = "data")]
    data_root: PathBuf,

    /// Archive URL used to write a missing manifest (repeatable, single dataset only)
    #[arg(long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    splicebench_demos::init_logging(&args.log_level);

    if !args.urls.is_empty() && args.datasets.len() != 1 {
        bail!("--url applies to exactly one dataset");
    }
    let preparer = DatasetPreparer::http().context("Failed to create HTTP client")?;

    for name in &args.datasets {
        let kind: DatasetKind = name.parse()?;
        let dir_name = kind.name();
        let config = DatasetConfig::new(kind).with_path(
            PathConfig::new()
                .with_download_dir(Some(args.data_root.join("downloaded").join(dir_name)))
                .with_manifest_path(Some(
                    args.data_root.join("raw").join(dir_name).join("metadata.json"),
                )),
        );

        let download_dir = config.resolved_download_dir();
        let expected_dirs = config.kind.layout().prepared_paths(&download_dir);
        if is_prepared(&expected_dirs) {
            info!(dataset = dir_name, "dataset already prepared");
        } else {
            let manifest = load_or_write_manifest(&config, &args.urls)
                .with_context(|| format!("Failed to get manifest for {name}"))?;
            info!(
                dataset = dir_name,
                archives = ?manifest.filenames().collect::<Vec<_>>(),
                "preparing dataset"
            );
            preparer
                .prepare(&manifest, &download_dir, &expected_dirs)
                .with_context(|| format!("Failed to prepare {name}"))?;
        }

        let dataset = ForgeryDataset::open(&config)
            .with_context(|| format!("Prepared {name} does not match its documented layout"))?;
        info!(
            dataset = dataset.kind().name(),
            authentic = dataset.count(Category::Authentic),
            tampered = dataset.count(Category::Tampered),
            dir = %config.resolved_download_dir().display(),
            "dataset ready"
        );
    }

    Ok(())
}

/// Read the configured manifest, or write one from `urls` when it is missing.
fn load_or_write_manifest(config: &DatasetConfig, urls: &[String]) -> Result<Manifest> {
    let path = config.resolved_manifest_path();
    if path.is_file() || urls.is_empty() {
        return Ok(Manifest::from_file(&path)?);
    }

    let manifest = splicebench_demos::manifest_from_urls(config.kind.name(), urls)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    manifest
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(manifest = %path.display(), "manifest written");
    Ok(manifest)
}
