//! `update` command: refresh the local data file from ipsw.me

use anyhow::{Context, Result};
use apple_devices::{Catalog, IpswClient, UpdateConfig, Updater};
use std::path::PathBuf;

use crate::utils::FetchProgress;

/// Resolve the data file: explicit path or the per-user default
pub fn resolve_data_file(data_file: Option<PathBuf>) -> Result<PathBuf> {
    match data_file {
        Some(path) => Ok(path),
        None => Catalog::default_data_path().context("Failed to locate the data directory"),
    }
}

/// Fetch every device and rewrite the data file
pub async fn execute(data_file: Option<PathBuf>, quiet: bool) -> Result<()> {
    let path = resolve_data_file(data_file)?;
    log::info!("Updating {}", path.display());

    let client = IpswClient::new().context("Failed to create HTTP client")?;
    let updater = Updater::new(client, UpdateConfig::new(&path));

    let progress = if quiet {
        FetchProgress::hidden()
    } else {
        FetchProgress::new()
    };

    let report = match updater.run(&progress).await {
        Ok(report) => report,
        Err(e) => {
            progress.abandon();
            return Err(e).context("Update failed, the data file was left unchanged");
        }
    };

    if !quiet {
        println!(
            "Saved {} devices with {} firmwares to {}",
            report.devices,
            report.firmwares,
            report.path.display()
        );
    }

    Ok(())
}
