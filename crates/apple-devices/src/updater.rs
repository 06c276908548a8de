//! Bulk refresh of the local data file from a [`FirmwareSource`]
//!
//! The device list is fetched with one request, then every device's firmware
//! list is requested concurrently. All fetch tasks start at once and share a
//! semaphore, so at most [`UpdateConfig::max_concurrent`] requests are in
//! flight at any time. The first failure aborts the run and leaves the
//! previous data file untouched.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::device::Device;
use crate::error::{Error, Result};
use crate::source::FirmwareSource;

/// Default number of simultaneous per-device requests
pub const DEFAULT_MAX_CONCURRENT: usize = 20;

/// Receives progress notifications while an update runs
pub trait UpdateProgress: Send + Sync {
    /// The device list is known, `total` fetches will follow
    fn started(&self, total: usize);

    /// One device finished fetching
    fn fetched(&self, identifier: &str);

    /// Every fetch completed and the data file was written
    fn finished(&self);
}

/// Progress sink that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl UpdateProgress for NoProgress {
    fn started(&self, _total: usize) {}
    fn fetched(&self, _identifier: &str) {}
    fn finished(&self) {}
}

/// Configuration for an update run
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    max_concurrent: usize,
    /// Data file to (re)write
    pub output_path: PathBuf,
}

impl UpdateConfig {
    /// Configuration writing to `output_path` with the default concurrency
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            output_path: output_path.into(),
        }
    }

    /// Set the concurrency cap, clamped to `1..=Semaphore::MAX_PERMITS`
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.clamp(1, Semaphore::MAX_PERMITS);
        self
    }

    /// Maximum simultaneous per-device requests
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}

/// Summary of a finished update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Devices written
    pub devices: usize,
    /// Firmware records written across all devices
    pub firmwares: usize,
    /// Data file that was replaced
    pub path: PathBuf,
}

/// Refreshes the data file from a firmware source
#[derive(Debug)]
pub struct Updater<S> {
    source: Arc<S>,
    config: UpdateConfig,
}

impl<S: FirmwareSource + 'static> Updater<S> {
    /// Create an updater
    pub fn new(source: S, config: UpdateConfig) -> Self {
        Self::with_shared_source(Arc::new(source), config)
    }

    /// Create an updater over an already shared source
    pub fn with_shared_source(source: Arc<S>, config: UpdateConfig) -> Self {
        Self { source, config }
    }

    /// Active configuration
    pub fn config(&self) -> &UpdateConfig {
        &self.config
    }

    /// Fetch every device and rewrite the data file
    pub async fn run(&self, progress: &dyn UpdateProgress) -> Result<UpdateReport> {
        let devices = self.fetch_all(progress).await?;

        let firmwares = devices.iter().map(|d| d.firmwares().len()).sum();
        write_data_file(&self.config.output_path, &devices)?;
        progress.finished();

        log::info!(
            "Wrote {} devices ({} firmwares) to {}",
            devices.len(),
            firmwares,
            self.config.output_path.display()
        );

        Ok(UpdateReport {
            devices: devices.len(),
            firmwares,
            path: self.config.output_path.clone(),
        })
    }

    /// Fetch every device, in device list order
    pub async fn fetch_all(&self, progress: &dyn UpdateProgress) -> Result<Vec<Device>> {
        let summaries = self.source.list_devices().await?;
        let total = summaries.len();
        log::info!(
            "Fetching firmwares for {} devices ({} at a time)",
            total,
            self.config.max_concurrent()
        );
        progress.started(total);

        let permits = Arc::new(Semaphore::new(self.config.max_concurrent()));
        let mut tasks = JoinSet::new();

        for (slot, summary) in summaries.into_iter().enumerate() {
            let source = Arc::clone(&self.source);
            let permits = Arc::clone(&permits);

            tasks.spawn(async move {
                let _permit = permits
                    .acquire()
                    .await
                    .map_err(|e| Error::Task(format!("semaphore closed: {e}")))?;
                let device = source.fetch_device(&summary.identifier).await?;
                Ok::<_, Error>((slot, device))
            });
        }

        let mut fetched: Vec<Option<Device>> = vec![None; total];
        while let Some(joined) = tasks.join_next().await {
            // Returning early drops the JoinSet, which aborts the remaining tasks
            let (slot, device) = joined.map_err(|e| Error::Task(e.to_string()))??;
            log::debug!(
                "Fetched {} firmwares for {}",
                device.firmwares().len(),
                device.identifier()
            );
            progress.fetched(device.identifier());
            fetched[slot] = Some(device);
        }

        Ok(fetched.into_iter().flatten().collect())
    }
}

/// Serialize devices as a 4-space indented JSON array, newline-terminated
fn to_json_pretty(devices: &[Device]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    devices.serialize(&mut serializer)?;
    out.push(b'\n');
    Ok(out)
}

/// Atomically replace `path` with the serialized devices.
///
/// The data goes to a temporary file in the same directory first, which is
/// then renamed over `path`.
pub fn write_data_file(path: &Path, devices: &[Device]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;

    let json = to_json_pretty(devices)?;
    let mut temp = NamedTempFile::new_in(&dir)?;
    temp.write_all(&json)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    log::debug!("Replaced {}", path.display());
    Ok(())
}
