//! Error handling for catalog queries and updates

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading, querying or updating the device catalog
#[derive(Debug, Error)]
pub enum Error {
    /// The local data file does not exist yet
    #[error(
        "Data file {} is missing, run `apple-userag update` to download it",
        .path.display()
    )]
    MissingDataFile {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The catalog has no devices of the requested type
    #[error("Unknown device type '{0}', see `available_device_types()` for the known ones")]
    UnknownDeviceType(String),

    /// No operating system name is known for the device type
    #[error("No OS name exists for device type '{0}'")]
    UnknownOsMapping(String),

    /// A random pick was requested from an empty candidate set
    #[error("No non-outdated '{device_type}' device to choose from")]
    EmptySelection {
        /// Device type the selection was made for
        device_type: String,
    },

    /// Transport-level HTTP failure (connect, timeout, body decoding)
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote service answered with a non-success status
    #[error("Request to {url} failed with status {status}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// A fetch task panicked or was cancelled
    #[error("Fetch task failed: {0}")]
    Task(String),

    /// User's home directory could not be determined
    #[error("Home directory not found")]
    NoHomeDirectory,

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Type alias for Results from catalog operations
pub type Result<T> = std::result::Result<T, Error>;
