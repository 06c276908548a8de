//! Apple device and firmware catalog backed by [ipsw.me](https://ipsw.me) metadata.
//!
//! The catalog is loaded once from a local JSON data file and answers simple
//! queries: which device types exist, which devices still receive firmware
//! updates, and random picks among them. The data file is refreshed by the
//! [`Updater`], which fetches every device's firmware list concurrently.
//!
//! # Examples
//!
//! ```no_run
//! use apple_devices::{Catalog, DEFAULT_OUTDATED_DAYS};
//!
//! # fn main() -> apple_devices::Result<()> {
//! let catalog = Catalog::load_default()?;
//! for device_type in catalog.available_device_types() {
//!     let current = catalog.non_outdated_devices(device_type, DEFAULT_OUTDATED_DAYS)?;
//!     println!("{device_type}: {} current devices", current.len());
//! }
//!
//! let phone = catalog.random_non_outdated_device("iPhone", DEFAULT_OUTDATED_DAYS)?;
//! println!("{} runs {}", phone.name(), phone.os_name()?);
//! # Ok(())
//! # }
//! ```

#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod catalog;
pub mod device;
pub mod error;
pub mod firmware;
pub mod query;
pub mod source;
pub mod updater;

pub use catalog::{Catalog, DATA_FILE_NAME};
pub use device::{Device, device_type_of, os_name_for_device_type};
pub use error::{Error, Result};
pub use firmware::Firmware;
pub use query::DEFAULT_OUTDATED_DAYS;
#[cfg(feature = "http")]
pub use source::IpswClient;
pub use source::{DEFAULT_BASE_URL, DeviceSummary, FirmwareSource, IpswConfig};
pub use updater::{
    DEFAULT_MAX_CONCURRENT, NoProgress, UpdateConfig, UpdateProgress, UpdateReport, Updater,
    write_data_file,
};
