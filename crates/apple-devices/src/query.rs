//! Queries answered from a loaded [`Catalog`]

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::catalog::Catalog;
use crate::device::Device;
use crate::error::{Error, Result};

/// Days without a new firmware after which a device counts as outdated
pub const DEFAULT_OUTDATED_DAYS: u32 = 365;

impl Catalog {
    /// Device types present in the catalog, in load order
    pub fn available_device_types(&self) -> Vec<&str> {
        self.iter().map(|(kind, _)| kind).collect()
    }

    /// Devices of `device_type` that got a firmware within the last `days` days
    ///
    /// # Examples
    ///
    /// ```
    /// use apple_devices::Catalog;
    ///
    /// let catalog = Catalog::from_json_str(
    ///     r#"[{"name": "iPhone 2G", "identifier": "iPhone1,1", "firmwares": []}]"#,
    /// ).unwrap();
    ///
    /// assert!(catalog.non_outdated_devices("iPhone", 365).unwrap().is_empty());
    /// assert!(catalog.non_outdated_devices("Toaster", 365).is_err());
    /// ```
    pub fn non_outdated_devices(&self, device_type: &str, days: u32) -> Result<Vec<&Device>> {
        self.non_outdated_devices_at(device_type, days, Utc::now())
    }

    /// Like [`Catalog::non_outdated_devices`], measured from `now`
    pub fn non_outdated_devices_at(
        &self,
        device_type: &str,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<&Device>> {
        Ok(self
            .devices(device_type)?
            .iter()
            .filter(|device| !device.is_outdated_at(days, now))
            .collect())
    }

    /// A random non-outdated device of `device_type`
    pub fn random_non_outdated_device(&self, device_type: &str, days: u32) -> Result<&Device> {
        self.random_non_outdated_device_with(device_type, days, Utc::now(), &mut rand::rng())
    }

    /// A random non-outdated device, measured from `now` and drawn from `rng`
    pub fn random_non_outdated_device_with<R: Rng + ?Sized>(
        &self,
        device_type: &str,
        days: u32,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<&Device> {
        let candidates = self.non_outdated_devices_at(device_type, days, now)?;
        candidates
            .choose(rng)
            .copied()
            .ok_or_else(|| Error::EmptySelection {
                device_type: device_type.to_string(),
            })
    }
}
