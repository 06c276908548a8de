//! In-memory device catalog loaded from the local data file

use directories::ProjectDirs;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::device::Device;
use crate::error::{Error, Result};

/// File name of the data file inside the data directory
pub const DATA_FILE_NAME: &str = "data.json";

/// Devices grouped by device type.
///
/// Both the device types and the devices within each type keep the order in
/// which they were first seen. The catalog is immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    groups: Vec<(String, Vec<Device>)>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Load the catalog from a data file written by the updater
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::MissingDataFile {
                path: path.to_path_buf(),
            },
            _ => Error::Io(e),
        })?;

        let catalog = Self::from_reader(BufReader::new(file))?;
        log::debug!(
            "Loaded {} device types from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Load the catalog from the default data file
    pub fn load_default() -> Result<Self> {
        Self::load(Self::default_data_path()?)
    }

    /// Parse a JSON array of devices from a reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let devices: Vec<Device> = serde_json::from_reader(reader)?;
        Ok(Self::from_devices(devices))
    }

    /// Parse a JSON array of devices from a string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let devices: Vec<Device> = serde_json::from_str(json)?;
        Ok(Self::from_devices(devices))
    }

    /// Group devices by their device type
    pub fn from_devices(devices: impl IntoIterator<Item = Device>) -> Self {
        let mut catalog = Self::default();
        for device in devices {
            catalog.insert(device);
        }
        catalog
    }

    fn insert(&mut self, device: Device) {
        let device_type = device.device_type();
        if let Some(&slot) = self.index.get(device_type) {
            self.groups[slot].1.push(device);
        } else {
            let key = device_type.to_string();
            self.index.insert(key.clone(), self.groups.len());
            self.groups.push((key, vec![device]));
        }
    }

    /// Get the default data file path
    pub fn default_data_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "apple-userag") {
            Ok(proj_dirs.data_dir().join(DATA_FILE_NAME))
        } else {
            Err(Error::NoHomeDirectory)
        }
    }

    /// Devices of one type, in load order
    pub fn devices(&self, device_type: &str) -> Result<&[Device]> {
        self.index
            .get(device_type)
            .map(|&slot| self.groups[slot].1.as_slice())
            .ok_or_else(|| Error::UnknownDeviceType(device_type.to_string()))
    }

    /// Iterate over `(device type, devices)` groups
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Device])> {
        self.groups
            .iter()
            .map(|(kind, devices)| (kind.as_str(), devices.as_slice()))
    }

    /// Iterate over every device of every type
    pub fn all_devices(&self) -> impl Iterator<Item = &Device> {
        self.groups.iter().flat_map(|(_, devices)| devices.iter())
    }

    /// Number of device types
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the catalog holds no devices
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
