//! Apple hardware devices and their firmware history

use chrono::{DateTime, TimeDelta, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{Error, Result};
use crate::firmware::Firmware;

/// Device type to operating system name
const OS_NAMES: &[(&str, &str)] = &[
    ("iPhone", "iOS"),
    ("iPad", "iPadOS"),
    ("Watch", "watchOS"),
    ("AppleTV", "tvOS"),
    ("MacBookPro", "MacOS"),
    ("MacBookAir", "MacOS"),
    ("Macmini", "MacOS"),
    ("iMac", "MacOS"),
    ("Mac", "MacOS"),
];

/// Return the OS name for a device type, e.g. `iPhone` -> `iOS`
///
/// # Examples
///
/// ```
/// use apple_devices::os_name_for_device_type;
///
/// assert_eq!(os_name_for_device_type("iPhone").unwrap(), "iOS");
/// assert!(os_name_for_device_type("Toaster").is_err());
/// ```
pub fn os_name_for_device_type(device_type: &str) -> Result<&'static str> {
    OS_NAMES
        .iter()
        .find(|(kind, _)| *kind == device_type)
        .map(|(_, os)| *os)
        .ok_or_else(|| Error::UnknownOsMapping(device_type.to_string()))
}

/// Leading run of `identifier` up to the first numeric character
pub fn device_type_of(identifier: &str) -> &str {
    identifier
        .find(char::is_numeric)
        .map_or(identifier, |end| &identifier[..end])
}

/// One hardware model and every firmware ever published for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    name: String,
    identifier: String,
    firmwares: Vec<Firmware>,
    /// Fields kept verbatim from ipsw.me (`boardconfig`, `cpid`, ...)
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Device {
    /// Create a device record
    pub fn new(
        name: impl Into<String>,
        identifier: impl Into<String>,
        firmwares: Vec<Firmware>,
    ) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            firmwares,
            extra: Map::new(),
        }
    }

    /// Marketing name, e.g. `iPhone 4 (GSM)`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Model identifier, e.g. `iPhone4,1` or `MacBookPro18,4`
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Upstream fields not modelled above
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Product family derived from the identifier, e.g. `iPhone`
    pub fn device_type(&self) -> &str {
        device_type_of(&self.identifier)
    }

    /// OS name for this device's type
    pub fn os_name(&self) -> Result<&'static str> {
        os_name_for_device_type(self.device_type())
    }

    /// Every firmware ever available on the device, in source order
    pub fn firmwares(&self) -> &[Firmware] {
        &self.firmwares
    }

    /// Firmwares Apple still signs
    pub fn signed_firmwares(&self) -> impl Iterator<Item = &Firmware> {
        self.firmwares.iter().filter(|firmware| firmware.is_signed())
    }

    /// The first firmware released for the device.
    ///
    /// A later entry only replaces the current pick when it was strictly
    /// released before it, so undated entries and ties never displace it.
    pub fn first_firmware(&self) -> Option<&Firmware> {
        self.firmwares.iter().reduce(|best, candidate| {
            if candidate.released_before(best) {
                candidate
            } else {
                best
            }
        })
    }

    /// The latest firmware released for the device
    pub fn latest_firmware(&self) -> Option<&Firmware> {
        self.firmwares.iter().reduce(|best, candidate| {
            if candidate.released_after(best) {
                candidate
            } else {
                best
            }
        })
    }

    /// A random firmware the device ever supported
    pub fn random_firmware(&self) -> Option<&Firmware> {
        self.random_firmware_with(&mut rand::rng())
    }

    /// A random firmware, drawn from the given generator
    pub fn random_firmware_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Firmware> {
        self.firmwares.choose(rng)
    }

    /// A random firmware that is still signed, if any
    pub fn random_signed_firmware(&self) -> Option<&Firmware> {
        self.random_signed_firmware_with(&mut rand::rng())
    }

    /// A random signed firmware, drawn from the given generator
    pub fn random_signed_firmware_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Firmware> {
        let signed: Vec<&Firmware> = self.signed_firmwares().collect();
        signed.choose(rng).copied()
    }

    /// Whether no dated firmware was released within the last `days` days
    pub fn is_outdated(&self, days: u32) -> bool {
        self.is_outdated_at(days, Utc::now())
    }

    /// Like [`Device::is_outdated`], measured from `now`.
    ///
    /// A device without any dated firmware is always outdated.
    pub fn is_outdated_at(&self, days: u32, now: DateTime<Utc>) -> bool {
        let threshold = now
            .checked_sub_signed(TimeDelta::days(i64::from(days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        self.firmwares
            .iter()
            .filter_map(Firmware::release_date)
            .all(|released| released < threshold)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {} firmwares)",
            self.name,
            self.identifier,
            self.firmwares.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use test_case::test_case;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
    }

    fn firmware(version: &str, released: Option<DateTime<Utc>>, signed: bool) -> Firmware {
        Firmware::new(version, format!("{version}b"), released, at(2020, 1, 1), signed)
    }

    fn iphone(firmwares: Vec<Firmware>) -> Device {
        Device::new("iPhone 13 Pro", "iPhone14,2", firmwares)
    }

    #[test_case("iPhone14,2", "iPhone" ; "iphone")]
    #[test_case("MacBookPro18,4", "MacBookPro" ; "macbook pro")]
    #[test_case("Watch6,1", "Watch" ; "watch")]
    #[test_case("AudioAccessory5,1", "AudioAccessory" ; "homepod")]
    #[test_case("VirtualMac2,1", "VirtualMac" ; "virtual mac")]
    #[test_case("ADP3,2", "ADP" ; "developer kit")]
    #[test_case("NoDigits", "NoDigits" ; "no digits")]
    #[test_case("", "" ; "empty")]
    fn test_device_type_of(identifier: &str, expected: &str) {
        assert_eq!(device_type_of(identifier), expected);
    }

    #[test_case("iPhone", "iOS")]
    #[test_case("iPad", "iPadOS")]
    #[test_case("Watch", "watchOS")]
    #[test_case("AppleTV", "tvOS")]
    #[test_case("MacBookPro", "MacOS")]
    #[test_case("MacBookAir", "MacOS")]
    #[test_case("Macmini", "MacOS")]
    #[test_case("iMac", "MacOS")]
    #[test_case("Mac", "MacOS")]
    fn test_os_name_for_device_type(device_type: &str, expected: &str) {
        assert_eq!(os_name_for_device_type(device_type).unwrap(), expected);
    }

    #[test]
    fn test_os_name_unknown() {
        for device_type in ["Toaster", "iPod", "iphone", ""] {
            let err = os_name_for_device_type(device_type).unwrap_err();
            assert!(matches!(err, Error::UnknownOsMapping(ref kind) if kind == device_type));
        }
    }

    #[test]
    fn test_first_and_latest_firmware() {
        let device = iphone(vec![
            firmware("15.1", Some(at(2021, 10, 25)), false),
            firmware("15.0", Some(at(2021, 9, 20)), false),
            firmware("17.0", Some(at(2023, 9, 18)), true),
            firmware("16.0", Some(at(2022, 9, 12)), false),
        ]);

        assert_eq!(device.first_firmware().unwrap().version(), "15.0");
        assert_eq!(device.latest_firmware().unwrap().version(), "17.0");
    }

    #[test]
    fn test_first_and_latest_skip_over_undated() {
        // An undated firmware at the head is never displaced by a strict comparison
        let device = iphone(vec![
            firmware("1.0", None, false),
            firmware("2.0", Some(at(2008, 7, 11)), false),
            firmware("3.0", Some(at(2009, 6, 17)), false),
        ]);
        assert_eq!(device.first_firmware().unwrap().version(), "1.0");
        assert_eq!(device.latest_firmware().unwrap().version(), "1.0");

        let device = iphone(vec![
            firmware("2.0", Some(at(2008, 7, 11)), false),
            firmware("1.0", None, false),
            firmware("3.0", Some(at(2009, 6, 17)), false),
        ]);
        assert_eq!(device.first_firmware().unwrap().version(), "2.0");
        assert_eq!(device.latest_firmware().unwrap().version(), "3.0");
    }

    #[test]
    fn test_first_and_latest_empty() {
        let device = iphone(Vec::new());
        assert!(device.first_firmware().is_none());
        assert!(device.latest_firmware().is_none());
        assert!(device.random_firmware().is_none());
        assert!(device.random_signed_firmware().is_none());
    }

    #[test]
    fn test_random_firmware_comes_from_device() {
        let device = iphone(vec![
            firmware("15.0", Some(at(2021, 9, 20)), false),
            firmware("16.0", Some(at(2022, 9, 12)), true),
            firmware("17.0", Some(at(2023, 9, 18)), true),
        ]);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..32 {
            let picked = device.random_firmware_with(&mut rng).unwrap();
            assert!(device.firmwares().contains(picked));

            let signed = device.random_signed_firmware_with(&mut rng).unwrap();
            assert!(signed.is_signed());
        }
    }

    #[test]
    fn test_random_signed_firmware_none_signed() {
        let device = iphone(vec![firmware("15.0", Some(at(2021, 9, 20)), false)]);
        assert!(device.random_signed_firmware().is_none());
    }

    #[test]
    fn test_is_outdated_threshold() {
        let now = at(2024, 1, 1);
        let device = iphone(vec![
            firmware("16.0", Some(at(2022, 9, 12)), false),
            firmware("17.0", Some(at(2023, 9, 18)), true),
        ]);

        assert!(!device.is_outdated_at(365, now));
        assert!(device.is_outdated_at(30, now));
    }

    #[test]
    fn test_is_outdated_released_exactly_now() {
        let now = at(2024, 1, 1);
        let device = iphone(vec![firmware("17.2", Some(now), true)]);

        // Strict comparison: released at the threshold is still current
        assert!(!device.is_outdated_at(0, now));
    }

    #[test]
    fn test_is_outdated_all_undated() {
        let device = iphone(vec![firmware("1.0", None, false), firmware("1.1", None, false)]);
        for days in [0, 1, 365, u32::MAX] {
            assert!(device.is_outdated_at(days, at(2024, 1, 1)));
        }
        assert!(iphone(Vec::new()).is_outdated(365));
    }

    #[test]
    fn test_is_outdated_huge_threshold_does_not_overflow() {
        let device = iphone(vec![firmware("1.0", Some(at(2007, 6, 29)), false)]);
        assert!(!device.is_outdated_at(u32::MAX, at(2024, 1, 1)));
    }

    #[test]
    fn test_deserialize_keeps_unknown_fields() {
        let json = r#"{
            "name": "iPhone 2G",
            "identifier": "iPhone1,1",
            "boardconfig": "m68ap",
            "platform": "s5l8900x",
            "cpid": 35072,
            "bdid": 0,
            "firmwares": [
                {
                    "identifier": "iPhone1,1",
                    "version": "3.1.3",
                    "buildid": "7E18",
                    "releasedate": "2010-02-02T18:06:40Z",
                    "uploaddate": "2010-02-02T18:06:40Z",
                    "signed": false
                }
            ]
        }"#;

        let device: Device = serde_json::from_str(json).unwrap();
        assert_eq!(device.name(), "iPhone 2G");
        assert_eq!(device.device_type(), "iPhone");
        assert_eq!(device.os_name().unwrap(), "iOS");
        assert_eq!(device.firmwares().len(), 1);
        assert_eq!(device.firmwares()[0].build_id(), "7E18");
        assert_eq!(device.extra()["boardconfig"], "m68ap");
        assert_eq!(device.extra()["cpid"], 35072);

        let value = serde_json::to_value(&device).unwrap();
        assert_eq!(value["platform"], "s5l8900x");
        assert_eq!(value["firmwares"][0]["identifier"], "iPhone1,1");
    }

    #[test]
    fn test_display() {
        let device = iphone(vec![firmware("17.0", None, true)]);
        assert_eq!(device.to_string(), "iPhone 13 Pro (iPhone14,2, 1 firmwares)");
    }

    proptest! {
        #[test]
        fn prop_device_type_is_leading_non_digit_prefix(
            prefix in "[A-Za-z]{0,12}",
            major in 0u32..100,
            minor in 0u32..10,
        ) {
            let identifier = format!("{prefix}{major},{minor}");
            let device = Device::new("any", identifier.clone(), Vec::new());

            prop_assert_eq!(device.device_type(), prefix.as_str());
            prop_assert!(identifier.starts_with(device.device_type()));
            prop_assert!(!device.device_type().chars().any(char::is_numeric));
        }

        #[test]
        fn prop_first_and_latest_belong_to_device(
            days in proptest::collection::vec(proptest::option::of(0i64..20_000), 1..16),
        ) {
            let firmwares: Vec<Firmware> = days
                .iter()
                .enumerate()
                .map(|(i, offset)| {
                    let released = offset.map(|d| at(1990, 1, 1) + TimeDelta::days(d));
                    firmware(&i.to_string(), released, false)
                })
                .collect();
            let device = iphone(firmwares);

            prop_assert!(device.firmwares().contains(device.first_firmware().unwrap()));
            prop_assert!(device.firmwares().contains(device.latest_firmware().unwrap()));
        }
    }
}
