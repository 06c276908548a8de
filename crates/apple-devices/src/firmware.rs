//! Firmware records as published by ipsw.me

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

/// One firmware build available for a device.
///
/// Firmwares order by release date only. Very old builds have no release
/// date; such a firmware is never strictly before or after another one, yet
/// is always "on or before" and "on or after" it. There is no [`PartialOrd`]
/// impl; `<=` there must agree with `partial_cmp`, which this table does not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Firmware {
    version: String,
    #[serde(rename = "buildid")]
    build_id: String,
    #[serde(rename = "releasedate")]
    release_date: Option<DateTime<Utc>>,
    #[serde(rename = "uploaddate")]
    upload_date: DateTime<Utc>,
    signed: bool,
    /// Fields kept verbatim from ipsw.me (`url`, `sha1sum`, `filesize`, ...)
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Firmware {
    /// Create a firmware record
    pub fn new(
        version: impl Into<String>,
        build_id: impl Into<String>,
        release_date: Option<DateTime<Utc>>,
        upload_date: DateTime<Utc>,
        signed: bool,
    ) -> Self {
        Self {
            version: version.into(),
            build_id: build_id.into(),
            release_date,
            upload_date,
            signed,
            extra: Map::new(),
        }
    }

    /// Version string, e.g. `9.3.6` or `17.0.3`
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Build identifier, e.g. `7E18` or `21A360`
    pub fn build_id(&self) -> &str {
        &self.build_id
    }

    /// Release time, `None` for very old firmwares
    pub fn release_date(&self) -> Option<DateTime<Utc>> {
        self.release_date
    }

    /// Time the build was uploaded to ipsw.me
    pub fn upload_date(&self) -> DateTime<Utc> {
        self.upload_date
    }

    /// Whether Apple still signs this build
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Upstream fields not modelled above
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Compare release dates, `None` when either side is undated
    pub fn release_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.release_date, other.release_date) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => None,
        }
    }

    /// Strictly released before `other`; false if either is undated
    pub fn released_before(&self, other: &Self) -> bool {
        self.release_cmp(other) == Some(Ordering::Less)
    }

    /// Strictly released after `other`; false if either is undated
    pub fn released_after(&self, other: &Self) -> bool {
        self.release_cmp(other) == Some(Ordering::Greater)
    }

    /// Released on or before `other`; true if either is undated
    pub fn released_on_or_before(&self, other: &Self) -> bool {
        self.release_cmp(other) != Some(Ordering::Greater)
    }

    /// Released on or after `other`; true if either is undated
    pub fn released_on_or_after(&self, other: &Self) -> bool {
        self.release_cmp(other) != Some(Ordering::Less)
    }
}

impl fmt::Display for Firmware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.version, self.build_id)?;
        if self.signed {
            write!(f, " [signed]")?;
        }
        Ok(())
    }
}
