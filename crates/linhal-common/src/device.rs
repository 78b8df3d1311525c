//! Devices a queue can target and the user-facing device selector.

use crate::error::{LinhalError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hardware vendor behind a device. Backend selection keys off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Host,
    Amd,
    Nvidia,
    Intel,
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Vendor::Host => "host",
            Vendor::Amd => "amd",
            Vendor::Nvidia => "nvidia",
            Vendor::Intel => "intel",
        };
        f.write_str(name)
    }
}

/// A concrete execution device.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Device {
    vendor: Vendor,
    index: usize,
    name: String,
}

impl Device {
    pub fn host() -> Self {
        Self { vendor: Vendor::Host, index: 0, name: "host".to_string() }
    }

    pub fn gpu(vendor: Vendor, index: usize, name: impl Into<String>) -> Self {
        Self { vendor, index, name: name.into() }
    }

    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_host(&self) -> bool {
        self.vendor == Vendor::Host
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_host() { write!(f, "host") } else { write!(f, "{}:{}", self.vendor, self.index) }
    }
}

/// Device selector parsed from configuration, e.g. `auto`, `host`, `amd:1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DeviceSpec {
    /// First GPU found, otherwise the host.
    #[default]
    Auto,
    Host,
    Gpu { vendor: Vendor, index: usize },
}

impl FromStr for DeviceSpec {
    type Err = LinhalError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        let (kind, index) = match lower.split_once(':') {
            Some((kind, idx)) => {
                let index = idx.parse::<usize>().map_err(|e| {
                    LinhalError::Config(format!("invalid device index in '{s}': {e}"))
                })?;
                (kind.to_string(), Some(index))
            }
            None => (lower.clone(), None),
        };
        let vendor = match kind.as_str() {
            "auto" if index.is_none() => return Ok(DeviceSpec::Auto),
            "host" | "cpu" if index.is_none() => return Ok(DeviceSpec::Host),
            "amd" | "rocm" | "hip" => Vendor::Amd,
            "nvidia" | "cuda" => Vendor::Nvidia,
            "intel" | "level-zero" | "l0" => Vendor::Intel,
            _ => return Err(LinhalError::Config(format!("unknown device spec: '{s}'"))),
        };
        Ok(DeviceSpec::Gpu { vendor, index: index.unwrap_or(0) })
    }
}

impl fmt::Display for DeviceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceSpec::Auto => write!(f, "auto"),
            DeviceSpec::Host => write!(f, "host"),
            DeviceSpec::Gpu { vendor, index } => write!(f, "{vendor}:{index}"),
        }
    }
}

impl TryFrom<String> for DeviceSpec {
    type Error = LinhalError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DeviceSpec> for String {
    fn from(spec: DeviceSpec) -> Self {
        spec.to_string()
    }
}

impl DeviceSpec {
    /// Pick a device out of `available`.
    ///
    /// `Auto` prefers the first non-host device. An explicit GPU that is not
    /// present is an error rather than a silent fallback.
    pub fn resolve(&self, available: &[Device]) -> Result<Device> {
        match self {
            DeviceSpec::Auto => Ok(available
                .iter()
                .find(|d| !d.is_host())
                .cloned()
                .unwrap_or_else(Device::host)),
            DeviceSpec::Host => Ok(Device::host()),
            DeviceSpec::Gpu { vendor, index } => available
                .iter()
                .find(|d| d.vendor() == *vendor && d.index() == *index)
                .cloned()
                .ok_or_else(|| {
                    LinhalError::Config(format!("device {self} not found among {} devices", available.len()))
                }),
        }
    }
}
