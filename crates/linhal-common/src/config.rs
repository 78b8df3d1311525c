//! Dispatch configuration: device choice and backend preferences.
//!
//! Sources are layered as defaults, then an optional TOML file, then
//! `LINHAL_*` environment variables.

use crate::device::DeviceSpec;
use crate::error::{LinhalError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::{debug, warn};

/// Path of a TOML file picked up by [`DispatchConfig::load`].
pub const ENV_CONFIG: &str = "LINHAL_CONFIG";
pub const ENV_DEVICE: &str = "LINHAL_DEVICE";
pub const ENV_BLAS_BACKEND: &str = "LINHAL_BLAS_BACKEND";
pub const ENV_DFT_BACKEND: &str = "LINHAL_DFT_BACKEND";
pub const ENV_STRICT: &str = "LINHAL_STRICT";

/// Top-level dispatch configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DispatchConfig {
    /// Device new queues should target when the caller has no preference.
    pub device: DeviceSpec,
    /// Fail instead of falling back when a requested backend is unusable.
    pub strict: bool,
    pub blas: DomainConfig,
    pub dft: DomainConfig,
}

/// Per-domain backend preference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    /// Name of the preferred backend, e.g. `rocblas`.
    pub backend: Option<String>,
    pub enabled: bool,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self { backend: None, enabled: true }
    }
}

impl DispatchConfig {
    /// Load from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| LinhalError::Config(format!("reading {}: {e}", path.display())))?;
        let config: Self = toml::from_str(&text)
            .map_err(|e| LinhalError::Config(format!("parsing {}: {e}", path.display())))?;
        debug!(path = %path.display(), "loaded dispatch config");
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// File named by `LINHAL_CONFIG` (if any), then environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match env::var(ENV_CONFIG) {
            Ok(path) if !path.is_empty() => Self::from_file(Path::new(&path))?,
            _ => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Like [`DispatchConfig::load`], but falls back to defaults on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|err| {
            warn!(error = %err, "ignoring invalid dispatch configuration");
            Self::default()
        })
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(device) = env::var(ENV_DEVICE) {
            self.device = device.parse()?;
        }
        if let Ok(name) = env::var(ENV_BLAS_BACKEND) {
            self.blas.backend = non_empty(name);
        }
        if let Ok(name) = env::var(ENV_DFT_BACKEND) {
            self.dft.backend = non_empty(name);
        }
        if let Ok(strict) = env::var(ENV_STRICT) {
            self.strict = parse_flag(&strict)?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        for (domain, cfg) in [("blas", &self.blas), ("dft", &self.dft)] {
            if let Some(name) = &cfg.backend {
                if name.trim().is_empty() {
                    return Err(LinhalError::Config(format!("{domain}.backend must not be blank")));
                }
                if !cfg.enabled {
                    return Err(LinhalError::Config(format!(
                        "{domain}.backend = '{name}' is set but {domain} dispatch is disabled"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_lowercase()) }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(LinhalError::Config(format!("{ENV_STRICT}: expected a boolean, got '{other}'"))),
    }
}

#[cfg(test)]
mod tests;
