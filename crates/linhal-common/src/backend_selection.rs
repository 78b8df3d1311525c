//! Backend selection for a device.
//!
//! Answers "requested X, detected Y, selected Z" for one dispatch domain and
//! keeps the rationale so it can be logged.

use crate::device::Device;
use crate::error::{LinhalError, Result};
use tracing::warn;

/// A registered backend as seen by the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendCandidate {
    pub name: &'static str,
    /// Whether the backend claims the device being dispatched to.
    pub supports_device: bool,
}

/// The outcome of backend selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSelection {
    pub domain: &'static str,
    pub device: String,
    /// Backend named in configuration, if any.
    pub requested: Option<String>,
    /// Backends that support the device, in registration order.
    pub detected: Vec<&'static str>,
    pub selected: &'static str,
    pub rationale: String,
}

impl BackendSelection {
    /// Format: `domain=blas device=amd:0 requested=auto detected=[rocblas] selected=rocblas`
    pub fn summary(&self) -> String {
        format!(
            "domain={} device={} requested={} detected=[{}] selected={}",
            self.domain,
            self.device,
            self.requested.as_deref().unwrap_or("auto"),
            self.detected.join(","),
            self.selected,
        )
    }
}

/// Pick a backend for `device` out of `candidates`.
///
/// A requested backend that cannot serve the device falls back to the first
/// capable one, unless `strict` is set.
pub fn select_backend(
    domain: &'static str,
    device: &Device,
    requested: Option<&str>,
    strict: bool,
    candidates: &[BackendCandidate],
) -> Result<BackendSelection> {
    let detected: Vec<&'static str> =
        candidates.iter().filter(|c| c.supports_device).map(|c| c.name).collect();

    let (selected, rationale) = match requested {
        Some(name) => match detected.iter().find(|d| d.eq_ignore_ascii_case(name)) {
            Some(found) => (Some(*found), format!("{found} requested and supports {device}")),
            None if strict => {
                return Err(LinhalError::Config(format!(
                    "requested {domain} backend '{name}' cannot serve device {device}; \
                     capable backends: [{}]",
                    detected.join(", ")
                )));
            }
            None => {
                warn!(domain, requested = name, device = %device, "requested backend unusable, falling back");
                (
                    detected.first().copied(),
                    format!("{name} requested but cannot serve {device}; falling back"),
                )
            }
        },
        None => (detected.first().copied(), "first registered backend supporting the device".to_string()),
    };

    let selected = selected.ok_or_else(|| LinhalError::backend_unavailable(domain, device))?;

    Ok(BackendSelection {
        domain,
        device: device.to_string(),
        requested: requested.map(str::to_string),
        detected,
        selected,
        rationale,
    })
}
