//! Ordered registry of vendor backends for one dispatch domain.

use crate::backend_selection::{BackendCandidate, BackendSelection, select_backend};
use crate::config::{DispatchConfig, DomainConfig};
use crate::device::Device;
use crate::error::{LinhalError, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// What the registry needs to know about a backend.
pub trait BackendInfo: Send + Sync {
    /// Unique lowercase name of this backend (e.g. `"rocblas"`).
    fn name(&self) -> &'static str;

    /// Whether this backend can run work queued on `device`.
    fn supports(&self, device: &Device) -> bool;
}

/// Central registry of backends for one domain (`blas`, `dft`).
///
/// Later registrations take precedence over earlier ones, so a caller can
/// shadow a built-in backend for a device without removing it.
pub struct BackendRegistry<B: ?Sized> {
    domain: &'static str,
    backends: Vec<Arc<B>>,
    settings: DomainConfig,
    strict: bool,
}

impl<B: ?Sized + BackendInfo> BackendRegistry<B> {
    /// Create an empty registry.
    pub fn new(domain: &'static str) -> Self {
        Self { domain, backends: Vec::new(), settings: DomainConfig::default(), strict: false }
    }

    /// Apply the domain's section of `config`.
    pub fn configure(&mut self, config: &DispatchConfig) {
        self.settings = match self.domain {
            "blas" => config.blas.clone(),
            "dft" => config.dft.clone(),
            _ => DomainConfig::default(),
        };
        self.strict = config.strict;
        debug!(domain = self.domain, preferred = ?self.settings.backend, strict = self.strict, "registry configured");
    }

    /// Register a backend, replacing any previous one with the same name.
    pub fn register(&mut self, backend: Arc<B>) {
        let name = backend.name();
        self.backends.retain(|b| b.name() != name);
        self.backends.insert(0, backend);
        info!(domain = self.domain, backend = name, "registered backend");
    }

    /// Remove a previously-registered backend. Returns `true` if found.
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.backends.len();
        self.backends.retain(|b| b.name() != name);
        before != self.backends.len()
    }

    /// Look up a backend by name.
    pub fn get(&self, name: &str) -> Option<Arc<B>> {
        self.backends.iter().find(|b| b.name() == name).cloned()
    }

    /// Registered names, highest precedence first.
    pub fn names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Choose the backend that will serve `device`.
    pub fn select(&self, device: &Device) -> Result<(Arc<B>, BackendSelection)> {
        if !self.settings.enabled {
            return Err(LinhalError::Config(format!("{} dispatch is disabled", self.domain)));
        }
        let candidates: Vec<BackendCandidate> = self
            .backends
            .iter()
            .map(|b| BackendCandidate { name: b.name(), supports_device: b.supports(device) })
            .collect();
        let selection = select_backend(
            self.domain,
            device,
            self.settings.backend.as_deref(),
            self.strict,
            &candidates,
        )?;
        let backend = self
            .get(selection.selected)
            .ok_or_else(|| LinhalError::backend_unavailable(self.domain, device))?;
        debug!(selection = %selection.summary(), "backend selected");
        Ok((backend, selection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::Vendor;

    struct Fake {
        name: &'static str,
        vendor: Vendor,
    }

    impl BackendInfo for Fake {
        fn name(&self) -> &'static str {
            self.name
        }

        fn supports(&self, device: &Device) -> bool {
            device.vendor() == self.vendor
        }
    }

    fn registry() -> BackendRegistry<dyn BackendInfo> {
        let mut reg: BackendRegistry<dyn BackendInfo> = BackendRegistry::new("blas");
        reg.register(Arc::new(Fake { name: "rocblas", vendor: Vendor::Amd }));
        reg.register(Arc::new(Fake { name: "host", vendor: Vendor::Host }));
        reg
    }

    #[test]
    fn selects_by_device_vendor() {
        let reg = registry();
        let (b, _) = reg.select(&Device::gpu(Vendor::Amd, 0, "gfx")).unwrap();
        assert_eq!(b.name(), "rocblas");
        let (b, _) = reg.select(&Device::host()).unwrap();
        assert_eq!(b.name(), "host");
    }

    #[test]
    fn latest_registration_wins() {
        let mut reg = registry();
        reg.register(Arc::new(Fake { name: "shadow", vendor: Vendor::Amd }));
        assert_eq!(reg.names(), vec!["shadow", "host", "rocblas"]);
        let (b, sel) = reg.select(&Device::gpu(Vendor::Amd, 0, "gfx")).unwrap();
        assert_eq!(b.name(), "shadow");
        assert_eq!(sel.detected, vec!["shadow", "rocblas"]);
    }

    #[test]
    fn reregistering_replaces() {
        let mut reg = registry();
        reg.register(Arc::new(Fake { name: "rocblas", vendor: Vendor::Nvidia }));
        assert_eq!(reg.len(), 2);
        assert!(reg.select(&Device::gpu(Vendor::Amd, 0, "gfx")).is_err());
    }

    #[test]
    fn unregister_and_disable() {
        let mut reg = registry();
        assert!(reg.unregister("host"));
        assert!(!reg.unregister("host"));
        assert!(reg.select(&Device::host()).err().unwrap().is_backend_unavailable());

        let mut config = DispatchConfig::default();
        config.blas.enabled = false;
        reg.configure(&config);
        assert!(matches!(reg.select(&Device::gpu(Vendor::Amd, 0, "gfx")), Err(LinhalError::Config(_))));
    }

    #[test]
    fn configured_preference_is_used() {
        let mut reg = registry();
        reg.register(Arc::new(Fake { name: "other", vendor: Vendor::Amd }));
        let mut config = DispatchConfig::default();
        config.blas.backend = Some("rocblas".into());
        reg.configure(&config);
        let (b, sel) = reg.select(&Device::gpu(Vendor::Amd, 0, "gfx")).unwrap();
        assert_eq!(b.name(), "rocblas");
        assert_eq!(sel.requested.as_deref(), Some("rocblas"));
    }
}
