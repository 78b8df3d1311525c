//! Process-wide DFT backend registry.

use crate::backend::DftBackend;
use crate::rocfft::RocfftBackend;
use linhal_common::{BackendRegistry, DispatchConfig, Queue, Result};
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

type Registry = BackendRegistry<dyn DftBackend>;

static REGISTRY: OnceLock<RwLock<Registry>> = OnceLock::new();

fn registry() -> &'static RwLock<Registry> {
    REGISTRY.get_or_init(|| {
        let mut registry = Registry::new("dft");
        registry.configure(&DispatchConfig::load_or_default());
        registry.register(Arc::new(RocfftBackend::new()));
        RwLock::new(registry)
    })
}

fn read() -> RwLockReadGuard<'static, Registry> {
    registry().read().unwrap_or_else(|e| e.into_inner())
}

fn write() -> RwLockWriteGuard<'static, Registry> {
    registry().write().unwrap_or_else(|e| e.into_inner())
}

/// Add a backend. It takes precedence over those registered before it.
pub fn register_backend(backend: Arc<dyn DftBackend>) {
    write().register(backend);
}

/// Remove a backend by name. Returns `true` if it was registered.
pub fn unregister_backend(name: &str) -> bool {
    write().unregister(name)
}

/// Names of the registered backends, highest precedence first.
pub fn backend_names() -> Vec<&'static str> {
    read().names()
}

/// Re-read backend preferences from `config`.
pub fn configure(config: &DispatchConfig) {
    write().configure(config);
}

pub(crate) fn backend_for(queue: &Queue) -> Result<Arc<dyn DftBackend>> {
    let (backend, selection) = read().select(queue.device())?;
    debug!(selection = %selection.summary(), "dft backend");
    Ok(backend)
}
