//! Process-wide BLAS backend registry.
//!
//! Initialised on first use with the built-in backends and the dispatch
//! configuration from the environment.

use crate::backend::BlasBackend;
use crate::rocblas::RocblasBackend;
use linhal_common::{BackendInfo, BackendRegistry, DispatchConfig, Layout, Queue, Result};
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

type Registry = BackendRegistry<dyn BlasBackend>;

static REGISTRY: OnceLock<RwLock<Registry>> = OnceLock::new();

fn registry() -> &'static RwLock<Registry> {
    REGISTRY.get_or_init(|| {
        let mut registry = Registry::new("blas");
        registry.configure(&DispatchConfig::load_or_default());
        registry.register(Arc::new(RocblasBackend::new()));
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
pub fn register_backend(backend: Arc<dyn BlasBackend>) {
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

/// The backend that serves `queue`'s device.
pub(crate) fn backend_for(
    queue: &Queue,
    routine: &'static str,
    layout: Layout,
) -> Result<Arc<dyn BlasBackend>> {
    let (backend, _) = read().select(queue.device())?;
    debug!(routine, %layout, backend = backend.name(), device = %queue.device(), "dispatching");
    Ok(backend)
}
