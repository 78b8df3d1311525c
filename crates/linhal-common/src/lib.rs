//! Shared types for the linhal dispatch crates.
//!
//! Everything the BLAS and DFT front-ends agree on lives here: the error
//! enum, numeric layout enums, devices, the in-order execution queue,
//! buffers, dispatch configuration, backend registries and selection.

pub mod backend_selection;
pub mod buffer;
pub mod config;
pub mod device;
pub mod error;
pub mod queue;
pub mod registry;
pub mod types;

pub use backend_selection::{BackendCandidate, BackendSelection, select_backend};
pub use buffer::Buffer;
pub use config::{DispatchConfig, DomainConfig};
pub use device::{Device, DeviceSpec, Vendor};
pub use error::{LinhalError, Result};
pub use queue::{Event, Queue};
pub use registry::{BackendInfo, BackendRegistry};
pub use types::{Diag, Layout, Scalar, ScalarKind, Side, Transpose, Uplo};

pub use half::f16;
pub use num_complex::{Complex32, Complex64};
