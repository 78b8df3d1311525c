//! `linhal-blas`: batched BLAS routines dispatched to vendor backends.
//!
//! Callers pick a layout module ([`column_major`] or [`row_major`]) and call
//! a routine with a [`Queue`]. The front-end checks batch sizes, group
//! bookkeeping and buffer aliasing, asks the [`registry`] for the backend
//! serving the queue's device, and forwards the call unchanged. Backends
//! report anything their library lacks as
//! [`LinhalError::Unimplemented`](linhal_common::LinhalError::Unimplemented).
//!
//! ```no_run
//! use linhal_blas::{Queue, Transpose, column_major};
//! use linhal_common::Buffer;
//!
//! # fn main() -> linhal_common::Result<()> {
//! let queue = linhal_blas::default_queue()?;
//! let a = Buffer::from_vec(vec![1.0f32; 4 * 4 * 8]);
//! let b = Buffer::from_vec(vec![1.0f32; 4 * 4 * 8]);
//! let c = Buffer::<f32>::new(4 * 4 * 8);
//! column_major::gemm_batch(
//!     &queue, Transpose::NoTrans, Transpose::NoTrans, 4, 4, 4,
//!     1.0, &a, 4, 16, &b, 4, 16, 0.0, &c, 4, 16, 8,
//! )?;
//! # let _: Queue = queue;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod backend;
pub mod groups;
pub mod registry;
pub mod rocblas;
pub mod scalar;
pub mod validate;

pub use api::{column_major, row_major};
pub use backend::{BatchRoutines, BlasBackend, unsupported};
pub use groups::{
    AxpyGroup, CopyGroup, DgmmGroup, GemmGroup, GemvGroup, Group, MatcopyGroup, SyrkGroup,
    TrsmGroup,
};
pub use linhal_common::{Diag, Event, Layout, Queue, Side, Transpose, Uplo};
pub use registry::{backend_names, configure, register_backend, unregister_backend};
pub use rocblas::RocblasBackend;
pub use scalar::{BlasElement, BlasFloat};

/// A queue on the device chosen by the dispatch configuration
/// (`LINHAL_CONFIG`, `LINHAL_DEVICE`).
pub fn default_queue() -> linhal_common::Result<Queue> {
    linhal_rocm::queue_for(&linhal_common::DispatchConfig::load()?)
}
