//! `linhal-rocm`: the AMD side of linhal.
//!
//! * [`device`] probes the HIP runtime with `libloading` and lists AMD GPUs.
//! * [`hip`] covers the HIP runtime calls the wrappers share.
//! * [`rocblas`] wraps rocBLAS handles and the batched routines the BLAS
//!   backend forwards to (`rocblas` feature).
//! * [`rocfft`] wraps rocFFT plan descriptions, plans and execution
//!   (`rocfft` feature).
//!
//! Without the features the wrappers still compile and report
//! [`RocmError::NotLinked`], so callers can dispatch unconditionally.

pub mod device;
pub mod error;
pub mod hip;
pub mod rocblas;
pub mod rocfft;

pub use device::{available_devices, enumerate_devices, hip_runtime_available, queue_for};
pub use error::{HipErrorCode, Result, RocblasStatus, RocfftStatus, RocmError};
