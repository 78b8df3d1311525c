//! rocBLAS handles and the batched routines the BLAS backend calls.
//!
//! Every pointer handed to these routines must be device-accessible (HIP
//! device or managed memory). Scalars (`alpha`, `beta`) are read from host
//! memory; handles stay in the default `rocblas_pointer_mode_host`.
//!
//! The per-type entry points are declared with untyped pointers so one
//! function-pointer type covers all element types, and [`routine_table`]
//! picks the right set for a [`ScalarKind`].

use crate::error::Result;
use linhal_common::ScalarKind;
use std::ffi::c_void;
use tracing::debug;

/// `rocblas_handle`.
pub type RocblasHandle = *mut c_void;
/// `rocblas_int`.
pub type RocblasInt = i32;
/// `rocblas_stride`.
pub type RocblasStride = i64;

/// `rocblas_?gemm_strided_batched`.
pub type GemmStridedBatchedFn = unsafe extern "C" fn(
    handle: RocblasHandle,
    transa: u32,
    transb: u32,
    m: RocblasInt,
    n: RocblasInt,
    k: RocblasInt,
    alpha: *const c_void,
    a: *const c_void,
    lda: RocblasInt,
    stride_a: RocblasStride,
    b: *const c_void,
    ldb: RocblasInt,
    stride_b: RocblasStride,
    beta: *const c_void,
    c: *mut c_void,
    ldc: RocblasInt,
    stride_c: RocblasStride,
    batch_count: RocblasInt,
) -> u32;

/// `rocblas_?gemm_batched`.
pub type GemmBatchedFn = unsafe extern "C" fn(
    handle: RocblasHandle,
    transa: u32,
    transb: u32,
    m: RocblasInt,
    n: RocblasInt,
    k: RocblasInt,
    alpha: *const c_void,
    a: *const *const c_void,
    lda: RocblasInt,
    b: *const *const c_void,
    ldb: RocblasInt,
    beta: *const c_void,
    c: *const *mut c_void,
    ldc: RocblasInt,
    batch_count: RocblasInt,
) -> u32;

/// `rocblas_?trsm_batched`.
pub type TrsmBatchedFn = unsafe extern "C" fn(
    handle: RocblasHandle,
    side: u32,
    uplo: u32,
    trans: u32,
    diag: u32,
    m: RocblasInt,
    n: RocblasInt,
    alpha: *const c_void,
    a: *const *const c_void,
    lda: RocblasInt,
    b: *const *mut c_void,
    ldb: RocblasInt,
    batch_count: RocblasInt,
) -> u32;

/// A named library entry point.
#[derive(Debug, Clone, Copy)]
pub struct Routine<F> {
    pub name: &'static str,
    pub func: F,
}

/// The rocBLAS entry points for one element type.
#[derive(Debug, Clone, Copy)]
pub struct RoutineTable {
    pub gemm_strided_batched: Routine<GemmStridedBatchedFn>,
    pub gemm_batched: Routine<GemmBatchedFn>,
    /// rocBLAS has no half-precision TRSM.
    pub trsm_batched: Option<Routine<TrsmBatchedFn>>,
}

#[cfg(feature = "rocblas")]
mod ffi {
    use super::{RocblasHandle, RocblasInt, RocblasStride};
    use std::ffi::c_void;

    unsafe extern "C" {
        pub fn rocblas_create_handle(handle: *mut RocblasHandle) -> u32;
        pub fn rocblas_destroy_handle(handle: RocblasHandle) -> u32;
    }

    macro_rules! gemm_strided_batched {
        ($($name:ident),* $(,)?) => {
            unsafe extern "C" {
                $(
                    pub fn $name(
                        handle: RocblasHandle, transa: u32, transb: u32,
                        m: RocblasInt, n: RocblasInt, k: RocblasInt,
                        alpha: *const c_void,
                        a: *const c_void, lda: RocblasInt, stride_a: RocblasStride,
                        b: *const c_void, ldb: RocblasInt, stride_b: RocblasStride,
                        beta: *const c_void,
                        c: *mut c_void, ldc: RocblasInt, stride_c: RocblasStride,
                        batch_count: RocblasInt,
                    ) -> u32;
                )*
            }
        };
    }

    macro_rules! gemm_batched {
        ($($name:ident),* $(,)?) => {
            unsafe extern "C" {
                $(
                    pub fn $name(
                        handle: RocblasHandle, transa: u32, transb: u32,
                        m: RocblasInt, n: RocblasInt, k: RocblasInt,
                        alpha: *const c_void,
                        a: *const *const c_void, lda: RocblasInt,
                        b: *const *const c_void, ldb: RocblasInt,
                        beta: *const c_void,
                        c: *const *mut c_void, ldc: RocblasInt,
                        batch_count: RocblasInt,
                    ) -> u32;
                )*
            }
        };
    }

    macro_rules! trsm_batched {
        ($($name:ident),* $(,)?) => {
            unsafe extern "C" {
                $(
                    pub fn $name(
                        handle: RocblasHandle, side: u32, uplo: u32, trans: u32, diag: u32,
                        m: RocblasInt, n: RocblasInt,
                        alpha: *const c_void,
                        a: *const *const c_void, lda: RocblasInt,
                        b: *const *mut c_void, ldb: RocblasInt,
                        batch_count: RocblasInt,
                    ) -> u32;
                )*
            }
        };
    }

    gemm_strided_batched!(
        rocblas_hgemm_strided_batched,
        rocblas_sgemm_strided_batched,
        rocblas_dgemm_strided_batched,
        rocblas_cgemm_strided_batched,
        rocblas_zgemm_strided_batched,
    );
    gemm_batched!(
        rocblas_hgemm_batched,
        rocblas_sgemm_batched,
        rocblas_dgemm_batched,
        rocblas_cgemm_batched,
        rocblas_zgemm_batched,
    );
    trsm_batched!(
        rocblas_strsm_batched,
        rocblas_dtrsm_batched,
        rocblas_ctrsm_batched,
        rocblas_ztrsm_batched,
    );
}

#[cfg(feature = "rocblas")]
macro_rules! routine {
    ($name:ident) => {
        Routine { name: stringify!($name), func: ffi::$name }
    };
}

/// Entry points for `kind`, or `None` when rocBLAS is not linked.
#[cfg(feature = "rocblas")]
pub fn routine_table(kind: ScalarKind) -> Option<RoutineTable> {
    let table = match kind {
        ScalarKind::F16 => RoutineTable {
            gemm_strided_batched: routine!(rocblas_hgemm_strided_batched),
            gemm_batched: routine!(rocblas_hgemm_batched),
            trsm_batched: None,
        },
        ScalarKind::F32 => RoutineTable {
            gemm_strided_batched: routine!(rocblas_sgemm_strided_batched),
            gemm_batched: routine!(rocblas_sgemm_batched),
            trsm_batched: Some(routine!(rocblas_strsm_batched)),
        },
        ScalarKind::F64 => RoutineTable {
            gemm_strided_batched: routine!(rocblas_dgemm_strided_batched),
            gemm_batched: routine!(rocblas_dgemm_batched),
            trsm_batched: Some(routine!(rocblas_dtrsm_batched)),
        },
        ScalarKind::C32 => RoutineTable {
            gemm_strided_batched: routine!(rocblas_cgemm_strided_batched),
            gemm_batched: routine!(rocblas_cgemm_batched),
            trsm_batched: Some(routine!(rocblas_ctrsm_batched)),
        },
        ScalarKind::C64 => RoutineTable {
            gemm_strided_batched: routine!(rocblas_zgemm_strided_batched),
            gemm_batched: routine!(rocblas_zgemm_batched),
            trsm_batched: Some(routine!(rocblas_ztrsm_batched)),
        },
    };
    Some(table)
}

/// Entry points for `kind`, or `None` when rocBLAS is not linked.
#[cfg(not(feature = "rocblas"))]
pub fn routine_table(_kind: ScalarKind) -> Option<RoutineTable> {
    None
}

/// Owned `rocblas_handle`.
#[derive(Debug)]
pub struct Handle {
    raw: RocblasHandle,
}

// SAFETY: a rocBLAS handle may be moved between threads; it is never shared
// without external synchronisation.
unsafe impl Send for Handle {}

impl Handle {
    #[cfg(feature = "rocblas")]
    pub fn new() -> Result<Self> {
        let mut raw: RocblasHandle = std::ptr::null_mut();
        // SAFETY: `raw` is a valid out-pointer.
        let status = unsafe { ffi::rocblas_create_handle(&mut raw) };
        crate::error::check_rocblas(status, "rocblas_create_handle")?;
        debug!("created rocBLAS handle");
        Ok(Self { raw })
    }

    #[cfg(not(feature = "rocblas"))]
    pub fn new() -> Result<Self> {
        debug!("rocBLAS handle requested without the rocblas feature");
        Err(crate::error::RocmError::NotLinked { library: "rocBLAS", feature: "rocblas" })
    }

    pub fn raw(&self) -> RocblasHandle {
        self.raw
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        #[cfg(feature = "rocblas")]
        if !self.raw.is_null() {
            // SAFETY: `raw` came from rocblas_create_handle and is dropped once.
            let status = unsafe { ffi::rocblas_destroy_handle(self.raw) };
            if let Err(err) = crate::error::check_rocblas(status, "rocblas_destroy_handle") {
                tracing::warn!(error = %err, "failed to destroy rocBLAS handle");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RocmError;

    #[cfg(not(feature = "rocblas"))]
    #[test]
    fn handle_reports_not_linked() {
        let err = Handle::new().unwrap_err();
        assert!(matches!(err, RocmError::NotLinked { library: "rocBLAS", .. }));
        assert!(routine_table(ScalarKind::F32).is_none());
    }

    #[cfg(feature = "rocblas")]
    #[test]
    fn half_precision_has_no_trsm() {
        let table = routine_table(ScalarKind::F16).unwrap();
        assert!(table.trsm_batched.is_none());
        assert_eq!(table.gemm_batched.name, "rocblas_hgemm_batched");
        let table = routine_table(ScalarKind::C64).unwrap();
        assert_eq!(table.trsm_batched.unwrap().name, "rocblas_ztrsm_batched");
    }
}
