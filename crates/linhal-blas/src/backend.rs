//! The backend seam of the batched BLAS layer.
//!
//! [`BatchRoutines`] lists every batched routine in its three memory
//! conventions. Each method has a default body that reports the routine as
//! unimplemented for the requested layout, so a backend only overrides what
//! its vendor library actually provides.
//!
//! Arguments arrive already checked by the front-end: batch and group sizes
//! are non-negative, grouped slices have exactly one entry per batch item,
//! and buffer outputs do not alias buffer inputs.

#![allow(clippy::too_many_arguments)]

use crate::groups::{
    AxpyGroup, CopyGroup, DgmmGroup, GemmGroup, GemvGroup, MatcopyGroup, SyrkGroup, TrsmGroup,
};
use half::f16;
use linhal_common::{
    BackendInfo, Buffer, Diag, Event, Layout, LinhalError, Queue, Result, Scalar, Side, Transpose,
    Uplo,
};
use num_complex::{Complex32, Complex64};

/// Error for a routine/layout combination a backend does not provide.
pub fn unsupported(routine: &'static str, layout: Layout) -> LinhalError {
    LinhalError::unimplemented("blas", routine, format!("for {layout} layout"))
}

/// Batched routines for element type `T`.
///
/// `_buffer` methods block until the work is done. `_strided` and `_group`
/// methods take caller-managed slices and a dependency list and return the
/// completion event of the submitted task.
pub trait BatchRoutines<T: Scalar>: Send + Sync {
    // ── copy ───────────────────────────────────────────────────────────

    fn copy_batch_buffer(
        &self,
        _queue: &Queue,
        layout: Layout,
        _n: i64,
        _x: &Buffer<T>,
        _incx: i64,
        _stridex: i64,
        _y: &Buffer<T>,
        _incy: i64,
        _stridey: i64,
        _batch_size: i64,
    ) -> Result<()> {
        Err(unsupported("copy_batch", layout))
    }

    fn copy_batch_strided(
        &self,
        _queue: &Queue,
        layout: Layout,
        _n: i64,
        _x: &[T],
        _incx: i64,
        _stridex: i64,
        _y: &mut [T],
        _incy: i64,
        _stridey: i64,
        _batch_size: i64,
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("copy_batch", layout))
    }

    fn copy_batch_group(
        &self,
        _queue: &Queue,
        layout: Layout,
        _groups: &[CopyGroup],
        _x: &[&[T]],
        _y: &mut [&mut [T]],
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("copy_batch", layout))
    }

    // ── axpy ───────────────────────────────────────────────────────────

    fn axpy_batch_buffer(
        &self,
        _queue: &Queue,
        layout: Layout,
        _n: i64,
        _alpha: T,
        _x: &Buffer<T>,
        _incx: i64,
        _stridex: i64,
        _y: &Buffer<T>,
        _incy: i64,
        _stridey: i64,
        _batch_size: i64,
    ) -> Result<()> {
        Err(unsupported("axpy_batch", layout))
    }

    fn axpy_batch_strided(
        &self,
        _queue: &Queue,
        layout: Layout,
        _n: i64,
        _alpha: T,
        _x: &[T],
        _incx: i64,
        _stridex: i64,
        _y: &mut [T],
        _incy: i64,
        _stridey: i64,
        _batch_size: i64,
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("axpy_batch", layout))
    }

    fn axpy_batch_group(
        &self,
        _queue: &Queue,
        layout: Layout,
        _groups: &[AxpyGroup<T>],
        _x: &[&[T]],
        _y: &mut [&mut [T]],
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("axpy_batch", layout))
    }

    // ── gemv ───────────────────────────────────────────────────────────

    fn gemv_batch_buffer(
        &self,
        _queue: &Queue,
        layout: Layout,
        _trans: Transpose,
        _m: i64,
        _n: i64,
        _alpha: T,
        _a: &Buffer<T>,
        _lda: i64,
        _stride_a: i64,
        _x: &Buffer<T>,
        _incx: i64,
        _stride_x: i64,
        _beta: T,
        _y: &Buffer<T>,
        _incy: i64,
        _stride_y: i64,
        _batch_size: i64,
    ) -> Result<()> {
        Err(unsupported("gemv_batch", layout))
    }

    fn gemv_batch_strided(
        &self,
        _queue: &Queue,
        layout: Layout,
        _trans: Transpose,
        _m: i64,
        _n: i64,
        _alpha: T,
        _a: &[T],
        _lda: i64,
        _stride_a: i64,
        _x: &[T],
        _incx: i64,
        _stride_x: i64,
        _beta: T,
        _y: &mut [T],
        _incy: i64,
        _stride_y: i64,
        _batch_size: i64,
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("gemv_batch", layout))
    }

    fn gemv_batch_group(
        &self,
        _queue: &Queue,
        layout: Layout,
        _groups: &[GemvGroup<T>],
        _a: &[&[T]],
        _x: &[&[T]],
        _y: &mut [&mut [T]],
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("gemv_batch", layout))
    }

    // ── dgmm ───────────────────────────────────────────────────────────

    fn dgmm_batch_buffer(
        &self,
        _queue: &Queue,
        layout: Layout,
        _side: Side,
        _m: i64,
        _n: i64,
        _a: &Buffer<T>,
        _lda: i64,
        _stride_a: i64,
        _x: &Buffer<T>,
        _incx: i64,
        _stride_x: i64,
        _c: &Buffer<T>,
        _ldc: i64,
        _stride_c: i64,
        _batch_size: i64,
    ) -> Result<()> {
        Err(unsupported("dgmm_batch", layout))
    }

    fn dgmm_batch_strided(
        &self,
        _queue: &Queue,
        layout: Layout,
        _side: Side,
        _m: i64,
        _n: i64,
        _a: &[T],
        _lda: i64,
        _stride_a: i64,
        _x: &[T],
        _incx: i64,
        _stride_x: i64,
        _c: &mut [T],
        _ldc: i64,
        _stride_c: i64,
        _batch_size: i64,
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("dgmm_batch", layout))
    }

    fn dgmm_batch_group(
        &self,
        _queue: &Queue,
        layout: Layout,
        _groups: &[DgmmGroup],
        _a: &[&[T]],
        _x: &[&[T]],
        _c: &mut [&mut [T]],
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("dgmm_batch", layout))
    }

    // ── gemm ───────────────────────────────────────────────────────────

    fn gemm_batch_buffer(
        &self,
        _queue: &Queue,
        layout: Layout,
        _transa: Transpose,
        _transb: Transpose,
        _m: i64,
        _n: i64,
        _k: i64,
        _alpha: T,
        _a: &Buffer<T>,
        _lda: i64,
        _stride_a: i64,
        _b: &Buffer<T>,
        _ldb: i64,
        _stride_b: i64,
        _beta: T,
        _c: &Buffer<T>,
        _ldc: i64,
        _stride_c: i64,
        _batch_size: i64,
    ) -> Result<()> {
        Err(unsupported("gemm_batch", layout))
    }

    fn gemm_batch_strided(
        &self,
        _queue: &Queue,
        layout: Layout,
        _transa: Transpose,
        _transb: Transpose,
        _m: i64,
        _n: i64,
        _k: i64,
        _alpha: T,
        _a: &[T],
        _lda: i64,
        _stride_a: i64,
        _b: &[T],
        _ldb: i64,
        _stride_b: i64,
        _beta: T,
        _c: &mut [T],
        _ldc: i64,
        _stride_c: i64,
        _batch_size: i64,
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("gemm_batch", layout))
    }

    fn gemm_batch_group(
        &self,
        _queue: &Queue,
        layout: Layout,
        _groups: &[GemmGroup<T>],
        _a: &[&[T]],
        _b: &[&[T]],
        _c: &mut [&mut [T]],
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("gemm_batch", layout))
    }

    // ── trsm ───────────────────────────────────────────────────────────

    fn trsm_batch_buffer(
        &self,
        _queue: &Queue,
        layout: Layout,
        _side: Side,
        _uplo: Uplo,
        _trans: Transpose,
        _diag: Diag,
        _m: i64,
        _n: i64,
        _alpha: T,
        _a: &Buffer<T>,
        _lda: i64,
        _stride_a: i64,
        _b: &Buffer<T>,
        _ldb: i64,
        _stride_b: i64,
        _batch_size: i64,
    ) -> Result<()> {
        Err(unsupported("trsm_batch", layout))
    }

    fn trsm_batch_strided(
        &self,
        _queue: &Queue,
        layout: Layout,
        _side: Side,
        _uplo: Uplo,
        _trans: Transpose,
        _diag: Diag,
        _m: i64,
        _n: i64,
        _alpha: T,
        _a: &[T],
        _lda: i64,
        _stride_a: i64,
        _b: &mut [T],
        _ldb: i64,
        _stride_b: i64,
        _batch_size: i64,
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("trsm_batch", layout))
    }

    fn trsm_batch_group(
        &self,
        _queue: &Queue,
        layout: Layout,
        _groups: &[TrsmGroup<T>],
        _a: &[&[T]],
        _b: &mut [&mut [T]],
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("trsm_batch", layout))
    }

    // ── syrk ───────────────────────────────────────────────────────────

    fn syrk_batch_buffer(
        &self,
        _queue: &Queue,
        layout: Layout,
        _uplo: Uplo,
        _trans: Transpose,
        _n: i64,
        _k: i64,
        _alpha: T,
        _a: &Buffer<T>,
        _lda: i64,
        _stride_a: i64,
        _beta: T,
        _c: &Buffer<T>,
        _ldc: i64,
        _stride_c: i64,
        _batch_size: i64,
    ) -> Result<()> {
        Err(unsupported("syrk_batch", layout))
    }

    fn syrk_batch_strided(
        &self,
        _queue: &Queue,
        layout: Layout,
        _uplo: Uplo,
        _trans: Transpose,
        _n: i64,
        _k: i64,
        _alpha: T,
        _a: &[T],
        _lda: i64,
        _stride_a: i64,
        _beta: T,
        _c: &mut [T],
        _ldc: i64,
        _stride_c: i64,
        _batch_size: i64,
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("syrk_batch", layout))
    }

    fn syrk_batch_group(
        &self,
        _queue: &Queue,
        layout: Layout,
        _groups: &[SyrkGroup<T>],
        _a: &[&[T]],
        _c: &mut [&mut [T]],
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("syrk_batch", layout))
    }

    // ── omatcopy ───────────────────────────────────────────────────────

    fn omatcopy_batch_buffer(
        &self,
        _queue: &Queue,
        layout: Layout,
        _trans: Transpose,
        _m: i64,
        _n: i64,
        _alpha: T,
        _a: &Buffer<T>,
        _lda: i64,
        _stride_a: i64,
        _b: &Buffer<T>,
        _ldb: i64,
        _stride_b: i64,
        _batch_size: i64,
    ) -> Result<()> {
        Err(unsupported("omatcopy_batch", layout))
    }

    fn omatcopy_batch_strided(
        &self,
        _queue: &Queue,
        layout: Layout,
        _trans: Transpose,
        _m: i64,
        _n: i64,
        _alpha: T,
        _a: &[T],
        _lda: i64,
        _stride_a: i64,
        _b: &mut [T],
        _ldb: i64,
        _stride_b: i64,
        _batch_size: i64,
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("omatcopy_batch", layout))
    }

    fn omatcopy_batch_group(
        &self,
        _queue: &Queue,
        layout: Layout,
        _groups: &[MatcopyGroup<T>],
        _a: &[&[T]],
        _b: &mut [&mut [T]],
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("omatcopy_batch", layout))
    }

    // ── imatcopy ───────────────────────────────────────────────────────

    fn imatcopy_batch_buffer(
        &self,
        _queue: &Queue,
        layout: Layout,
        _trans: Transpose,
        _m: i64,
        _n: i64,
        _alpha: T,
        _ab: &Buffer<T>,
        _lda: i64,
        _ldb: i64,
        _stride: i64,
        _batch_size: i64,
    ) -> Result<()> {
        Err(unsupported("imatcopy_batch", layout))
    }

    fn imatcopy_batch_strided(
        &self,
        _queue: &Queue,
        layout: Layout,
        _trans: Transpose,
        _m: i64,
        _n: i64,
        _alpha: T,
        _ab: &mut [T],
        _lda: i64,
        _ldb: i64,
        _stride: i64,
        _batch_size: i64,
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("imatcopy_batch", layout))
    }

    fn imatcopy_batch_group(
        &self,
        _queue: &Queue,
        layout: Layout,
        _groups: &[MatcopyGroup<T>],
        _ab: &mut [&mut [T]],
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("imatcopy_batch", layout))
    }

    // ── omatadd (no grouped form) ──────────────────────────────────────

    fn omatadd_batch_buffer(
        &self,
        _queue: &Queue,
        layout: Layout,
        _transa: Transpose,
        _transb: Transpose,
        _m: i64,
        _n: i64,
        _alpha: T,
        _a: &Buffer<T>,
        _lda: i64,
        _stride_a: i64,
        _beta: T,
        _b: &Buffer<T>,
        _ldb: i64,
        _stride_b: i64,
        _c: &Buffer<T>,
        _ldc: i64,
        _stride_c: i64,
        _batch_size: i64,
    ) -> Result<()> {
        Err(unsupported("omatadd_batch", layout))
    }

    fn omatadd_batch_strided(
        &self,
        _queue: &Queue,
        layout: Layout,
        _transa: Transpose,
        _transb: Transpose,
        _m: i64,
        _n: i64,
        _alpha: T,
        _a: &[T],
        _lda: i64,
        _stride_a: i64,
        _beta: T,
        _b: &[T],
        _ldb: i64,
        _stride_b: i64,
        _c: &mut [T],
        _ldc: i64,
        _stride_c: i64,
        _batch_size: i64,
        _dependencies: &[Event],
    ) -> Result<Event> {
        Err(unsupported("omatadd_batch", layout))
    }
}

/// A vendor BLAS library, routable for every supported element type.
pub trait BlasBackend:
    BackendInfo
    + BatchRoutines<f16>
    + BatchRoutines<f32>
    + BatchRoutines<f64>
    + BatchRoutines<Complex32>
    + BatchRoutines<Complex64>
{
}

impl<B> BlasBackend for B where
    B: BackendInfo
        + BatchRoutines<f16>
        + BatchRoutines<f32>
        + BatchRoutines<f64>
        + BatchRoutines<Complex32>
        + BatchRoutines<Complex64>
{
}
