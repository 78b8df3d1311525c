//! rocBLAS backend for AMD devices.
//!
//! rocBLAS is column-major only, and of the batched routines it provides
//! GEMM (strided and pointer-array forms) and pointer-array TRSM. Everything
//! else falls through to the [`BatchRoutines`] defaults and reports itself
//! unimplemented for the requested layout.
//!
//! Slices handed to the strided and grouped forms must live in
//! device-accessible memory (HIP device or managed allocations).

#![allow(clippy::too_many_arguments)]

use crate::backend::{BatchRoutines, unsupported};
use crate::groups::{GemmGroup, TrsmGroup};
use crate::validate::{self, matrix_extent, strided_extent};
use linhal_common::{
    BackendInfo, Buffer, Device, Event, Layout, LinhalError, Queue, Result, Scalar, Side,
    Transpose, Vendor,
};
use linhal_rocm::error::check_rocblas;
use linhal_rocm::hip::{DevicePointers, device_synchronize};
use linhal_rocm::rocblas::{Handle, RocblasHandle, RoutineTable, routine_table};
use std::collections::HashMap;
use std::ffi::c_void;
use std::sync::Mutex;
use tracing::debug;

const GEMM: &str = "gemm_batch";
const TRSM: &str = "trsm_batch";

/// Scalar arguments of a strided GEMM call.
struct StridedGemm<T> {
    transa: Transpose,
    transb: Transpose,
    m: i64,
    n: i64,
    k: i64,
    alpha: T,
    lda: i64,
    stride_a: i64,
    ldb: i64,
    stride_b: i64,
    beta: T,
    ldc: i64,
    stride_c: i64,
    batch_size: i64,
}

/// Stored `(rows, cols)` of a matrix whose `op()` is `rows x cols`.
fn stored_shape(trans: Transpose, rows: i64, cols: i64) -> (i64, i64) {
    if trans.is_transposed() { (cols, rows) } else { (rows, cols) }
}

fn column_major_only(routine: &'static str, layout: Layout) -> Result<()> {
    match layout {
        Layout::ColMajor => Ok(()),
        Layout::RowMajor => Err(unsupported(routine, layout)),
    }
}

/// Routes batched calls to rocBLAS. One handle is kept per device.
pub struct RocblasBackend {
    handles: Mutex<HashMap<usize, Handle>>,
}

impl RocblasBackend {
    pub const NAME: &'static str = "rocblas";

    pub fn new() -> Self {
        Self { handles: Mutex::new(HashMap::new()) }
    }

    fn table<T: Scalar>(&self, device: &Device) -> Result<RoutineTable> {
        routine_table(T::KIND).ok_or_else(|| {
            debug!(kind = %T::KIND, "rocBLAS not linked");
            LinhalError::backend_unavailable("blas", device)
        })
    }

    /// Run `f` with the device's handle, creating it on first use, then wait
    /// for the device so the task's event means the work is done.
    // TODO: select the HIP device (hipSetDevice) before creating handles for
    // non-zero device indices.
    fn with_handle(
        &self,
        device: &Device,
        f: impl FnOnce(RocblasHandle) -> Result<()>,
    ) -> Result<()> {
        let mut handles = self.handles.lock().unwrap_or_else(|e| e.into_inner());
        let handle = match handles.entry(device.index()) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                let handle = Handle::new().map_err(|e| e.into_linhal("blas", device))?;
                entry.insert(handle)
            }
        };
        f(handle.raw())?;
        device_synchronize().map_err(|e| e.into_linhal("blas", device))
    }

    fn gemm_strided<T: Scalar>(
        &self,
        queue: &Queue,
        p: &StridedGemm<T>,
        a: &[T],
        b: &[T],
        c: &mut [T],
        dependencies: &[Event],
    ) -> Result<Event> {
        validate::overflow_check(
            GEMM,
            &[
                ("m", p.m),
                ("n", p.n),
                ("k", p.k),
                ("lda", p.lda),
                ("ldb", p.ldb),
                ("ldc", p.ldc),
                ("stride_a", p.stride_a),
                ("stride_b", p.stride_b),
                ("stride_c", p.stride_c),
                ("batch_size", p.batch_size),
            ],
        )?;

        let (a_rows, a_cols) = stored_shape(p.transa, p.m, p.k);
        let (b_rows, b_cols) = stored_shape(p.transb, p.k, p.n);
        let a_need = strided_extent(matrix_extent(a_rows, a_cols, p.lda), p.stride_a, p.batch_size);
        let b_need = strided_extent(matrix_extent(b_rows, b_cols, p.ldb), p.stride_b, p.batch_size);
        let c_need = strided_extent(matrix_extent(p.m, p.n, p.ldc), p.stride_c, p.batch_size);
        validate::extent(GEMM, "a", a.len(), a_need)?;
        validate::extent(GEMM, "b", b.len(), b_need)?;
        validate::extent(GEMM, "c", c.len(), c_need)?;

        let device = queue.device();
        let routine = self.table::<T>(device)?.gemm_strided_batched;
        debug!(routine = routine.name, batch = p.batch_size, "submitting");

        Ok(queue.submit(GEMM, dependencies, || {
            self.with_handle(device, |handle| {
                // SAFETY: every integer fits rocblas_int, each slice covers
                // the extent the call reads or writes, and the caller
                // guarantees device-accessible memory.
                let status = unsafe {
                    (routine.func)(
                        handle,
                        p.transa as u32,
                        p.transb as u32,
                        p.m as i32,
                        p.n as i32,
                        p.k as i32,
                        (&p.alpha as *const T).cast(),
                        a.as_ptr().cast(),
                        p.lda as i32,
                        p.stride_a,
                        b.as_ptr().cast(),
                        p.ldb as i32,
                        p.stride_b,
                        (&p.beta as *const T).cast(),
                        c.as_mut_ptr().cast(),
                        p.ldc as i32,
                        p.stride_c,
                        p.batch_size as i32,
                    )
                };
                check_rocblas(status, routine.name).map_err(|e| e.into_linhal("blas", device))
            })
        }))
    }
}

impl Default for RocblasBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendInfo for RocblasBackend {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn supports(&self, device: &Device) -> bool {
        device.vendor() == Vendor::Amd
    }
}

fn device_ptrs(ptrs: &[*mut c_void], device: &Device) -> Result<DevicePointers> {
    DevicePointers::upload(ptrs).map_err(|e| e.into_linhal("blas", device))
}

impl<T: Scalar> BatchRoutines<T> for RocblasBackend {
    fn gemm_batch_buffer(
        &self,
        queue: &Queue,
        layout: Layout,
        transa: Transpose,
        transb: Transpose,
        m: i64,
        n: i64,
        k: i64,
        alpha: T,
        a: &Buffer<T>,
        lda: i64,
        stride_a: i64,
        b: &Buffer<T>,
        ldb: i64,
        stride_b: i64,
        beta: T,
        c: &Buffer<T>,
        ldc: i64,
        stride_c: i64,
        batch_size: i64,
    ) -> Result<()> {
        column_major_only(GEMM, layout)?;
        let params = StridedGemm {
            transa,
            transb,
            m,
            n,
            k,
            alpha,
            lda,
            stride_a,
            ldb,
            stride_b,
            beta,
            ldc,
            stride_c,
            batch_size,
        };

        // `a` and `b` may be the same buffer; lock it once.
        let a_guard = a.read();
        let b_guard = if b.same_storage(a) { None } else { Some(b.read()) };
        let b_data = match &b_guard {
            Some(guard) => guard.as_slice(),
            None => a_guard.as_slice(),
        };
        let mut c_guard = c.write();
        self.gemm_strided(queue, &params, &a_guard, b_data, &mut c_guard, &[])?.wait()
    }

    fn gemm_batch_strided(
        &self,
        queue: &Queue,
        layout: Layout,
        transa: Transpose,
        transb: Transpose,
        m: i64,
        n: i64,
        k: i64,
        alpha: T,
        a: &[T],
        lda: i64,
        stride_a: i64,
        b: &[T],
        ldb: i64,
        stride_b: i64,
        beta: T,
        c: &mut [T],
        ldc: i64,
        stride_c: i64,
        batch_size: i64,
        dependencies: &[Event],
    ) -> Result<Event> {
        column_major_only(GEMM, layout)?;
        let params = StridedGemm {
            transa,
            transb,
            m,
            n,
            k,
            alpha,
            lda,
            stride_a,
            ldb,
            stride_b,
            beta,
            ldc,
            stride_c,
            batch_size,
        };
        self.gemm_strided(queue, &params, a, b, c, dependencies)
    }

    fn gemm_batch_group(
        &self,
        queue: &Queue,
        layout: Layout,
        groups: &[GemmGroup<T>],
        a: &[&[T]],
        b: &[&[T]],
        c: &mut [&mut [T]],
        dependencies: &[Event],
    ) -> Result<Event> {
        column_major_only(GEMM, layout)?;
        let total = validate::group_total(GEMM, groups)?;
        validate::array_len(GEMM, "a", a.len(), total)?;
        validate::array_len(GEMM, "b", b.len(), total)?;
        validate::array_len(GEMM, "c", c.len(), total)?;

        let mut offset = 0usize;
        for g in groups {
            validate::overflow_check(
                GEMM,
                &[
                    ("m", g.m),
                    ("n", g.n),
                    ("k", g.k),
                    ("lda", g.lda),
                    ("ldb", g.ldb),
                    ("ldc", g.ldc),
                    ("group_size", g.size),
                ],
            )?;
            let (a_rows, a_cols) = stored_shape(g.transa, g.m, g.k);
            let (b_rows, b_cols) = stored_shape(g.transb, g.k, g.n);
            let end = offset + g.size as usize;
            for i in offset..end {
                validate::extent(GEMM, "a", a[i].len(), matrix_extent(a_rows, a_cols, g.lda))?;
                validate::extent(GEMM, "b", b[i].len(), matrix_extent(b_rows, b_cols, g.ldb))?;
                validate::extent(GEMM, "c", c[i].len(), matrix_extent(g.m, g.n, g.ldc))?;
            }
            offset = end;
        }

        let device = queue.device();
        let routine = self.table::<T>(device)?.gemm_batched;
        debug!(routine = routine.name, groups = groups.len(), "submitting");

        Ok(queue.submit(GEMM, dependencies, || {
            let mut offset = 0usize;
            for g in groups {
                let size = g.size as usize;
                let range = offset..offset + size;
                offset += size;
                if size == 0 {
                    continue;
                }

                let a_ptrs: Vec<*mut c_void> =
                    a[range.clone()].iter().map(|m| m.as_ptr() as *mut c_void).collect();
                let b_ptrs: Vec<*mut c_void> =
                    b[range.clone()].iter().map(|m| m.as_ptr() as *mut c_void).collect();
                let c_ptrs: Vec<*mut c_void> =
                    c[range].iter_mut().map(|m| m.as_mut_ptr().cast()).collect();
                let a_dev = device_ptrs(&a_ptrs, device)?;
                let b_dev = device_ptrs(&b_ptrs, device)?;
                let c_dev = device_ptrs(&c_ptrs, device)?;

                self.with_handle(device, |handle| {
                    // SAFETY: integers fit rocblas_int, every matrix covers
                    // its extent, and pointer arrays hold `size` entries.
                    let status = unsafe {
                        (routine.func)(
                            handle,
                            g.transa as u32,
                            g.transb as u32,
                            g.m as i32,
                            g.n as i32,
                            g.k as i32,
                            (&g.alpha as *const T).cast(),
                            a_dev.as_const(),
                            g.lda as i32,
                            b_dev.as_const(),
                            g.ldb as i32,
                            (&g.beta as *const T).cast(),
                            c_dev.as_mut(),
                            g.ldc as i32,
                            size as i32,
                        )
                    };
                    check_rocblas(status, routine.name).map_err(|e| e.into_linhal("blas", device))
                })?;
            }
            Ok(())
        }))
    }

    fn trsm_batch_group(
        &self,
        queue: &Queue,
        layout: Layout,
        groups: &[TrsmGroup<T>],
        a: &[&[T]],
        b: &mut [&mut [T]],
        dependencies: &[Event],
    ) -> Result<Event> {
        column_major_only(TRSM, layout)?;
        let total = validate::group_total(TRSM, groups)?;
        validate::array_len(TRSM, "a", a.len(), total)?;
        validate::array_len(TRSM, "b", b.len(), total)?;

        let mut offset = 0usize;
        for g in groups {
            validate::overflow_check(
                TRSM,
                &[("m", g.m), ("n", g.n), ("lda", g.lda), ("ldb", g.ldb), ("group_size", g.size)],
            )?;
            let order = if g.side == Side::Left { g.m } else { g.n };
            let end = offset + g.size as usize;
            for i in offset..end {
                validate::extent(TRSM, "a", a[i].len(), matrix_extent(order, order, g.lda))?;
                validate::extent(TRSM, "b", b[i].len(), matrix_extent(g.m, g.n, g.ldb))?;
            }
            offset = end;
        }

        let device = queue.device();
        let routine = self
            .table::<T>(device)?
            .trsm_batched
            .ok_or_else(|| LinhalError::unimplemented("blas", TRSM, format!("for {}", T::KIND)))?;
        debug!(routine = routine.name, groups = groups.len(), "submitting");

        Ok(queue.submit(TRSM, dependencies, || {
            let mut offset = 0usize;
            for g in groups {
                let size = g.size as usize;
                let range = offset..offset + size;
                offset += size;
                if size == 0 {
                    continue;
                }

                let a_ptrs: Vec<*mut c_void> =
                    a[range.clone()].iter().map(|m| m.as_ptr() as *mut c_void).collect();
                let b_ptrs: Vec<*mut c_void> =
                    b[range].iter_mut().map(|m| m.as_mut_ptr().cast()).collect();
                let a_dev = device_ptrs(&a_ptrs, device)?;
                let b_dev = device_ptrs(&b_ptrs, device)?;

                self.with_handle(device, |handle| {
                    // SAFETY: as for gemm_batch_group.
                    let status = unsafe {
                        (routine.func)(
                            handle,
                            g.side as u32,
                            g.uplo as u32,
                            g.trans as u32,
                            g.diag as u32,
                            g.m as i32,
                            g.n as i32,
                            (&g.alpha as *const T).cast(),
                            a_dev.as_const(),
                            g.lda as i32,
                            b_dev.as_mut(),
                            g.ldb as i32,
                            size as i32,
                        )
                    };
                    check_rocblas(status, routine.name).map_err(|e| e.into_linhal("blas", device))
                })?;
            }
            Ok(())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_shape_swaps_for_transposes() {
        assert_eq!(stored_shape(Transpose::NoTrans, 3, 5), (3, 5));
        assert_eq!(stored_shape(Transpose::Trans, 3, 5), (5, 3));
        assert_eq!(stored_shape(Transpose::ConjTrans, 3, 5), (5, 3));
    }

    #[test]
    fn supports_only_amd() {
        let backend = RocblasBackend::new();
        assert!(backend.supports(&Device::gpu(Vendor::Amd, 0, "gfx90a")));
        assert!(!backend.supports(&Device::host()));
        assert!(!backend.supports(&Device::gpu(Vendor::Nvidia, 0, "sm_80")));
    }

    #[test]
    fn row_major_is_rejected_before_anything_else() {
        let err = column_major_only(GEMM, Layout::RowMajor).unwrap_err();
        assert_eq!(err.to_string(), "blas::gemm_batch is not implemented for row_major layout");
    }
}
