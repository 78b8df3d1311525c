//! Layout-specific entry points.
//!
//! `column_major` and `row_major` expose the same functions; the module only
//! fixes the [`Layout`](linhal_common::Layout) passed to the backend. Each
//! routine comes in three forms:
//!
//! * `<routine>` on [`Buffer`](linhal_common::Buffer)s, returning once the
//!   work is complete;
//! * `<routine>_strided` on slices with a constant stride between batch
//!   entries, returning an [`Event`](linhal_common::Event);
//! * `<routine>_group` on one slice per batch entry, parameterised by group
//!   records, returning an [`Event`](linhal_common::Event).

macro_rules! layout_api {
    ($(#[$meta:meta])* $module:ident, $layout:expr) => {
        $(#[$meta])*
        pub mod $module {
            #![allow(clippy::too_many_arguments)]

            use crate::groups::{
                AxpyGroup, CopyGroup, DgmmGroup, GemmGroup, GemvGroup, MatcopyGroup, SyrkGroup,
                TrsmGroup,
            };
            use crate::registry::backend_for;
            use crate::scalar::{BlasElement, BlasFloat};
            use crate::validate;
            use linhal_common::{
                Buffer, Diag, Event, Layout, Queue, Result, Side, Transpose, Uplo,
            };

            const LAYOUT: Layout = $layout;

            // ── copy_batch ─────────────────────────────────────────────

            /// `y[i] = x[i]` for every batch entry.
            pub fn copy_batch<T: BlasFloat>(
                queue: &Queue,
                n: i64,
                x: &Buffer<T>,
                incx: i64,
                stridex: i64,
                y: &Buffer<T>,
                incy: i64,
                stridey: i64,
                batch_size: i64,
            ) -> Result<()> {
                const ROUTINE: &str = "copy_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                validate::no_alias(ROUTINE, ("y", y.id()), &[("x", x.id())])?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).copy_batch_buffer(
                    queue, LAYOUT, n, x, incx, stridex, y, incy, stridey, batch_size,
                )
            }

            pub fn copy_batch_strided<T: BlasFloat>(
                queue: &Queue,
                n: i64,
                x: &[T],
                incx: i64,
                stridex: i64,
                y: &mut [T],
                incy: i64,
                stridey: i64,
                batch_size: i64,
                dependencies: &[Event],
            ) -> Result<Event> {
                const ROUTINE: &str = "copy_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).copy_batch_strided(
                    queue, LAYOUT, n, x, incx, stridex, y, incy, stridey, batch_size, dependencies,
                )
            }

            pub fn copy_batch_group<T: BlasFloat>(
                queue: &Queue,
                groups: &[CopyGroup],
                x: &[&[T]],
                y: &mut [&mut [T]],
                dependencies: &[Event],
            ) -> Result<Event> {
                const ROUTINE: &str = "copy_batch";
                let total = validate::group_total(ROUTINE, groups)?;
                validate::array_len(ROUTINE, "x", x.len(), total)?;
                validate::array_len(ROUTINE, "y", y.len(), total)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).copy_batch_group(queue, LAYOUT, groups, x, y, dependencies)
            }

            // ── axpy_batch ─────────────────────────────────────────────

            /// `y[i] = alpha * x[i] + y[i]` for every batch entry.
            pub fn axpy_batch<T: BlasFloat>(
                queue: &Queue,
                n: i64,
                alpha: T,
                x: &Buffer<T>,
                incx: i64,
                stridex: i64,
                y: &Buffer<T>,
                incy: i64,
                stridey: i64,
                batch_size: i64,
            ) -> Result<()> {
                const ROUTINE: &str = "axpy_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                validate::no_alias(ROUTINE, ("y", y.id()), &[("x", x.id())])?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).axpy_batch_buffer(
                    queue, LAYOUT, n, alpha, x, incx, stridex, y, incy, stridey, batch_size,
                )
            }

            pub fn axpy_batch_strided<T: BlasFloat>(
                queue: &Queue,
                n: i64,
                alpha: T,
                x: &[T],
                incx: i64,
                stridex: i64,
                y: &mut [T],
                incy: i64,
                stridey: i64,
                batch_size: i64,
                dependencies: &[Event],
            ) -> Result<Event> {
                const ROUTINE: &str = "axpy_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).axpy_batch_strided(
                    queue, LAYOUT, n, alpha, x, incx, stridex, y, incy, stridey, batch_size,
                    dependencies,
                )
            }

            pub fn axpy_batch_group<T: BlasFloat>(
                queue: &Queue,
                groups: &[AxpyGroup<T>],
                x: &[&[T]],
                y: &mut [&mut [T]],
                dependencies: &[Event],
            ) -> Result<Event> {
                const ROUTINE: &str = "axpy_batch";
                let total = validate::group_total(ROUTINE, groups)?;
                validate::array_len(ROUTINE, "x", x.len(), total)?;
                validate::array_len(ROUTINE, "y", y.len(), total)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).axpy_batch_group(queue, LAYOUT, groups, x, y, dependencies)
            }

            // ── gemv_batch ─────────────────────────────────────────────

            /// `y[i] = alpha * op(A[i]) * x[i] + beta * y[i]`.
            pub fn gemv_batch<T: BlasFloat>(
                queue: &Queue,
                trans: Transpose,
                m: i64,
                n: i64,
                alpha: T,
                a: &Buffer<T>,
                lda: i64,
                stride_a: i64,
                x: &Buffer<T>,
                incx: i64,
                stride_x: i64,
                beta: T,
                y: &Buffer<T>,
                incy: i64,
                stride_y: i64,
                batch_size: i64,
            ) -> Result<()> {
                const ROUTINE: &str = "gemv_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                validate::no_alias(ROUTINE, ("y", y.id()), &[("a", a.id()), ("x", x.id())])?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).gemv_batch_buffer(
                    queue, LAYOUT, trans, m, n, alpha, a, lda, stride_a, x, incx, stride_x, beta,
                    y, incy, stride_y, batch_size,
                )
            }

            pub fn gemv_batch_strided<T: BlasFloat>(
                queue: &Queue,
                trans: Transpose,
                m: i64,
                n: i64,
                alpha: T,
                a: &[T],
                lda: i64,
                stride_a: i64,
                x: &[T],
                incx: i64,
                stride_x: i64,
                beta: T,
                y: &mut [T],
                incy: i64,
                stride_y: i64,
                batch_size: i64,
                dependencies: &[Event],
            ) -> Result<Event> {
                const ROUTINE: &str = "gemv_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).gemv_batch_strided(
                    queue, LAYOUT, trans, m, n, alpha, a, lda, stride_a, x, incx, stride_x, beta,
                    y, incy, stride_y, batch_size, dependencies,
                )
            }

            pub fn gemv_batch_group<T: BlasFloat>(
                queue: &Queue,
                groups: &[GemvGroup<T>],
                a: &[&[T]],
                x: &[&[T]],
                y: &mut [&mut [T]],
                dependencies: &[Event],
            ) -> Result<Event> {
                const ROUTINE: &str = "gemv_batch";
                let total = validate::group_total(ROUTINE, groups)?;
                validate::array_len(ROUTINE, "a", a.len(), total)?;
                validate::array_len(ROUTINE, "x", x.len(), total)?;
                validate::array_len(ROUTINE, "y", y.len(), total)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).gemv_batch_group(queue, LAYOUT, groups, a, x, y, dependencies)
            }

            // ── dgmm_batch ─────────────────────────────────────────────

            /// `C[i] = A[i] * diag(x[i])` (right) or `diag(x[i]) * A[i]` (left).
            pub fn dgmm_batch<T: BlasFloat>(
                queue: &Queue,
                side: Side,
                m: i64,
                n: i64,
                a: &Buffer<T>,
                lda: i64,
                stride_a: i64,
                x: &Buffer<T>,
                incx: i64,
                stride_x: i64,
                c: &Buffer<T>,
                ldc: i64,
                stride_c: i64,
                batch_size: i64,
            ) -> Result<()> {
                const ROUTINE: &str = "dgmm_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                validate::no_alias(ROUTINE, ("c", c.id()), &[("a", a.id()), ("x", x.id())])?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).dgmm_batch_buffer(
                    queue, LAYOUT, side, m, n, a, lda, stride_a, x, incx, stride_x, c, ldc,
                    stride_c, batch_size,
                )
            }

            pub fn dgmm_batch_strided<T: BlasFloat>(
                queue: &Queue,
                side: Side,
                m: i64,
                n: i64,
                a: &[T],
                lda: i64,
                stride_a: i64,
                x: &[T],
                incx: i64,
                stride_x: i64,
                c: &mut [T],
                ldc: i64,
                stride_c: i64,
                batch_size: i64,
                dependencies: &[Event],
            ) -> Result<Event> {
                const ROUTINE: &str = "dgmm_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).dgmm_batch_strided(
                    queue, LAYOUT, side, m, n, a, lda, stride_a, x, incx, stride_x, c, ldc,
                    stride_c, batch_size, dependencies,
                )
            }

            pub fn dgmm_batch_group<T: BlasFloat>(
                queue: &Queue,
                groups: &[DgmmGroup],
                a: &[&[T]],
                x: &[&[T]],
                c: &mut [&mut [T]],
                dependencies: &[Event],
            ) -> Result<Event> {
                const ROUTINE: &str = "dgmm_batch";
                let total = validate::group_total(ROUTINE, groups)?;
                validate::array_len(ROUTINE, "a", a.len(), total)?;
                validate::array_len(ROUTINE, "x", x.len(), total)?;
                validate::array_len(ROUTINE, "c", c.len(), total)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).dgmm_batch_group(queue, LAYOUT, groups, a, x, c, dependencies)
            }

            // ── gemm_batch ─────────────────────────────────────────────

            /// `C[i] = alpha * op(A[i]) * op(B[i]) + beta * C[i]`.
            ///
            /// The only routine that also accepts half precision.
            pub fn gemm_batch<T: BlasElement>(
                queue: &Queue,
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
                const ROUTINE: &str = "gemm_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                validate::no_alias(ROUTINE, ("c", c.id()), &[("a", a.id()), ("b", b.id())])?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).gemm_batch_buffer(
                    queue, LAYOUT, transa, transb, m, n, k, alpha, a, lda, stride_a, b, ldb,
                    stride_b, beta, c, ldc, stride_c, batch_size,
                )
            }

            pub fn gemm_batch_strided<T: BlasElement>(
                queue: &Queue,
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
                const ROUTINE: &str = "gemm_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).gemm_batch_strided(
                    queue, LAYOUT, transa, transb, m, n, k, alpha, a, lda, stride_a, b, ldb,
                    stride_b, beta, c, ldc, stride_c, batch_size, dependencies,
                )
            }

            pub fn gemm_batch_group<T: BlasElement>(
                queue: &Queue,
                groups: &[GemmGroup<T>],
                a: &[&[T]],
                b: &[&[T]],
                c: &mut [&mut [T]],
                dependencies: &[Event],
            ) -> Result<Event> {
                const ROUTINE: &str = "gemm_batch";
                let total = validate::group_total(ROUTINE, groups)?;
                validate::array_len(ROUTINE, "a", a.len(), total)?;
                validate::array_len(ROUTINE, "b", b.len(), total)?;
                validate::array_len(ROUTINE, "c", c.len(), total)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).gemm_batch_group(queue, LAYOUT, groups, a, b, c, dependencies)
            }

            // ── trsm_batch ─────────────────────────────────────────────

            /// Solve `op(A[i]) * X = alpha * B[i]` (or `X * op(A[i])`), overwriting `B[i]`.
            pub fn trsm_batch<T: BlasFloat>(
                queue: &Queue,
                side: Side,
                uplo: Uplo,
                trans: Transpose,
                diag: Diag,
                m: i64,
                n: i64,
                alpha: T,
                a: &Buffer<T>,
                lda: i64,
                stride_a: i64,
                b: &Buffer<T>,
                ldb: i64,
                stride_b: i64,
                batch_size: i64,
            ) -> Result<()> {
                const ROUTINE: &str = "trsm_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                validate::no_alias(ROUTINE, ("b", b.id()), &[("a", a.id())])?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).trsm_batch_buffer(
                    queue, LAYOUT, side, uplo, trans, diag, m, n, alpha, a, lda, stride_a, b, ldb,
                    stride_b, batch_size,
                )
            }

            pub fn trsm_batch_strided<T: BlasFloat>(
                queue: &Queue,
                side: Side,
                uplo: Uplo,
                trans: Transpose,
                diag: Diag,
                m: i64,
                n: i64,
                alpha: T,
                a: &[T],
                lda: i64,
                stride_a: i64,
                b: &mut [T],
                ldb: i64,
                stride_b: i64,
                batch_size: i64,
                dependencies: &[Event],
            ) -> Result<Event> {
                const ROUTINE: &str = "trsm_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).trsm_batch_strided(
                    queue, LAYOUT, side, uplo, trans, diag, m, n, alpha, a, lda, stride_a, b, ldb,
                    stride_b, batch_size, dependencies,
                )
            }

            pub fn trsm_batch_group<T: BlasFloat>(
                queue: &Queue,
                groups: &[TrsmGroup<T>],
                a: &[&[T]],
                b: &mut [&mut [T]],
                dependencies: &[Event],
            ) -> Result<Event> {
                const ROUTINE: &str = "trsm_batch";
                let total = validate::group_total(ROUTINE, groups)?;
                validate::array_len(ROUTINE, "a", a.len(), total)?;
                validate::array_len(ROUTINE, "b", b.len(), total)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).trsm_batch_group(queue, LAYOUT, groups, a, b, dependencies)
            }

            // ── syrk_batch ─────────────────────────────────────────────

            /// `C[i] = alpha * op(A[i]) * op(A[i])^T + beta * C[i]` on one triangle.
            pub fn syrk_batch<T: BlasFloat>(
                queue: &Queue,
                uplo: Uplo,
                trans: Transpose,
                n: i64,
                k: i64,
                alpha: T,
                a: &Buffer<T>,
                lda: i64,
                stride_a: i64,
                beta: T,
                c: &Buffer<T>,
                ldc: i64,
                stride_c: i64,
                batch_size: i64,
            ) -> Result<()> {
                const ROUTINE: &str = "syrk_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                validate::no_alias(ROUTINE, ("c", c.id()), &[("a", a.id())])?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).syrk_batch_buffer(
                    queue, LAYOUT, uplo, trans, n, k, alpha, a, lda, stride_a, beta, c, ldc,
                    stride_c, batch_size,
                )
            }

            pub fn syrk_batch_strided<T: BlasFloat>(
                queue: &Queue,
                uplo: Uplo,
                trans: Transpose,
                n: i64,
                k: i64,
                alpha: T,
                a: &[T],
                lda: i64,
                stride_a: i64,
                beta: T,
                c: &mut [T],
                ldc: i64,
                stride_c: i64,
                batch_size: i64,
                dependencies: &[Event],
            ) -> Result<Event> {
                const ROUTINE: &str = "syrk_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).syrk_batch_strided(
                    queue, LAYOUT, uplo, trans, n, k, alpha, a, lda, stride_a, beta, c, ldc,
                    stride_c, batch_size, dependencies,
                )
            }

            pub fn syrk_batch_group<T: BlasFloat>(
                queue: &Queue,
                groups: &[SyrkGroup<T>],
                a: &[&[T]],
                c: &mut [&mut [T]],
                dependencies: &[Event],
            ) -> Result<Event> {
                const ROUTINE: &str = "syrk_batch";
                let total = validate::group_total(ROUTINE, groups)?;
                validate::array_len(ROUTINE, "a", a.len(), total)?;
                validate::array_len(ROUTINE, "c", c.len(), total)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).syrk_batch_group(queue, LAYOUT, groups, a, c, dependencies)
            }

            // ── omatcopy_batch ─────────────────────────────────────────

            /// `B[i] = alpha * op(A[i])`, out of place.
            pub fn omatcopy_batch<T: BlasFloat>(
                queue: &Queue,
                trans: Transpose,
                m: i64,
                n: i64,
                alpha: T,
                a: &Buffer<T>,
                lda: i64,
                stride_a: i64,
                b: &Buffer<T>,
                ldb: i64,
                stride_b: i64,
                batch_size: i64,
            ) -> Result<()> {
                const ROUTINE: &str = "omatcopy_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                validate::no_alias(ROUTINE, ("b", b.id()), &[("a", a.id())])?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).omatcopy_batch_buffer(
                    queue, LAYOUT, trans, m, n, alpha, a, lda, stride_a, b, ldb, stride_b,
                    batch_size,
                )
            }

            pub fn omatcopy_batch_strided<T: BlasFloat>(
                queue: &Queue,
                trans: Transpose,
                m: i64,
                n: i64,
                alpha: T,
                a: &[T],
                lda: i64,
                stride_a: i64,
                b: &mut [T],
                ldb: i64,
                stride_b: i64,
                batch_size: i64,
                dependencies: &[Event],
            ) -> Result<Event> {
                const ROUTINE: &str = "omatcopy_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).omatcopy_batch_strided(
                    queue, LAYOUT, trans, m, n, alpha, a, lda, stride_a, b, ldb, stride_b,
                    batch_size, dependencies,
                )
            }

            pub fn omatcopy_batch_group<T: BlasFloat>(
                queue: &Queue,
                groups: &[MatcopyGroup<T>],
                a: &[&[T]],
                b: &mut [&mut [T]],
                dependencies: &[Event],
            ) -> Result<Event> {
                const ROUTINE: &str = "omatcopy_batch";
                let total = validate::group_total(ROUTINE, groups)?;
                validate::array_len(ROUTINE, "a", a.len(), total)?;
                validate::array_len(ROUTINE, "b", b.len(), total)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).omatcopy_batch_group(queue, LAYOUT, groups, a, b, dependencies)
            }

            // ── imatcopy_batch ─────────────────────────────────────────

            /// `AB[i] = alpha * op(AB[i])`, in place.
            pub fn imatcopy_batch<T: BlasFloat>(
                queue: &Queue,
                trans: Transpose,
                m: i64,
                n: i64,
                alpha: T,
                ab: &Buffer<T>,
                lda: i64,
                ldb: i64,
                stride: i64,
                batch_size: i64,
            ) -> Result<()> {
                const ROUTINE: &str = "imatcopy_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).imatcopy_batch_buffer(
                    queue, LAYOUT, trans, m, n, alpha, ab, lda, ldb, stride, batch_size,
                )
            }

            pub fn imatcopy_batch_strided<T: BlasFloat>(
                queue: &Queue,
                trans: Transpose,
                m: i64,
                n: i64,
                alpha: T,
                ab: &mut [T],
                lda: i64,
                ldb: i64,
                stride: i64,
                batch_size: i64,
                dependencies: &[Event],
            ) -> Result<Event> {
                const ROUTINE: &str = "imatcopy_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).imatcopy_batch_strided(
                    queue, LAYOUT, trans, m, n, alpha, ab, lda, ldb, stride, batch_size,
                    dependencies,
                )
            }

            pub fn imatcopy_batch_group<T: BlasFloat>(
                queue: &Queue,
                groups: &[MatcopyGroup<T>],
                ab: &mut [&mut [T]],
                dependencies: &[Event],
            ) -> Result<Event> {
                const ROUTINE: &str = "imatcopy_batch";
                let total = validate::group_total(ROUTINE, groups)?;
                validate::array_len(ROUTINE, "ab", ab.len(), total)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).imatcopy_batch_group(queue, LAYOUT, groups, ab, dependencies)
            }

            // ── omatadd_batch ──────────────────────────────────────────

            /// `C[i] = alpha * op(A[i]) + beta * op(B[i])`. No grouped form.
            pub fn omatadd_batch<T: BlasFloat>(
                queue: &Queue,
                transa: Transpose,
                transb: Transpose,
                m: i64,
                n: i64,
                alpha: T,
                a: &Buffer<T>,
                lda: i64,
                stride_a: i64,
                beta: T,
                b: &Buffer<T>,
                ldb: i64,
                stride_b: i64,
                c: &Buffer<T>,
                ldc: i64,
                stride_c: i64,
                batch_size: i64,
            ) -> Result<()> {
                const ROUTINE: &str = "omatadd_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                validate::no_alias(ROUTINE, ("c", c.id()), &[("a", a.id()), ("b", b.id())])?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).omatadd_batch_buffer(
                    queue, LAYOUT, transa, transb, m, n, alpha, a, lda, stride_a, beta, b, ldb,
                    stride_b, c, ldc, stride_c, batch_size,
                )
            }

            pub fn omatadd_batch_strided<T: BlasFloat>(
                queue: &Queue,
                transa: Transpose,
                transb: Transpose,
                m: i64,
                n: i64,
                alpha: T,
                a: &[T],
                lda: i64,
                stride_a: i64,
                beta: T,
                b: &[T],
                ldb: i64,
                stride_b: i64,
                c: &mut [T],
                ldc: i64,
                stride_c: i64,
                batch_size: i64,
                dependencies: &[Event],
            ) -> Result<Event> {
                const ROUTINE: &str = "omatadd_batch";
                validate::batch_size(ROUTINE, batch_size)?;
                let backend = backend_for(queue, ROUTINE, LAYOUT)?;
                T::routines(&*backend).omatadd_batch_strided(
                    queue, LAYOUT, transa, transb, m, n, alpha, a, lda, stride_a, beta, b, ldb,
                    stride_b, c, ldc, stride_c, batch_size, dependencies,
                )
            }
        }
    };
}

layout_api!(
    /// Column-major (Fortran order) entry points.
    column_major,
    Layout::ColMajor
);

layout_api!(
    /// Row-major (C order) entry points.
    row_major,
    Layout::RowMajor
);
