//! rocBLAS backend argument handling. These run without a GPU: every case
//! fails before a rocBLAS entry point would be called.

use linhal_blas::{
    BatchRoutines, GemmGroup, Layout, RocblasBackend, Side, TrsmGroup, Transpose, column_major,
    row_major,
};
use linhal_common::{Device, Diag, LinhalError, Queue, Uplo, Vendor};
use num_complex::Complex32;

fn amd_queue() -> Queue {
    Queue::new(Device::gpu(Vendor::Amd, 0, "gfx90a"))
}

#[test]
fn row_major_gemm_is_unimplemented() {
    let queue = amd_queue();
    let a = vec![0.0f32; 4];
    let mut c = vec![0.0f32; 4];
    let err = row_major::gemm_batch_strided(
        &queue, Transpose::NoTrans, Transpose::NoTrans, 2, 2, 1, 1.0, &a, 2, 2, &a, 1, 2, 0.0,
        &mut c, 2, 4, 1, &[],
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "blas::gemm_batch is not implemented for row_major layout");
}

#[test]
fn routines_outside_rocblas_are_unimplemented_in_column_major() {
    let backend = RocblasBackend::new();
    let queue = amd_queue();
    let a = vec![Complex32::default(); 4];
    let mut c = vec![Complex32::default(); 4];
    let err = BatchRoutines::<Complex32>::syrk_batch_strided(
        &backend,
        &queue,
        Layout::ColMajor,
        Uplo::Upper,
        Transpose::NoTrans,
        2,
        2,
        Complex32::new(1.0, 0.0),
        &a,
        2,
        4,
        Complex32::default(),
        &mut c,
        2,
        4,
        1,
        &[],
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "blas::syrk_batch is not implemented for column_major layout");
}

#[test]
fn oversized_dimension_is_an_overflow() {
    let queue = amd_queue();
    let a = vec![0.0f64; 1];
    let mut c = vec![0.0f64; 1];
    let too_big = i64::from(i32::MAX) + 1;
    let err = column_major::gemm_batch_strided(
        &queue, Transpose::NoTrans, Transpose::NoTrans, too_big, 1, 1, 1.0, &a, 1, 1, &a, 1, 1,
        0.0, &mut c, 1, 1, 1, &[],
    )
    .unwrap_err();
    assert_eq!(err, LinhalError::Overflow { function: "gemm_batch", argument: "m", value: too_big });
}

#[test]
fn oversized_stride_is_an_overflow() {
    let queue = amd_queue();
    let a = vec![0.0f32; 1];
    let mut c = vec![0.0f32; 1];
    let err = column_major::gemm_batch_strided(
        &queue,
        Transpose::NoTrans,
        Transpose::NoTrans,
        1,
        1,
        1,
        1.0,
        &a,
        1,
        1,
        &a,
        1,
        1,
        0.0,
        &mut c,
        1,
        i64::from(i32::MIN) - 1,
        1,
        &[],
    )
    .unwrap_err();
    assert!(matches!(err, LinhalError::Overflow { argument: "stride_c", .. }));
}

#[test]
fn short_slices_are_rejected() {
    let queue = amd_queue();
    // Two 2x2 matrices 4 apart need 8 elements.
    let a = vec![0.0f32; 7];
    let b = vec![0.0f32; 8];
    let mut c = vec![0.0f32; 8];
    let err = column_major::gemm_batch_strided(
        &queue, Transpose::NoTrans, Transpose::NoTrans, 2, 2, 2, 1.0, &a, 2, 4, &b, 2, 4, 0.0,
        &mut c, 2, 4, 2, &[],
    )
    .unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("`a` holds 7 elements but the call needs 8"));
}

#[test]
fn left_side_triangle_is_m_by_m() {
    let queue = amd_queue();
    let groups = [TrsmGroup {
        side: Side::Left,
        uplo: Uplo::Lower,
        trans: Transpose::Trans,
        diag: Diag::NonUnit,
        m: 3,
        n: 2,
        alpha: 1.0f32,
        lda: 3,
        ldb: 3,
        size: 1,
    }];
    // A must hold a 3x3 triangle, 9 elements.
    let a = vec![0.0f32; 4];
    let mut b = vec![0.0f32; 6];
    let err = column_major::trsm_batch_group(&queue, &groups, &[&a], &mut [&mut b], &[]).unwrap_err();
    assert!(err.to_string().contains("`a` holds 4 elements but the call needs 9"), "{err}");
}

#[test]
fn backend_checks_pointer_array_lengths() {
    let backend = RocblasBackend::new();
    let queue = amd_queue();
    let gemm = [GemmGroup {
        transa: Transpose::NoTrans,
        transb: Transpose::NoTrans,
        m: 2,
        n: 2,
        k: 2,
        alpha: 1.0f32,
        lda: 2,
        ldb: 2,
        beta: 0.0,
        ldc: 2,
        size: 3,
    }];
    let a = vec![0.0f32; 4];
    let mut c = vec![0.0f32; 4];
    let err = BatchRoutines::<f32>::gemm_batch_group(
        &backend,
        &queue,
        Layout::ColMajor,
        &gemm,
        &[&a],
        &[&a, &a, &a],
        &mut [&mut c],
        &[],
    )
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid argument to blas::gemm_batch: `a` has 1 entries but the groups cover 3"
    );

    let trsm = [TrsmGroup {
        side: Side::Right,
        uplo: Uplo::Upper,
        trans: Transpose::NoTrans,
        diag: Diag::Unit,
        m: 2,
        n: 2,
        alpha: 1.0f32,
        lda: 2,
        ldb: 2,
        size: 2,
    }];
    let err = BatchRoutines::<f32>::trsm_batch_group(
        &backend,
        &queue,
        Layout::ColMajor,
        &trsm,
        &[&a, &a],
        &mut [&mut c],
        &[],
    )
    .unwrap_err();
    assert!(err.to_string().contains("`b` has 1 entries but the groups cover 2"), "{err}");
    assert_eq!(queue.submitted(), 0);
}

#[cfg(not(feature = "rocblas"))]
#[test]
fn valid_call_without_rocblas_reports_backend_unavailable() {
    let queue = amd_queue();
    let groups = [GemmGroup {
        transa: Transpose::NoTrans,
        transb: Transpose::ConjTrans,
        m: 2,
        n: 2,
        k: 2,
        alpha: Complex32::new(1.0, 0.0),
        lda: 2,
        ldb: 2,
        beta: Complex32::default(),
        ldc: 2,
        size: 1,
    }];
    let a = vec![Complex32::default(); 4];
    let mut c = vec![Complex32::default(); 4];
    let err = column_major::gemm_batch_group(&queue, &groups, &[&a], &[&a], &mut [&mut c], &[])
        .unwrap_err();
    assert!(err.is_backend_unavailable(), "{err}");
    assert_eq!(queue.submitted(), 0);
}

#[cfg(not(feature = "rocblas"))]
#[test]
fn trsm_without_rocblas_reports_backend_unavailable() {
    let queue = amd_queue();
    let groups = [TrsmGroup {
        side: Side::Left,
        uplo: Uplo::Upper,
        trans: Transpose::NoTrans,
        diag: Diag::Unit,
        m: 2,
        n: 1,
        alpha: 1.0f64,
        lda: 2,
        ldb: 2,
        size: 1,
    }];
    let a = vec![0.0f64; 4];
    let mut b = vec![0.0f64; 2];
    let err =
        column_major::trsm_batch_group(&queue, &groups, &[&a], &mut [&mut b], &[]).unwrap_err();
    assert!(err.is_backend_unavailable());
}
