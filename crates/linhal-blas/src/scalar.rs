//! Element types accepted by the batched BLAS front-end.

use crate::backend::{BatchRoutines, BlasBackend};
use half::f16;
use linhal_common::Scalar;
use num_complex::{Complex32, Complex64};

mod private {
    pub trait Sealed {}
    impl Sealed for half::f16 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for num_complex::Complex32 {}
    impl Sealed for num_complex::Complex64 {}
}

/// An element type every [`BlasBackend`] provides routines for.
pub trait BlasElement: Scalar + private::Sealed {
    /// View `backend` as the routine table for `Self`.
    fn routines(backend: &dyn BlasBackend) -> &dyn BatchRoutines<Self>;
}

/// Element types for which the full routine set exists; half precision is
/// only accepted by `gemm_batch`.
pub trait BlasFloat: BlasElement {}

macro_rules! blas_element {
    ($($ty:ty),*) => {$(
        impl BlasElement for $ty {
            fn routines(backend: &dyn BlasBackend) -> &dyn BatchRoutines<Self> {
                backend
            }
        }
    )*};
}

blas_element!(f16, f32, f64, Complex32, Complex64);

impl BlasFloat for f32 {}
impl BlasFloat for f64 {}
impl BlasFloat for Complex32 {}
impl BlasFloat for Complex64 {}
