//! CBLAS-style enumerations and the element types the dispatch layer accepts.
//!
//! The numeric codes match CBLAS, and rocBLAS reuses the same values for its
//! operation/fill/diagonal/side enums, so backends can pass `as i32` through.

use half::f16;
use num_complex::{Complex32, Complex64};
use std::fmt;

/// Memory layout for matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Layout {
    /// Row-major (C-style): elements in a row are contiguous.
    RowMajor = 101,
    /// Column-major (Fortran-style): elements in a column are contiguous.
    #[default]
    ColMajor = 102,
}

impl Layout {
    /// Name used in diagnostics, e.g. `column_major`.
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::RowMajor => "row_major",
            Layout::ColMajor => "column_major",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transpose operation for matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Transpose {
    #[default]
    NoTrans = 111,
    Trans = 112,
    /// Conjugate transpose (for complex types).
    ConjTrans = 113,
}

impl Transpose {
    pub fn is_transposed(self) -> bool {
        !matches!(self, Transpose::NoTrans)
    }
}

/// BLAS triangle specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Uplo {
    #[default]
    Upper = 121,
    Lower = 122,
}

/// BLAS side specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Side {
    #[default]
    Left = 141,
    Right = 142,
}

/// BLAS diagonal specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum Diag {
    #[default]
    NonUnit = 131,
    Unit = 132,
}

/// Runtime tag for the element types routed through the dispatch layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    F16,
    F32,
    F64,
    C32,
    C64,
}

impl ScalarKind {
    pub fn is_complex(self) -> bool {
        matches!(self, ScalarKind::C32 | ScalarKind::C64)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::F16 => "half",
            ScalarKind::F32 => "float",
            ScalarKind::F64 => "double",
            ScalarKind::C32 => "complex<float>",
            ScalarKind::C64 => "complex<double>",
        };
        f.write_str(name)
    }
}

/// An element type the dispatch layer can hand to a backend.
pub trait Scalar: Copy + Default + Send + Sync + fmt::Debug + PartialEq + 'static {
    const KIND: ScalarKind;
}

impl Scalar for f16 {
    const KIND: ScalarKind = ScalarKind::F16;
}

impl Scalar for f32 {
    const KIND: ScalarKind = ScalarKind::F32;
}

impl Scalar for f64 {
    const KIND: ScalarKind = ScalarKind::F64;
}

impl Scalar for Complex32 {
    const KIND: ScalarKind = ScalarKind::C32;
}

impl Scalar for Complex64 {
    const KIND: ScalarKind = ScalarKind::C64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cblas_codes_are_stable() {
        assert_eq!(Layout::RowMajor as u32, 101);
        assert_eq!(Layout::ColMajor as u32, 102);
        assert_eq!(Transpose::ConjTrans as u32, 113);
        assert_eq!(Uplo::Lower as u32, 122);
        assert_eq!(Diag::Unit as u32, 132);
        assert_eq!(Side::Right as u32, 142);
    }

    #[test]
    fn layout_display_matches_diagnostic_names() {
        assert_eq!(Layout::ColMajor.to_string(), "column_major");
        assert_eq!(Layout::RowMajor.to_string(), "row_major");
    }

    #[test]
    fn scalar_kinds() {
        assert_eq!(<f16 as Scalar>::KIND, ScalarKind::F16);
        assert_eq!(<Complex64 as Scalar>::KIND, ScalarKind::C64);
        assert!(ScalarKind::C32.is_complex());
        assert!(!ScalarKind::F64.is_complex());
    }
}
