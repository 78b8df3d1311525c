//! Per-group parameter records for the grouped batch calls.
//!
//! A grouped call takes one record per group and one slice per matrix or
//! vector. Slices are laid out group after group: the first `groups[0].size`
//! entries belong to group 0, the next `groups[1].size` to group 1, and so on.

use linhal_common::{Diag, Side, Transpose, Uplo};

/// Number of batch entries covered by a group record.
pub trait Group {
    fn size(&self) -> i64;
}

macro_rules! impl_group {
    ($($name:ident $(<$t:ident>)?),* $(,)?) => {$(
        impl$(<$t>)? Group for $name$(<$t>)? {
            fn size(&self) -> i64 {
                self.size
            }
        }
    )*};
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CopyGroup {
    pub n: i64,
    pub incx: i64,
    pub incy: i64,
    pub size: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxpyGroup<T> {
    pub n: i64,
    pub alpha: T,
    pub incx: i64,
    pub incy: i64,
    pub size: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GemvGroup<T> {
    pub trans: Transpose,
    pub m: i64,
    pub n: i64,
    pub alpha: T,
    pub lda: i64,
    pub incx: i64,
    pub beta: T,
    pub incy: i64,
    pub size: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DgmmGroup {
    pub side: Side,
    pub m: i64,
    pub n: i64,
    pub lda: i64,
    pub incx: i64,
    pub ldc: i64,
    pub size: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GemmGroup<T> {
    pub transa: Transpose,
    pub transb: Transpose,
    pub m: i64,
    pub n: i64,
    pub k: i64,
    pub alpha: T,
    pub lda: i64,
    pub ldb: i64,
    pub beta: T,
    pub ldc: i64,
    pub size: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrsmGroup<T> {
    pub side: Side,
    pub uplo: Uplo,
    pub trans: Transpose,
    pub diag: Diag,
    pub m: i64,
    pub n: i64,
    pub alpha: T,
    pub lda: i64,
    pub ldb: i64,
    pub size: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyrkGroup<T> {
    pub uplo: Uplo,
    pub trans: Transpose,
    pub n: i64,
    pub k: i64,
    pub alpha: T,
    pub lda: i64,
    pub beta: T,
    pub ldc: i64,
    pub size: i64,
}

/// Used by both `omatcopy_batch` and `imatcopy_batch`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcopyGroup<T> {
    pub trans: Transpose,
    pub m: i64,
    pub n: i64,
    pub alpha: T,
    pub lda: i64,
    pub ldb: i64,
    pub size: i64,
}

impl_group!(
    CopyGroup,
    AxpyGroup<T>,
    GemvGroup<T>,
    DgmmGroup,
    GemmGroup<T>,
    TrsmGroup<T>,
    SyrkGroup<T>,
    MatcopyGroup<T>,
);
