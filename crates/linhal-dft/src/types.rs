//! Configuration parameters, their enumerated values, and the type-level
//! precision/domain markers a descriptor is parameterised by.

use crate::backend::{DftData, DftDataMut};
use linhal_common::{Complex32, Complex64, Scalar};
use num_traits::Float;
use std::fmt;

/// Floating-point precision of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    Single,
    Double,
}

/// Forward domain of a transform. The backward domain is always complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Real,
    Complex,
}

/// Every option a descriptor knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigParam {
    ForwardDomain,
    Dimension,
    Lengths,
    Precision,
    ForwardScale,
    BackwardScale,
    NumberOfTransforms,
    ComplexStorage,
    RealStorage,
    ConjugateEvenStorage,
    Placement,
    InputStrides,
    OutputStrides,
    FwdDistance,
    BwdDistance,
    Workspace,
    Ordering,
    Transpose,
    PackedFormat,
    CommitStatus,
}

impl ConfigParam {
    pub const ALL: [ConfigParam; 20] = [
        ConfigParam::ForwardDomain,
        ConfigParam::Dimension,
        ConfigParam::Lengths,
        ConfigParam::Precision,
        ConfigParam::ForwardScale,
        ConfigParam::BackwardScale,
        ConfigParam::NumberOfTransforms,
        ConfigParam::ComplexStorage,
        ConfigParam::RealStorage,
        ConfigParam::ConjugateEvenStorage,
        ConfigParam::Placement,
        ConfigParam::InputStrides,
        ConfigParam::OutputStrides,
        ConfigParam::FwdDistance,
        ConfigParam::BwdDistance,
        ConfigParam::Workspace,
        ConfigParam::Ordering,
        ConfigParam::Transpose,
        ConfigParam::PackedFormat,
        ConfigParam::CommitStatus,
    ];

    /// Fixed by the descriptor's type and shape; never settable.
    pub fn is_read_only(self) -> bool {
        matches!(
            self,
            ConfigParam::ForwardDomain
                | ConfigParam::Precision
                | ConfigParam::Dimension
                | ConfigParam::CommitStatus
        )
    }

    /// Still settable once the descriptor is committed.
    pub fn is_post_commit_mutable(self) -> bool {
        matches!(self, ConfigParam::ForwardScale | ConfigParam::BackwardScale)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigParam::ForwardDomain => "FORWARD_DOMAIN",
            ConfigParam::Dimension => "DIMENSION",
            ConfigParam::Lengths => "LENGTHS",
            ConfigParam::Precision => "PRECISION",
            ConfigParam::ForwardScale => "FORWARD_SCALE",
            ConfigParam::BackwardScale => "BACKWARD_SCALE",
            ConfigParam::NumberOfTransforms => "NUMBER_OF_TRANSFORMS",
            ConfigParam::ComplexStorage => "COMPLEX_STORAGE",
            ConfigParam::RealStorage => "REAL_STORAGE",
            ConfigParam::ConjugateEvenStorage => "CONJUGATE_EVEN_STORAGE",
            ConfigParam::Placement => "PLACEMENT",
            ConfigParam::InputStrides => "INPUT_STRIDES",
            ConfigParam::OutputStrides => "OUTPUT_STRIDES",
            ConfigParam::FwdDistance => "FWD_DISTANCE",
            ConfigParam::BwdDistance => "BWD_DISTANCE",
            ConfigParam::Workspace => "WORKSPACE",
            ConfigParam::Ordering => "ORDERING",
            ConfigParam::Transpose => "TRANSPOSE",
            ConfigParam::PackedFormat => "PACKED_FORMAT",
            ConfigParam::CommitStatus => "COMMIT_STATUS",
        }
    }
}

impl fmt::Display for ConfigParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enumerated parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigValue {
    Committed,
    Uncommitted,
    ComplexComplex,
    RealReal,
    Inplace,
    NotInplace,
    Ordered,
    BackwardScrambled,
    Allow,
    Avoid,
    CceFormat,
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigValue::Committed => "COMMITTED",
            ConfigValue::Uncommitted => "UNCOMMITTED",
            ConfigValue::ComplexComplex => "COMPLEX_COMPLEX",
            ConfigValue::RealReal => "REAL_REAL",
            ConfigValue::Inplace => "INPLACE",
            ConfigValue::NotInplace => "NOT_INPLACE",
            ConfigValue::Ordered => "ORDERED",
            ConfigValue::BackwardScrambled => "BACKWARD_SCRAMBLED",
            ConfigValue::Allow => "ALLOW",
            ConfigValue::Avoid => "AVOID",
            ConfigValue::CceFormat => "CCE_FORMAT",
        };
        f.write_str(name)
    }
}

/// Which way a transform runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward => "compute_forward",
            Direction::Backward => "compute_backward",
        }
    }
}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Single {}
    impl Sealed for super::Double {}
    impl Sealed for super::Real {}
    impl Sealed for super::Complex {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for linhal_common::Complex32 {}
    impl Sealed for linhal_common::Complex64 {}
}

/// Element types a transform reads or writes.
pub trait DftElement: Scalar + private::Sealed {
    fn view(data: &[Self]) -> DftData<'_>;
    fn view_mut(data: &mut [Self]) -> DftDataMut<'_>;
}

macro_rules! dft_element {
    ($($ty:ty => $variant:ident),*) => {$(
        impl DftElement for $ty {
            fn view(data: &[Self]) -> DftData<'_> {
                DftData::$variant(data)
            }

            fn view_mut(data: &mut [Self]) -> DftDataMut<'_> {
                DftDataMut::$variant(data)
            }
        }
    )*};
}

dft_element!(f32 => F32, f64 => F64, Complex32 => C32, Complex64 => C64);

/// Real element type of a precision.
pub trait DftReal: DftElement + Float {}

impl DftReal for f32 {}
impl DftReal for f64 {}

/// Type-level precision.
pub trait PrecisionType: private::Sealed + Send + Sync + 'static {
    const PRECISION: Precision;
    type Real: DftReal;
    type Complex: DftElement;
}

/// Type-level forward domain.
pub trait DomainType: private::Sealed + Send + Sync + 'static {
    const DOMAIN: Domain;
    /// Element type of the forward-domain data.
    type Forward<P: PrecisionType>: DftElement;
}

#[derive(Debug, Clone, Copy)]
pub struct Single;

#[derive(Debug, Clone, Copy)]
pub struct Double;

#[derive(Debug, Clone, Copy)]
pub struct Real;

#[derive(Debug, Clone, Copy)]
pub struct Complex;

impl PrecisionType for Single {
    const PRECISION: Precision = Precision::Single;
    type Real = f32;
    type Complex = Complex32;
}

impl PrecisionType for Double {
    const PRECISION: Precision = Precision::Double;
    type Real = f64;
    type Complex = Complex64;
}

impl DomainType for Real {
    const DOMAIN: Domain = Domain::Real;
    type Forward<P: PrecisionType> = P::Real;
}

impl DomainType for Complex {
    const DOMAIN: Domain = Domain::Complex;
    type Forward<P: PrecisionType> = P::Complex;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_params() {
        let read_only: Vec<_> = ConfigParam::ALL.into_iter().filter(|p| p.is_read_only()).collect();
        assert_eq!(
            read_only,
            vec![
                ConfigParam::ForwardDomain,
                ConfigParam::Dimension,
                ConfigParam::Precision,
                ConfigParam::CommitStatus
            ]
        );
    }

    #[test]
    fn param_names() {
        assert_eq!(ConfigParam::FwdDistance.to_string(), "FWD_DISTANCE");
        assert_eq!(ConfigValue::NotInplace.to_string(), "NOT_INPLACE");
    }
}
