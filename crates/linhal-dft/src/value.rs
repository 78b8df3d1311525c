//! Dynamically-typed parameter values for `set_value`/`get_value`.

use crate::types::{ConfigValue, Domain, Precision};

/// A value passed to or returned from the descriptor's get/set table.
///
/// `Null` stands for an absent array; array parameters reject it.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Null,
    Int(i64),
    Real(f64),
    Bool(bool),
    Ints(Vec<i64>),
    Config(ConfigValue),
    Domain(Domain),
    Precision(Precision),
}

impl ParamValue {
    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::Null => "null",
            ParamValue::Int(_) => "integer",
            ParamValue::Real(_) => "real",
            ParamValue::Bool(_) => "bool",
            ParamValue::Ints(_) => "integer array",
            ParamValue::Config(_) => "config value",
            ParamValue::Domain(_) => "domain",
            ParamValue::Precision(_) => "precision",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Reals, and integers widened to reals.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            ParamValue::Real(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_ints(&self) -> Option<&[i64]> {
        match self {
            ParamValue::Ints(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_config(&self) -> Option<ConfigValue> {
        match self {
            ParamValue::Config(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_domain(&self) -> Option<Domain> {
        match self {
            ParamValue::Domain(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_precision(&self) -> Option<Precision> {
        match self {
            ParamValue::Precision(v) => Some(*v),
            _ => None,
        }
    }
}

macro_rules! from_int {
    ($($ty:ty),*) => {$(
        impl From<$ty> for ParamValue {
            fn from(v: $ty) -> Self {
                ParamValue::Int(v as i64)
            }
        }
    )*};
}

from_int!(i32, i64, usize);

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::Real(f64::from(v))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Real(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<Vec<i64>> for ParamValue {
    fn from(v: Vec<i64>) -> Self {
        ParamValue::Ints(v)
    }
}

impl From<&[i64]> for ParamValue {
    fn from(v: &[i64]) -> Self {
        ParamValue::Ints(v.to_vec())
    }
}

impl<const N: usize> From<[i64; N]> for ParamValue {
    fn from(v: [i64; N]) -> Self {
        ParamValue::Ints(v.to_vec())
    }
}

impl<const N: usize> From<&[i64; N]> for ParamValue {
    fn from(v: &[i64; N]) -> Self {
        ParamValue::Ints(v.to_vec())
    }
}

impl From<ConfigValue> for ParamValue {
    fn from(v: ConfigValue) -> Self {
        ParamValue::Config(v)
    }
}

impl From<Domain> for ParamValue {
    fn from(v: Domain) -> Self {
        ParamValue::Domain(v)
    }
}

impl From<Precision> for ParamValue {
    fn from(v: Precision) -> Self {
        ParamValue::Precision(v)
    }
}

/// `None` becomes [`ParamValue::Null`].
impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ParamValue::Null, Into::into)
    }
}
