//! DFT descriptors: a typed get/set table over the transform configuration
//! with a commit step that binds it to a backend plan.
//!
//! Every `set_value` is validated in full before anything is stored, so a
//! failed call leaves the descriptor as it was.

use crate::backend::DftPlan;
use crate::registry;
use crate::types::{
    ConfigParam, ConfigValue, Direction, Domain, DomainType, Precision, PrecisionType,
};
use crate::value::ParamValue;
use linhal_common::{BackendInfo, LinhalError, Queue, Result};
use num_traits::{NumCast, ToPrimitive};
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, info};

const DOMAIN: &str = "dft";

fn invalid(function: &'static str, message: impl Into<String>) -> LinhalError {
    LinhalError::invalid_argument(DOMAIN, function, message)
}

/// Row-major strides of `lengths`, prefixed by a zero offset.
///
/// `{124, 5, 3}` gives `{0, 15, 3, 1}`. Strides past `i64::MAX` saturate;
/// descriptors never hold lengths where that happens.
pub fn default_strides(lengths: &[i64]) -> Vec<i64> {
    row_major_strides(lengths).unwrap_or_else(|| {
        let mut strides = vec![0; lengths.len() + 1];
        let mut stride = 1i64;
        for (i, &n) in lengths.iter().enumerate().rev() {
            strides[i + 1] = stride;
            stride = stride.saturating_mul(n);
        }
        strides
    })
}

/// `None` when a stored stride overflows. The outermost length only
/// bounds the data and never enters a product.
fn row_major_strides(lengths: &[i64]) -> Option<Vec<i64>> {
    let mut strides = vec![0; lengths.len() + 1];
    let mut stride = 1i64;
    for (i, &n) in lengths.iter().enumerate().rev() {
        strides[i + 1] = stride;
        if i > 0 {
            stride = stride.checked_mul(n)?;
        }
    }
    Some(strides)
}

/// Lengths are positive and their default strides fit `i64`.
fn check_lengths(function: &'static str, lengths: &[i64]) -> Result<()> {
    if let Some(n) = lengths.iter().find(|&&n| n <= 0) {
        return Err(invalid(function, format!("lengths must be positive, got {n}")));
    }
    if row_major_strides(lengths).is_none() {
        return Err(invalid(function, format!("lengths {lengths:?} overflow the default strides")));
    }
    Ok(())
}

/// The full configuration of a descriptor, as backends see it at commit.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptorValues {
    pub precision: Precision,
    pub domain: Domain,
    pub lengths: Vec<i64>,
    pub forward_scale: f64,
    pub backward_scale: f64,
    pub number_of_transforms: i64,
    pub fwd_distance: i64,
    pub bwd_distance: i64,
    pub placement: ConfigValue,
    pub complex_storage: ConfigValue,
    pub real_storage: ConfigValue,
    pub conjugate_even_storage: ConfigValue,
    pub workspace: ConfigValue,
    pub ordering: ConfigValue,
    pub transpose: bool,
    pub packed_format: ConfigValue,
    input_strides: Option<Vec<i64>>,
    output_strides: Option<Vec<i64>>,
}

impl DescriptorValues {
    fn new(precision: Precision, domain: Domain, lengths: Vec<i64>) -> Self {
        Self {
            precision,
            domain,
            lengths,
            forward_scale: 1.0,
            backward_scale: 1.0,
            number_of_transforms: 1,
            fwd_distance: 1,
            bwd_distance: 1,
            placement: ConfigValue::Inplace,
            complex_storage: ConfigValue::ComplexComplex,
            real_storage: ConfigValue::RealReal,
            conjugate_even_storage: ConfigValue::ComplexComplex,
            workspace: ConfigValue::Allow,
            ordering: ConfigValue::Ordered,
            transpose: false,
            packed_format: ConfigValue::CceFormat,
            input_strides: None,
            output_strides: None,
        }
    }

    pub fn dimension(&self) -> usize {
        self.lengths.len()
    }

    /// Explicit input strides, or the defaults for the current lengths.
    pub fn input_strides(&self) -> Vec<i64> {
        self.input_strides.clone().unwrap_or_else(|| default_strides(&self.lengths))
    }

    /// Explicit output strides, or the defaults for the current lengths.
    pub fn output_strides(&self) -> Vec<i64> {
        self.output_strides.clone().unwrap_or_else(|| default_strides(&self.lengths))
    }

    pub fn is_in_place(&self) -> bool {
        self.placement == ConfigValue::Inplace
    }
}

struct CommittedPlan {
    plan: Box<dyn DftPlan>,
    queue: Queue,
    backend: &'static str,
}

/// Configuration of one transform with precision `P` and forward domain `D`.
pub struct Descriptor<P: PrecisionType, D: DomainType> {
    values: DescriptorValues,
    committed: Option<CommittedPlan>,
    _types: PhantomData<fn() -> (P, D)>,
}

impl<P: PrecisionType, D: DomainType> fmt::Debug for Descriptor<P, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("values", &self.values)
            .field("backend", &self.committed.as_ref().map(|c| c.backend))
            .finish()
    }
}

impl<P: PrecisionType, D: DomainType> Descriptor<P, D> {
    /// A descriptor over `lengths`, one entry per dimension, all positive.
    pub fn new(lengths: impl AsRef<[i64]>) -> Result<Self> {
        let lengths = lengths.as_ref();
        if lengths.is_empty() {
            return Err(invalid("descriptor", "at least one dimension is required"));
        }
        check_lengths("descriptor", lengths)?;
        debug!(precision = ?P::PRECISION, domain = ?D::DOMAIN, ?lengths, "created descriptor");
        Ok(Self {
            values: DescriptorValues::new(P::PRECISION, D::DOMAIN, lengths.to_vec()),
            committed: None,
            _types: PhantomData,
        })
    }

    /// Set one parameter. Read-only parameters and malformed values are
    /// [`LinhalError::InvalidArgument`]; recognised options without support
    /// are [`LinhalError::Unimplemented`].
    pub fn set_value(&mut self, param: ConfigParam, value: impl Into<ParamValue>) -> Result<()> {
        const FUNCTION: &str = "set_value";
        let value = value.into();
        debug!(%param, ?value, "set_value");

        if param.is_read_only() {
            return Err(invalid(FUNCTION, format!("{param} is read-only")));
        }
        if matches!(param, ConfigParam::RealStorage | ConfigParam::PackedFormat) {
            return Err(LinhalError::unimplemented(DOMAIN, FUNCTION, format!("for {param}")));
        }
        if self.committed.is_some() && !param.is_post_commit_mutable() {
            return Err(invalid(FUNCTION, format!("{param} cannot change after commit")));
        }

        let mismatch =
            || invalid(FUNCTION, format!("{param} does not accept a {} value", value.kind()));

        match param {
            ConfigParam::Lengths => {
                self.values.lengths = self.lengths_from(&value)?;
            }
            ConfigParam::InputStrides => {
                self.values.input_strides = Some(self.strides_from(param, &value)?);
            }
            ConfigParam::OutputStrides => {
                self.values.output_strides = Some(self.strides_from(param, &value)?);
            }
            ConfigParam::ForwardScale | ConfigParam::BackwardScale => {
                let scale = value.as_real().ok_or_else(mismatch)?;
                if !scale.is_finite() {
                    return Err(invalid(FUNCTION, format!("{param} must be finite, got {scale}")));
                }
                let scale = round_to::<P>(scale);
                let direction = if param == ConfigParam::ForwardScale {
                    Direction::Forward
                } else {
                    Direction::Backward
                };
                if let Some(committed) = &mut self.committed {
                    committed.plan.set_scale(direction, scale)?;
                }
                match direction {
                    Direction::Forward => self.values.forward_scale = scale,
                    Direction::Backward => self.values.backward_scale = scale,
                }
            }
            ConfigParam::NumberOfTransforms => {
                self.values.number_of_transforms = positive(param, &value)?;
            }
            ConfigParam::FwdDistance => self.values.fwd_distance = positive(param, &value)?,
            ConfigParam::BwdDistance => self.values.bwd_distance = positive(param, &value)?,
            ConfigParam::Placement => {
                self.values.placement =
                    one_of(param, &value, &[ConfigValue::Inplace, ConfigValue::NotInplace])?;
            }
            ConfigParam::ComplexStorage => {
                self.values.complex_storage = one_of(
                    param,
                    &value,
                    &[ConfigValue::ComplexComplex, ConfigValue::RealReal],
                )?;
            }
            ConfigParam::ConjugateEvenStorage => {
                self.values.conjugate_even_storage =
                    one_of(param, &value, &[ConfigValue::ComplexComplex])?;
            }
            ConfigParam::Workspace => {
                self.values.workspace =
                    one_of(param, &value, &[ConfigValue::Allow, ConfigValue::Avoid])?;
            }
            ConfigParam::Ordering => match value.as_config() {
                Some(ConfigValue::Ordered) => self.values.ordering = ConfigValue::Ordered,
                Some(ConfigValue::BackwardScrambled) => {
                    return Err(LinhalError::unimplemented(
                        DOMAIN,
                        FUNCTION,
                        format!("for {param} = {}", ConfigValue::BackwardScrambled),
                    ));
                }
                _ => return Err(mismatch()),
            },
            ConfigParam::Transpose => match value.as_bool() {
                Some(false) => self.values.transpose = false,
                Some(true) => {
                    return Err(LinhalError::unimplemented(
                        DOMAIN,
                        FUNCTION,
                        format!("for {param} = true"),
                    ));
                }
                None => return Err(mismatch()),
            },
            ConfigParam::ForwardDomain
            | ConfigParam::Precision
            | ConfigParam::Dimension
            | ConfigParam::CommitStatus
            | ConfigParam::RealStorage
            | ConfigParam::PackedFormat => {
                return Err(invalid(FUNCTION, format!("{param} is not settable")));
            }
        }
        Ok(())
    }

    /// Current value of `param`: what was set, or its default.
    pub fn get_value(&self, param: ConfigParam) -> ParamValue {
        let v = &self.values;
        match param {
            ConfigParam::ForwardDomain => ParamValue::Domain(v.domain),
            ConfigParam::Precision => ParamValue::Precision(v.precision),
            ConfigParam::Dimension => ParamValue::Int(v.dimension() as i64),
            ConfigParam::Lengths => ParamValue::Ints(v.lengths.clone()),
            ConfigParam::ForwardScale => ParamValue::Real(v.forward_scale),
            ConfigParam::BackwardScale => ParamValue::Real(v.backward_scale),
            ConfigParam::NumberOfTransforms => ParamValue::Int(v.number_of_transforms),
            ConfigParam::FwdDistance => ParamValue::Int(v.fwd_distance),
            ConfigParam::BwdDistance => ParamValue::Int(v.bwd_distance),
            ConfigParam::Placement => ParamValue::Config(v.placement),
            ConfigParam::ComplexStorage => ParamValue::Config(v.complex_storage),
            ConfigParam::RealStorage => ParamValue::Config(v.real_storage),
            ConfigParam::ConjugateEvenStorage => ParamValue::Config(v.conjugate_even_storage),
            ConfigParam::InputStrides => ParamValue::Ints(v.input_strides()),
            ConfigParam::OutputStrides => ParamValue::Ints(v.output_strides()),
            ConfigParam::Workspace => ParamValue::Config(v.workspace),
            ConfigParam::Ordering => ParamValue::Config(v.ordering),
            ConfigParam::Transpose => ParamValue::Bool(v.transpose),
            ConfigParam::PackedFormat => ParamValue::Config(v.packed_format),
            ConfigParam::CommitStatus => ParamValue::Config(if self.is_committed() {
                ConfigValue::Committed
            } else {
                ConfigValue::Uncommitted
            }),
        }
    }

    /// Bind the descriptor to `queue`: pick the backend for its device and
    /// build a plan. On failure the descriptor keeps its previous state.
    pub fn commit(&mut self, queue: &Queue) -> Result<()> {
        // Split storage has no compute form for real-domain data.
        if self.values.domain == Domain::Real && self.values.complex_storage == ConfigValue::RealReal
        {
            return Err(LinhalError::unimplemented(
                DOMAIN,
                "commit",
                format!(
                    "for {} = {} on real-domain descriptors",
                    ConfigParam::ComplexStorage,
                    ConfigValue::RealReal
                ),
            ));
        }
        let backend = registry::backend_for(queue)?;
        let plan = backend.commit(queue, &self.values)?;
        info!(
            backend = backend.name(),
            device = %queue.device(),
            lengths = ?self.values.lengths,
            transforms = self.values.number_of_transforms,
            "descriptor committed"
        );
        self.committed = Some(CommittedPlan { plan, queue: queue.clone(), backend: backend.name() });
        Ok(())
    }

    pub fn is_committed(&self) -> bool {
        self.committed.is_some()
    }

    /// Name of the backend the descriptor is committed to.
    pub fn backend_name(&self) -> Option<&'static str> {
        self.committed.as_ref().map(|c| c.backend)
    }

    pub fn values(&self) -> &DescriptorValues {
        &self.values
    }

    pub fn dimension(&self) -> usize {
        self.values.dimension()
    }

    pub fn lengths(&self) -> &[i64] {
        &self.values.lengths
    }

    pub fn forward_scale(&self) -> f64 {
        self.values.forward_scale
    }

    pub fn backward_scale(&self) -> f64 {
        self.values.backward_scale
    }

    pub fn number_of_transforms(&self) -> i64 {
        self.values.number_of_transforms
    }

    pub fn placement(&self) -> ConfigValue {
        self.values.placement
    }

    pub fn complex_storage(&self) -> ConfigValue {
        self.values.complex_storage
    }

    pub fn input_strides(&self) -> Vec<i64> {
        self.values.input_strides()
    }

    pub fn output_strides(&self) -> Vec<i64> {
        self.values.output_strides()
    }

    /// The plan and queue of a committed descriptor.
    pub(crate) fn plan(&self, function: &'static str) -> Result<(&dyn DftPlan, &Queue)> {
        self.committed
            .as_ref()
            .map(|c| (c.plan.as_ref(), &c.queue))
            .ok_or_else(|| invalid(function, "descriptor is not committed"))
    }

    fn lengths_from(&self, value: &ParamValue) -> Result<Vec<i64>> {
        const FUNCTION: &str = "set_value";
        let dim = self.dimension();
        let lengths = match value {
            ParamValue::Null => return Err(invalid(FUNCTION, "LENGTHS requires an array, got null")),
            ParamValue::Int(n) if dim == 1 => vec![*n],
            ParamValue::Ints(v) => v.clone(),
            other => {
                return Err(invalid(
                    FUNCTION,
                    format!("LENGTHS does not accept a {} value for {dim} dimensions", other.kind()),
                ));
            }
        };
        if lengths.len() != dim {
            return Err(invalid(
                FUNCTION,
                format!("LENGTHS needs {dim} entries, got {}", lengths.len()),
            ));
        }
        check_lengths(FUNCTION, &lengths)?;
        Ok(lengths)
    }

    fn strides_from(&self, param: ConfigParam, value: &ParamValue) -> Result<Vec<i64>> {
        const FUNCTION: &str = "set_value";
        let expected = self.dimension() + 1;
        match value {
            ParamValue::Null => Err(invalid(FUNCTION, format!("{param} requires an array, got null"))),
            ParamValue::Ints(v) if v.len() == expected => Ok(v.clone()),
            ParamValue::Ints(v) => Err(invalid(
                FUNCTION,
                format!("{param} needs {expected} entries, got {}", v.len()),
            )),
            other => Err(invalid(FUNCTION, format!("{param} does not accept a {} value", other.kind()))),
        }
    }
}

fn positive(param: ConfigParam, value: &ParamValue) -> Result<i64> {
    match value.as_int() {
        Some(n) if n > 0 => Ok(n),
        Some(n) => Err(invalid("set_value", format!("{param} must be positive, got {n}"))),
        None => Err(invalid(
            "set_value",
            format!("{param} does not accept a {} value", value.kind()),
        )),
    }
}

fn one_of(param: ConfigParam, value: &ParamValue, allowed: &[ConfigValue]) -> Result<ConfigValue> {
    match value.as_config() {
        Some(v) if allowed.contains(&v) => Ok(v),
        Some(v) => Err(invalid("set_value", format!("{v} is not a valid {param}"))),
        None => Err(invalid(
            "set_value",
            format!("{param} does not accept a {} value", value.kind()),
        )),
    }
}

/// `v` as the nearest value representable in precision `P`.
fn round_to<P: PrecisionType>(v: f64) -> f64 {
    <P::Real as NumCast>::from(v).and_then(|r| r.to_f64()).unwrap_or(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Complex, Double, Real, Single};

    #[test]
    fn default_strides_are_row_major_with_zero_offset() {
        assert_eq!(default_strides(&[124, 5, 3]), vec![0, 15, 3, 1]);
        assert_eq!(default_strides(&[7]), vec![0i64, 1]);
    }

    #[test]
    fn outermost_length_never_enters_a_stride() {
        let desc = Descriptor::<Double, Complex>::new([i64::MAX, 2]).unwrap();
        assert_eq!(desc.get_value(ConfigParam::InputStrides), ParamValue::Ints(vec![0, 2, 1]));
        assert_eq!(desc.get_value(ConfigParam::OutputStrides), ParamValue::Ints(vec![0, 2, 1]));
        assert_eq!(default_strides(&[i64::MAX]), vec![0, 1]);
    }

    #[test]
    fn lengths_whose_strides_overflow_are_rejected() {
        let err = Descriptor::<Single, Complex>::new([2, i64::MAX, 2]).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("overflow the default strides"), "{err}");

        let mut desc = Descriptor::<Single, Complex>::new([2, 2, 2]).unwrap();
        let err = desc.set_value(ConfigParam::Lengths, vec![1i64, i64::MAX / 2, 3]).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(desc.lengths(), &[2, 2, 2]);
    }

    #[test]
    fn scales_are_rounded_to_single_precision() {
        let mut desc = Descriptor::<Single, Complex>::new([8]).unwrap();
        desc.set_value(ConfigParam::ForwardScale, 0.1).unwrap();
        assert_eq!(desc.forward_scale(), <f64 as From<f32>>::from(0.1f32));

        let mut desc = Descriptor::<Double, Real>::new([8]).unwrap();
        desc.set_value(ConfigParam::ForwardScale, 0.1).unwrap();
        assert_eq!(desc.forward_scale(), 0.1);
    }

    #[test]
    fn failed_set_leaves_values_untouched() {
        let mut desc = Descriptor::<Double, Complex>::new([4, 4]).unwrap();
        let before = desc.values().clone();
        assert!(desc.set_value(ConfigParam::Lengths, vec![4i64, 0]).is_err());
        assert!(desc.set_value(ConfigParam::InputStrides, vec![0i64, 1]).is_err());
        assert!(desc.set_value(ConfigParam::Placement, ConfigValue::Allow).is_err());
        assert_eq!(desc.values(), &before);
    }

    #[test]
    fn uncommitted_descriptor_has_no_plan() {
        let desc = Descriptor::<Single, Real>::new([16]).unwrap();
        let err = desc.plan("compute_forward").err().unwrap();
        assert!(err.is_invalid_argument());
        assert_eq!(desc.backend_name(), None);
    }
}
