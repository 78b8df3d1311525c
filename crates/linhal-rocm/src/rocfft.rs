//! rocFFT plans and execution.
//!
//! Lengths, strides and offsets are given in rocFFT's own order: fastest
//! varying dimension first, in elements. Buffers passed to [`Plan::execute`]
//! must be device-accessible.

use crate::error::Result;
use std::ffi::c_void;
use tracing::debug;

/// `rocfft_result_placement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum Placement {
    InPlace = 0,
    NotInPlace = 1,
}

/// `rocfft_transform_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum TransformType {
    ComplexForward = 0,
    ComplexInverse = 1,
    RealForward = 2,
    RealInverse = 3,
}

/// `rocfft_precision`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum FftPrecision {
    Single = 0,
    Double = 1,
}

/// `rocfft_array_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ArrayType {
    ComplexInterleaved = 0,
    ComplexPlanar = 1,
    Real = 2,
    HermitianInterleaved = 3,
    HermitianPlanar = 4,
}

impl ArrayType {
    /// Planar layouts take two buffers (real and imaginary parts).
    pub fn buffer_count(self) -> usize {
        match self {
            ArrayType::ComplexPlanar | ArrayType::HermitianPlanar => 2,
            _ => 1,
        }
    }
}

/// Everything needed to create one rocFFT plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanSpec {
    pub placement: Placement,
    pub transform: TransformType,
    pub precision: FftPrecision,
    pub lengths: Vec<usize>,
    pub number_of_transforms: usize,
    pub in_array: ArrayType,
    pub out_array: ArrayType,
    pub in_offsets: [usize; 2],
    pub out_offsets: [usize; 2],
    pub in_strides: Vec<usize>,
    pub in_distance: usize,
    pub out_strides: Vec<usize>,
    pub out_distance: usize,
    pub scale: f64,
}

impl PlanSpec {
    fn validate(&self) -> Result<()> {
        use crate::error::RocmError;
        if self.lengths.is_empty() || self.lengths.len() > 3 {
            return Err(RocmError::InvalidArgument(format!(
                "rocFFT supports 1 to 3 dimensions, got {}",
                self.lengths.len()
            )));
        }
        if self.in_strides.len() != self.lengths.len() || self.out_strides.len() != self.lengths.len()
        {
            return Err(RocmError::InvalidArgument("stride count must equal dimension".into()));
        }
        Ok(())
    }
}

#[cfg(feature = "rocfft")]
mod ffi {
    use std::ffi::c_void;

    pub type RocfftPlan = *mut c_void;
    pub type RocfftPlanDescription = *mut c_void;
    pub type RocfftExecutionInfo = *mut c_void;

    unsafe extern "C" {
        pub fn rocfft_setup() -> u32;
        pub fn rocfft_plan_description_create(description: *mut RocfftPlanDescription) -> u32;
        pub fn rocfft_plan_description_destroy(description: RocfftPlanDescription) -> u32;
        pub fn rocfft_plan_description_set_scale_factor(
            description: RocfftPlanDescription,
            scale_factor: f64,
        ) -> u32;
        pub fn rocfft_plan_description_set_data_layout(
            description: RocfftPlanDescription,
            in_array_type: u32,
            out_array_type: u32,
            in_offsets: *const usize,
            out_offsets: *const usize,
            in_strides_size: usize,
            in_strides: *const usize,
            in_distance: usize,
            out_strides_size: usize,
            out_strides: *const usize,
            out_distance: usize,
        ) -> u32;
        pub fn rocfft_plan_create(
            plan: *mut RocfftPlan,
            placement: u32,
            transform_type: u32,
            precision: u32,
            dimensions: usize,
            lengths: *const usize,
            number_of_transforms: usize,
            description: RocfftPlanDescription,
        ) -> u32;
        pub fn rocfft_plan_destroy(plan: RocfftPlan) -> u32;
        pub fn rocfft_execute(
            plan: RocfftPlan,
            in_buffer: *mut *mut c_void,
            out_buffer: *mut *mut c_void,
            info: RocfftExecutionInfo,
        ) -> u32;
    }
}

#[cfg(feature = "rocfft")]
fn ensure_setup() -> Result<()> {
    use std::sync::OnceLock;
    static SETUP: OnceLock<Result<()>> = OnceLock::new();
    SETUP
        .get_or_init(|| {
            // SAFETY: rocfft_setup has no preconditions and is run once.
            let status = unsafe { ffi::rocfft_setup() };
            crate::error::check_rocfft(status, "rocfft_setup")
        })
        .clone()
}

/// Owned `rocfft_plan`.
#[derive(Debug)]
pub struct Plan {
    raw: *mut c_void,
    spec: PlanSpec,
}

// SAFETY: a rocFFT plan is immutable after creation; callers serialise
// execution when they share one.
unsafe impl Send for Plan {}

impl Plan {
    #[cfg(feature = "rocfft")]
    pub fn new(spec: PlanSpec) -> Result<Self> {
        use crate::error::check_rocfft;

        spec.validate()?;
        ensure_setup()?;

        let mut desc: ffi::RocfftPlanDescription = std::ptr::null_mut();
        // SAFETY: out-pointer is valid.
        check_rocfft(
            unsafe { ffi::rocfft_plan_description_create(&mut desc) },
            "rocfft_plan_description_create",
        )?;
        let description = Description(desc);

        // SAFETY: all arrays outlive the calls and their lengths are passed
        // alongside.
        unsafe {
            check_rocfft(
                ffi::rocfft_plan_description_set_scale_factor(description.0, spec.scale),
                "rocfft_plan_description_set_scale_factor",
            )?;
            check_rocfft(
                ffi::rocfft_plan_description_set_data_layout(
                    description.0,
                    spec.in_array as u32,
                    spec.out_array as u32,
                    spec.in_offsets.as_ptr(),
                    spec.out_offsets.as_ptr(),
                    spec.in_strides.len(),
                    spec.in_strides.as_ptr(),
                    spec.in_distance,
                    spec.out_strides.len(),
                    spec.out_strides.as_ptr(),
                    spec.out_distance,
                ),
                "rocfft_plan_description_set_data_layout",
            )?;
        }

        let mut raw: ffi::RocfftPlan = std::ptr::null_mut();
        // SAFETY: as above.
        check_rocfft(
            unsafe {
                ffi::rocfft_plan_create(
                    &mut raw,
                    spec.placement as u32,
                    spec.transform as u32,
                    spec.precision as u32,
                    spec.lengths.len(),
                    spec.lengths.as_ptr(),
                    spec.number_of_transforms,
                    description.0,
                )
            },
            "rocfft_plan_create",
        )?;
        debug!(transform = ?spec.transform, lengths = ?spec.lengths, "created rocFFT plan");
        Ok(Self { raw, spec })
    }

    #[cfg(not(feature = "rocfft"))]
    pub fn new(spec: PlanSpec) -> Result<Self> {
        spec.validate()?;
        debug!(transform = ?spec.transform, "rocFFT plan requested without the rocfft feature");
        Err(crate::error::RocmError::NotLinked { library: "rocFFT", feature: "rocfft" })
    }

    pub fn spec(&self) -> &PlanSpec {
        &self.spec
    }

    /// Run the plan. Out-of-place plans need `outputs`; in-place plans ignore it.
    ///
    /// # Safety
    ///
    /// Every pointer must reference device-accessible memory large enough for
    /// the layout in [`Plan::spec`], and no other access to that memory may
    /// happen until this call returns.
    pub unsafe fn execute(&self, inputs: &mut [*mut c_void], outputs: &mut [*mut c_void]) -> Result<()> {
        if inputs.len() != self.spec.in_array.buffer_count() {
            return Err(crate::error::RocmError::InvalidArgument("input buffer count".into()));
        }
        #[cfg(feature = "rocfft")]
        {
            let out_ptr = if self.spec.placement == Placement::InPlace {
                std::ptr::null_mut()
            } else {
                if outputs.len() != self.spec.out_array.buffer_count() {
                    return Err(crate::error::RocmError::InvalidArgument("output buffer count".into()));
                }
                outputs.as_mut_ptr()
            };
            // SAFETY: upheld by the caller.
            let status =
                unsafe { ffi::rocfft_execute(self.raw, inputs.as_mut_ptr(), out_ptr, std::ptr::null_mut()) };
            crate::error::check_rocfft(status, "rocfft_execute")?;
            crate::hip::device_synchronize()
        }
        #[cfg(not(feature = "rocfft"))]
        {
            let _ = outputs;
            Err(crate::error::RocmError::NotLinked { library: "rocFFT", feature: "rocfft" })
        }
    }
}

impl Drop for Plan {
    fn drop(&mut self) {
        #[cfg(feature = "rocfft")]
        if !self.raw.is_null() {
            // SAFETY: created by rocfft_plan_create, destroyed once.
            let status = unsafe { ffi::rocfft_plan_destroy(self.raw) };
            if let Err(err) = crate::error::check_rocfft(status, "rocfft_plan_destroy") {
                tracing::warn!(error = %err, "failed to destroy rocFFT plan");
            }
        }
    }
}

#[cfg(feature = "rocfft")]
struct Description(ffi::RocfftPlanDescription);

#[cfg(feature = "rocfft")]
impl Drop for Description {
    fn drop(&mut self) {
        if !self.0.is_null() {
            // SAFETY: created by rocfft_plan_description_create.
            unsafe {
                ffi::rocfft_plan_description_destroy(self.0);
            }
        }
    }
}
