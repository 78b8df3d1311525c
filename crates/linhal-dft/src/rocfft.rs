//! rocFFT backend for AMD devices.
//!
//! Each commit builds two rocFFT plans, one per direction. Descriptor
//! lengths and strides are row-major; rocFFT wants the fastest-varying
//! dimension first, so both are reversed on the way in. Changing a scale
//! after commit rebuilds the affected plan.

use crate::backend::{DftArgs, DftBackend, DftPlan};
use crate::descriptor::DescriptorValues;
use crate::types::{ConfigValue, Direction, Domain, Precision};
use linhal_common::{BackendInfo, Device, Event, LinhalError, Queue, Result, Vendor};
use linhal_rocm::rocfft::{ArrayType, FftPrecision, Placement, Plan, PlanSpec, TransformType};
use std::ffi::c_void;
use std::sync::Mutex;
use tracing::debug;

fn to_usize(name: &str, value: i64) -> Result<usize> {
    usize::try_from(value).map_err(|_| {
        LinhalError::invalid_argument(
            "dft",
            "commit",
            format!("{name} must be non-negative, got {value}"),
        )
    })
}

/// Strides without the offset, fastest first, plus the offset.
fn split_strides(name: &str, strides: &[i64]) -> Result<(usize, Vec<usize>)> {
    let (&offset, rest) = strides
        .split_first()
        .ok_or_else(|| LinhalError::invalid_argument("dft", "commit", format!("{name} is empty")))?;
    let strides = rest.iter().rev().map(|&s| to_usize(name, s)).collect::<Result<Vec<_>>>()?;
    Ok((to_usize(name, offset)?, strides))
}

/// The forward and backward rocFFT plan specs for `values`.
pub fn plan_specs(values: &DescriptorValues) -> Result<(PlanSpec, PlanSpec)> {
    let lengths =
        values.lengths.iter().rev().map(|&n| to_usize("LENGTHS", n)).collect::<Result<Vec<_>>>()?;
    let (in_offset, in_strides) = split_strides("INPUT_STRIDES", &values.input_strides())?;
    let (out_offset, out_strides) = split_strides("OUTPUT_STRIDES", &values.output_strides())?;

    let precision = match values.precision {
        Precision::Single => FftPrecision::Single,
        Precision::Double => FftPrecision::Double,
    };
    let placement = if values.is_in_place() { Placement::InPlace } else { Placement::NotInPlace };
    let split = values.complex_storage == ConfigValue::RealReal;

    // (forward transform, backward transform, forward-domain array, backward-domain array)
    let (fwd_transform, bwd_transform, fwd_array, bwd_array) = match values.domain {
        Domain::Complex => {
            let array =
                if split { ArrayType::ComplexPlanar } else { ArrayType::ComplexInterleaved };
            (TransformType::ComplexForward, TransformType::ComplexInverse, array, array)
        }
        // Descriptors refuse split storage for real domains at commit.
        Domain::Real => (
            TransformType::RealForward,
            TransformType::RealInverse,
            ArrayType::Real,
            ArrayType::HermitianInterleaved,
        ),
    };

    let number_of_transforms = to_usize("NUMBER_OF_TRANSFORMS", values.number_of_transforms)?;
    let fwd_distance = to_usize("FWD_DISTANCE", values.fwd_distance)?;
    let bwd_distance = to_usize("BWD_DISTANCE", values.bwd_distance)?;

    let forward = PlanSpec {
        placement,
        transform: fwd_transform,
        precision,
        lengths: lengths.clone(),
        number_of_transforms,
        in_array: fwd_array,
        out_array: bwd_array,
        in_offsets: [in_offset; 2],
        out_offsets: [out_offset; 2],
        in_strides: in_strides.clone(),
        in_distance: fwd_distance,
        out_strides: out_strides.clone(),
        out_distance: bwd_distance,
        scale: values.forward_scale,
    };
    let backward = PlanSpec {
        placement,
        transform: bwd_transform,
        precision,
        lengths,
        number_of_transforms,
        in_array: bwd_array,
        out_array: fwd_array,
        in_offsets: [out_offset; 2],
        out_offsets: [in_offset; 2],
        in_strides: out_strides,
        in_distance: bwd_distance,
        out_strides: in_strides,
        out_distance: fwd_distance,
        scale: values.backward_scale,
    };
    Ok((forward, backward))
}

/// Routes DFT descriptors on AMD devices to rocFFT.
#[derive(Debug, Default)]
pub struct RocfftBackend;

impl RocfftBackend {
    pub const NAME: &'static str = "rocfft";

    pub fn new() -> Self {
        Self
    }
}

impl BackendInfo for RocfftBackend {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn supports(&self, device: &Device) -> bool {
        device.vendor() == Vendor::Amd
    }
}

impl DftBackend for RocfftBackend {
    fn commit(&self, queue: &Queue, values: &DescriptorValues) -> Result<Box<dyn DftPlan>> {
        let device = queue.device().clone();
        let (forward, backward) = plan_specs(values)?;
        let forward = Plan::new(forward).map_err(|e| e.into_linhal("dft", &device))?;
        let backward = Plan::new(backward).map_err(|e| e.into_linhal("dft", &device))?;
        debug!(device = %device, lengths = ?values.lengths, "rocFFT plans ready");
        Ok(Box::new(RocfftPlan {
            forward: Mutex::new(forward),
            backward: Mutex::new(backward),
            device,
        }))
    }
}

struct RocfftPlan {
    forward: Mutex<Plan>,
    backward: Mutex<Plan>,
    device: Device,
}

impl RocfftPlan {
    fn slot(&self, direction: Direction) -> &Mutex<Plan> {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        }
    }
}

/// Input and output buffer pointers in rocFFT's argument order.
fn pointers(args: DftArgs<'_>) -> (Vec<*mut c_void>, Vec<*mut c_void>) {
    match args {
        DftArgs::InPlace { mut data } => (vec![data.as_mut_ptr()], vec![]),
        DftArgs::InPlaceSplit { mut re, mut im } => (vec![re.as_mut_ptr(), im.as_mut_ptr()], vec![]),
        DftArgs::OutOfPlace { input, mut output } => {
            (vec![input.as_ptr() as *mut c_void], vec![output.as_mut_ptr()])
        }
        DftArgs::OutOfPlaceSplit { input_re, input_im, mut output_re, mut output_im } => (
            vec![input_re.as_ptr() as *mut c_void, input_im.as_ptr() as *mut c_void],
            vec![output_re.as_mut_ptr(), output_im.as_mut_ptr()],
        ),
    }
}

impl DftPlan for RocfftPlan {
    fn execute(
        &self,
        queue: &Queue,
        direction: Direction,
        args: DftArgs<'_>,
        dependencies: &[Event],
    ) -> Result<Event> {
        let (mut inputs, mut outputs) = pointers(args);
        let slot = self.slot(direction);
        Ok(queue.submit(direction.as_str(), dependencies, || {
            let plan = slot.lock().unwrap_or_else(|e| e.into_inner());
            // SAFETY: the pointers come from slices borrowed for this call,
            // the front-end matched them to the plan's placement and storage
            // and checked each covers its layout's extent. Callers provide
            // device-accessible memory.
            unsafe { plan.execute(&mut inputs, &mut outputs) }
                .map_err(|e| e.into_linhal("dft", &self.device))
        }))
    }

    fn set_scale(&mut self, direction: Direction, scale: f64) -> Result<()> {
        let device = self.device.clone();
        let plan = match direction {
            Direction::Forward => self.forward.get_mut(),
            Direction::Backward => self.backward.get_mut(),
        }
        .unwrap_or_else(|e| e.into_inner());
        let mut spec = plan.spec().clone();
        spec.scale = scale;
        *plan = Plan::new(spec).map_err(|e| e.into_linhal("dft", &device))?;
        debug!(?direction, scale, "rebuilt rocFFT plan with new scale");
        Ok(())
    }
}
