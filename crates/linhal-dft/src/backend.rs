//! The backend seam of the DFT layer.
//!
//! A [`DftBackend`] turns committed descriptor values into a [`DftPlan`];
//! the compute functions hand the plan type-erased data views so the seam
//! stays object-safe across precisions and domains.

use crate::descriptor::DescriptorValues;
use crate::types::{ConfigValue, Direction};
use linhal_common::{BackendInfo, Complex32, Complex64, Event, LinhalError, Queue, Result};
use std::ffi::c_void;

/// Read-only view of transform data.
#[derive(Debug, Clone, Copy)]
pub enum DftData<'a> {
    F32(&'a [f32]),
    F64(&'a [f64]),
    C32(&'a [Complex32]),
    C64(&'a [Complex64]),
}

/// Writable view of transform data.
#[derive(Debug)]
pub enum DftDataMut<'a> {
    F32(&'a mut [f32]),
    F64(&'a mut [f64]),
    C32(&'a mut [Complex32]),
    C64(&'a mut [Complex64]),
}

impl DftData<'_> {
    pub fn len(&self) -> usize {
        match self {
            DftData::F32(s) => s.len(),
            DftData::F64(s) => s.len(),
            DftData::C32(s) => s.len(),
            DftData::C64(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_ptr(&self) -> *const c_void {
        match self {
            DftData::F32(s) => s.as_ptr().cast(),
            DftData::F64(s) => s.as_ptr().cast(),
            DftData::C32(s) => s.as_ptr().cast(),
            DftData::C64(s) => s.as_ptr().cast(),
        }
    }
}

impl DftDataMut<'_> {
    pub fn len(&self) -> usize {
        match self {
            DftDataMut::F32(s) => s.len(),
            DftDataMut::F64(s) => s.len(),
            DftDataMut::C32(s) => s.len(),
            DftDataMut::C64(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_mut_ptr(&mut self) -> *mut c_void {
        match self {
            DftDataMut::F32(s) => s.as_mut_ptr().cast(),
            DftDataMut::F64(s) => s.as_mut_ptr().cast(),
            DftDataMut::C32(s) => s.as_mut_ptr().cast(),
            DftDataMut::C64(s) => s.as_mut_ptr().cast(),
        }
    }
}

/// Data for one compute call, by placement and complex storage.
#[derive(Debug)]
pub enum DftArgs<'a> {
    InPlace { data: DftDataMut<'a> },
    InPlaceSplit { re: DftDataMut<'a>, im: DftDataMut<'a> },
    OutOfPlace { input: DftData<'a>, output: DftDataMut<'a> },
    OutOfPlaceSplit {
        input_re: DftData<'a>,
        input_im: DftData<'a>,
        output_re: DftDataMut<'a>,
        output_im: DftDataMut<'a>,
    },
}

impl DftArgs<'_> {
    pub fn placement(&self) -> ConfigValue {
        match self {
            DftArgs::InPlace { .. } | DftArgs::InPlaceSplit { .. } => ConfigValue::Inplace,
            DftArgs::OutOfPlace { .. } | DftArgs::OutOfPlaceSplit { .. } => ConfigValue::NotInplace,
        }
    }

    pub fn complex_storage(&self) -> ConfigValue {
        match self {
            DftArgs::InPlace { .. } | DftArgs::OutOfPlace { .. } => ConfigValue::ComplexComplex,
            DftArgs::InPlaceSplit { .. } | DftArgs::OutOfPlaceSplit { .. } => ConfigValue::RealReal,
        }
    }
}

/// A committed transform, ready to execute.
pub trait DftPlan: Send + Sync {
    /// Submit one transform to `queue` after `dependencies`.
    fn execute(
        &self,
        queue: &Queue,
        direction: Direction,
        args: DftArgs<'_>,
        dependencies: &[Event],
    ) -> Result<Event>;

    /// Change a scale factor after commit.
    fn set_scale(&mut self, direction: Direction, _scale: f64) -> Result<()> {
        let function = match direction {
            Direction::Forward => "set_forward_scale",
            Direction::Backward => "set_backward_scale",
        };
        Err(LinhalError::unimplemented("dft", function, "after commit for this backend"))
    }
}

/// A vendor FFT library.
pub trait DftBackend: BackendInfo {
    /// Build a plan for `values` on `queue`'s device.
    fn commit(&self, queue: &Queue, values: &DescriptorValues) -> Result<Box<dyn DftPlan>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DftElement;

    #[test]
    fn args_report_their_placement_and_storage() {
        let mut re = [0.0f32; 2];
        let mut im = [0.0f32; 2];
        let args = DftArgs::InPlaceSplit { re: f32::view_mut(&mut re), im: f32::view_mut(&mut im) };
        assert_eq!(args.placement(), ConfigValue::Inplace);
        assert_eq!(args.complex_storage(), ConfigValue::RealReal);
    }

    #[test]
    fn views_keep_length() {
        let data = [Complex64::default(); 3];
        assert_eq!(Complex64::view(&data).len(), 3);
    }
}
