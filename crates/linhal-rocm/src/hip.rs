//! The few HIP runtime calls the library wrappers need: device
//! synchronisation and staging pointer arrays in device memory.
//!
//! Linked only when `rocblas` or `rocfft` is enabled; otherwise every call
//! reports [`RocmError::NotLinked`](crate::RocmError::NotLinked).

use crate::error::Result;
use std::ffi::c_void;

#[cfg(any(feature = "rocblas", feature = "rocfft"))]
mod ffi {
    use std::ffi::c_void;

    pub const HIP_MEMCPY_HOST_TO_DEVICE: u32 = 1;

    #[allow(non_snake_case)]
    unsafe extern "C" {
        pub fn hipMalloc(ptr: *mut *mut c_void, size: usize) -> u32;
        pub fn hipFree(ptr: *mut c_void) -> u32;
        pub fn hipMemcpy(dst: *mut c_void, src: *const c_void, size: usize, kind: u32) -> u32;
        pub fn hipDeviceSynchronize() -> u32;
    }
}

#[cfg(not(any(feature = "rocblas", feature = "rocfft")))]
fn not_linked() -> crate::error::RocmError {
    crate::error::RocmError::NotLinked { library: "HIP", feature: "rocblas` or `rocfft" }
}

/// Block until all work queued on the current device has finished.
pub fn device_synchronize() -> Result<()> {
    #[cfg(any(feature = "rocblas", feature = "rocfft"))]
    {
        // SAFETY: no arguments, no preconditions.
        crate::error::check_hip(unsafe { ffi::hipDeviceSynchronize() }, "hipDeviceSynchronize")
    }
    #[cfg(not(any(feature = "rocblas", feature = "rocfft")))]
    {
        Err(not_linked())
    }
}

/// A device-resident array of device pointers, as the `*_batched` rocBLAS
/// routines expect for their matrix arguments.
#[derive(Debug)]
pub struct DevicePointers {
    raw: *mut c_void,
    len: usize,
}

// SAFETY: owns its allocation exclusively.
unsafe impl Send for DevicePointers {}

impl DevicePointers {
    /// Copy `ptrs` into freshly allocated device memory.
    pub fn upload(ptrs: &[*mut c_void]) -> Result<Self> {
        #[cfg(any(feature = "rocblas", feature = "rocfft"))]
        {
            use crate::error::check_hip;

            let bytes = std::mem::size_of_val(ptrs);
            let mut array = Self { raw: std::ptr::null_mut(), len: ptrs.len() };
            if bytes == 0 {
                return Ok(array);
            }
            // SAFETY: valid out-pointer, non-zero size.
            check_hip(unsafe { ffi::hipMalloc(&mut array.raw, bytes) }, "hipMalloc")?;
            // SAFETY: `array.raw` holds `bytes` bytes; `ptrs` is a host slice of that size.
            let status = unsafe {
                ffi::hipMemcpy(array.raw, ptrs.as_ptr().cast(), bytes, ffi::HIP_MEMCPY_HOST_TO_DEVICE)
            };
            check_hip(status, "hipMemcpy")?;
            Ok(array)
        }
        #[cfg(not(any(feature = "rocblas", feature = "rocfft")))]
        {
            let _ = ptrs;
            Err(not_linked())
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_const(&self) -> *const *const c_void {
        self.raw as *const *const c_void
    }

    pub fn as_mut(&self) -> *const *mut c_void {
        self.raw as *const *mut c_void
    }
}

impl Drop for DevicePointers {
    fn drop(&mut self) {
        #[cfg(any(feature = "rocblas", feature = "rocfft"))]
        if !self.raw.is_null() {
            // SAFETY: allocated by hipMalloc in `upload`. hipFree waits for
            // queued work on the device before releasing.
            let status = unsafe { ffi::hipFree(self.raw) };
            if let Err(err) = crate::error::check_hip(status, "hipFree") {
                tracing::warn!(error = %err, "failed to free device pointer array");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RocmError;

    #[cfg(not(any(feature = "rocblas", feature = "rocfft")))]
    #[test]
    fn calls_report_not_linked() {
        assert!(matches!(device_synchronize(), Err(RocmError::NotLinked { library: "HIP", .. })));
        assert!(DevicePointers::upload(&[]).is_err());
    }
}
