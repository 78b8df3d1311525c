//! HIP device enumeration via dynamic loading.

use crate::error::{HipErrorCode, Result, RocmError, check_hip};
use libloading::{Library, Symbol};
use linhal_common::{Device, DispatchConfig, Queue, Vendor};
use std::ffi::{CStr, c_char, c_int};
use tracing::{info, warn};

#[cfg(target_os = "linux")]
const HIP_LIBRARY: &str = "libamdhip64.so";
#[cfg(target_os = "windows")]
const HIP_LIBRARY: &str = "amdhip64.dll";
#[cfg(not(any(target_os = "linux", target_os = "windows")))]
const HIP_LIBRARY: &str = "";

type HipGetDeviceCount = unsafe extern "C" fn(*mut c_int) -> u32;
type HipDeviceGetName = unsafe extern "C" fn(*mut c_char, c_int, c_int) -> u32;

fn open_hip() -> Result<Library> {
    if HIP_LIBRARY.is_empty() {
        return Err(RocmError::RuntimeNotFound("HIP is not supported on this platform".into()));
    }
    // SAFETY: loading libamdhip64 runs its initialisers, which have no
    // preconditions on our side.
    unsafe { Library::new(HIP_LIBRARY) }
        .map_err(|e| RocmError::RuntimeNotFound(format!("{HIP_LIBRARY}: {e}")))
}

/// Check if the HIP shared library can be located.
pub fn hip_runtime_available() -> bool {
    open_hip().is_ok()
}

/// Attempt to detect the HIP runtime and enumerate AMD GPUs.
///
/// Returns an empty list if the runtime is absent (no error).
pub fn enumerate_devices() -> Result<Vec<Device>> {
    let lib = match open_hip() {
        Ok(lib) => lib,
        Err(err) => {
            info!(reason = %err, "HIP runtime not detected, ROCm backends unavailable");
            return Ok(vec![]);
        }
    };

    let count = hip_device_count(&lib)?;
    if count == 0 {
        warn!("HIP runtime present but no AMD GPU devices found");
        return Ok(vec![]);
    }

    let mut devices = Vec::with_capacity(count);
    for index in 0..count {
        let name = hip_device_name(&lib, index).unwrap_or_else(|err| {
            warn!(index, error = %err, "hipDeviceGetName failed");
            format!("AMD GPU {index}")
        });
        info!(index, name = %name, "discovered AMD GPU");
        devices.push(Device::gpu(Vendor::Amd, index, name));
    }
    Ok(devices)
}

/// The host followed by every AMD GPU that could be probed.
pub fn available_devices() -> Vec<Device> {
    let mut devices = vec![Device::host()];
    match enumerate_devices() {
        Ok(gpus) => devices.extend(gpus),
        Err(err) => warn!(error = %err, "AMD device probe failed"),
    }
    devices
}

/// A queue on the device `config` asks for, resolved against
/// [`available_devices`]. `auto` prefers the first GPU and falls back to the
/// host.
pub fn queue_for(config: &DispatchConfig) -> linhal_common::Result<Queue> {
    let device = config.device.resolve(&available_devices())?;
    info!(device = %device, spec = %config.device, "selected device");
    Ok(Queue::new(device))
}

fn hip_device_count(lib: &Library) -> Result<usize> {
    // SAFETY: symbol type matches `hipError_t hipGetDeviceCount(int*)`.
    let get_count: Symbol<'_, HipGetDeviceCount> = unsafe { lib.get(b"hipGetDeviceCount\0") }
        .map_err(|e| RocmError::RuntimeNotFound(format!("hipGetDeviceCount: {e}")))?;

    let mut count: c_int = 0;
    // SAFETY: `count` outlives the call.
    let status = unsafe { get_count(&mut count) };
    if HipErrorCode::from_raw(status) == HipErrorCode::NoDevice {
        return Ok(0);
    }
    check_hip(status, "hipGetDeviceCount")?;
    Ok(usize::try_from(count).unwrap_or(0))
}

fn hip_device_name(lib: &Library, index: usize) -> Result<String> {
    // SAFETY: matches `hipError_t hipDeviceGetName(char*, int, hipDevice_t)`.
    let get_name: Symbol<'_, HipDeviceGetName> = unsafe { lib.get(b"hipDeviceGetName\0") }
        .map_err(|e| RocmError::RuntimeNotFound(format!("hipDeviceGetName: {e}")))?;

    let ordinal =
        c_int::try_from(index).map_err(|_| RocmError::InvalidArgument(format!("device {index}")))?;
    let mut name = [0 as c_char; 256];
    // SAFETY: the buffer length passed matches the array; HIP NUL-terminates.
    let status = unsafe { get_name(name.as_mut_ptr(), name.len() as c_int, ordinal) };
    check_hip(status, "hipDeviceGetName")?;
    // SAFETY: zero-initialised buffer guarantees a terminator.
    let cstr = unsafe { CStr::from_ptr(name.as_ptr()) };
    Ok(cstr.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn available_devices_always_includes_host() {
        let devices = available_devices();
        assert!(devices[0].is_host());
        assert!(devices.iter().skip(1).all(|d| d.vendor() == Vendor::Amd));
    }

    #[test]
    fn host_spec_always_resolves() {
        let config = DispatchConfig { device: linhal_common::DeviceSpec::Host, ..Default::default() };
        let queue = queue_for(&config).unwrap();
        assert!(queue.device().is_host());
    }

    #[test]
    fn enumerate_never_fails_without_runtime() {
        if !hip_runtime_available() {
            assert!(enumerate_devices().unwrap().is_empty());
        }
    }
}
