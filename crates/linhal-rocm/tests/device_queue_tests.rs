//! Device discovery and queue construction.
//!
//! These tests run with or without an AMD GPU: every expectation is phrased
//! against what the probe actually found.

use linhal_common::{DeviceSpec, DispatchConfig, Vendor};
use linhal_rocm::{available_devices, hip_runtime_available, queue_for};
use serial_test::serial;
use std::env;

#[test]
fn auto_prefers_a_gpu_when_one_is_present() {
    let devices = available_devices();
    let queue = queue_for(&DispatchConfig::default()).unwrap();
    match devices.iter().find(|d| !d.is_host()) {
        Some(gpu) => assert_eq!(queue.device(), gpu),
        None => assert!(queue.device().is_host()),
    }
}

#[test]
fn missing_gpu_index_is_a_config_error() {
    let config = DispatchConfig {
        device: DeviceSpec::Gpu { vendor: Vendor::Amd, index: 4096 },
        ..Default::default()
    };
    let err = queue_for(&config).unwrap_err();
    assert!(err.to_string().contains("amd:4096"), "{err}");
}

#[test]
fn devices_without_runtime_are_host_only() {
    if !hip_runtime_available() {
        assert_eq!(available_devices().len(), 1);
    }
}

#[test]
#[serial(linhal_env)]
fn device_env_override_selects_host() {
    // SAFETY: serialised with every other test touching the environment.
    unsafe { env::set_var("LINHAL_DEVICE", "cpu") };
    let config = DispatchConfig::load();
    unsafe { env::remove_var("LINHAL_DEVICE") };

    let queue = queue_for(&config.unwrap()).unwrap();
    assert!(queue.device().is_host());
}
