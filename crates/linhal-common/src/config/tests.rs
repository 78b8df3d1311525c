//! Configuration tests

use super::*;
use crate::device::Vendor;
use serial_test::serial;
use std::io::Write;
use tempfile::NamedTempFile;

const ENV_VARS: [&str; 5] = [ENV_CONFIG, ENV_DEVICE, ENV_BLAS_BACKEND, ENV_DFT_BACKEND, ENV_STRICT];

fn clear_env() {
    for var in ENV_VARS {
        unsafe {
            env::remove_var(var);
        }
    }
}

#[test]
fn test_default_config() {
    let config = DispatchConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.device, DeviceSpec::Auto);
    assert!(!config.strict);
    assert!(config.blas.enabled && config.dft.enabled);
    assert_eq!(config.blas.backend, None);
}

#[test]
fn test_config_validation() {
    let mut config = DispatchConfig::default();
    config.blas.backend = Some("   ".to_string());
    assert!(config.validate().is_err(), "blank backend name must be rejected");

    let mut config = DispatchConfig::default();
    config.dft.backend = Some("rocfft".to_string());
    config.dft.enabled = false;
    assert!(config.validate().is_err(), "backend preference on a disabled domain is contradictory");
}

#[test]
#[serial(linhal_env)]
fn test_toml_config_loading() {
    clear_env();

    let toml_content = r#"
device = "amd:1"
strict = true

[blas]
backend = "rocblas"

[dft]
enabled = true
"#;

    let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
    temp_file.write_all(toml_content.as_bytes()).unwrap();

    let config = DispatchConfig::from_file(temp_file.path()).unwrap();
    assert_eq!(config.device, DeviceSpec::Gpu { vendor: Vendor::Amd, index: 1 });
    assert!(config.strict);
    assert_eq!(config.blas.backend.as_deref(), Some("rocblas"));
    assert_eq!(config.dft.backend, None);
}

#[test]
fn test_toml_bad_device_is_config_error() {
    let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
    temp_file.write_all(b"device = \"abacus:0\"\n").unwrap();

    let err = DispatchConfig::from_file(temp_file.path()).unwrap_err();
    assert!(matches!(err, LinhalError::Config(_)), "got {err:?}");
}

#[test]
fn test_missing_file_is_config_error() {
    let err = DispatchConfig::from_file(Path::new("/nonexistent/linhal.toml")).unwrap_err();
    assert!(matches!(err, LinhalError::Config(_)));
}

#[test]
#[serial(linhal_env)]
fn test_env_overrides() {
    clear_env();
    unsafe {
        env::set_var(ENV_DEVICE, "rocm:0");
        env::set_var(ENV_BLAS_BACKEND, "RocBLAS");
        env::set_var(ENV_STRICT, "yes");
    }

    let config = DispatchConfig::from_env().unwrap();
    assert_eq!(config.device, DeviceSpec::Gpu { vendor: Vendor::Amd, index: 0 });
    assert_eq!(config.blas.backend.as_deref(), Some("rocblas"), "names are normalised");
    assert!(config.strict);

    clear_env();
}

#[test]
#[serial(linhal_env)]
fn test_env_invalid_flag() {
    clear_env();
    unsafe {
        env::set_var(ENV_STRICT, "maybe");
    }
    assert!(DispatchConfig::from_env().is_err());
    clear_env();
}

#[test]
#[serial(linhal_env)]
fn test_load_layers_file_then_env() {
    clear_env();

    let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
    temp_file.write_all(b"[dft]\nbackend = \"rocfft\"\n").unwrap();

    unsafe {
        env::set_var(ENV_CONFIG, temp_file.path());
        env::set_var(ENV_DFT_BACKEND, "reference");
    }

    let config = DispatchConfig::load().unwrap();
    assert_eq!(config.dft.backend.as_deref(), Some("reference"), "env wins over file");

    clear_env();
}

#[test]
#[serial(linhal_env)]
fn test_load_or_default_swallows_errors() {
    clear_env();
    unsafe {
        env::set_var(ENV_DEVICE, "not-a-device");
    }
    assert_eq!(DispatchConfig::load_or_default(), DispatchConfig::default());
    clear_env();
}
