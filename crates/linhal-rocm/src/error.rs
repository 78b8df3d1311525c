//! ROCm error types: HIP, rocBLAS and rocFFT status codes.

use linhal_common::{Device, LinhalError};
use thiserror::Error;

/// HIP runtime error codes (subset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum HipErrorCode {
    Success = 0,
    InvalidValue = 1,
    OutOfMemory = 2,
    NotInitialized = 3,
    NoDevice = 100,
    InvalidDevice = 101,
    FileNotFound = 301,
    NotReady = 600,
    Unknown = 999,
}

impl HipErrorCode {
    pub fn from_raw(code: u32) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::InvalidValue,
            2 => Self::OutOfMemory,
            3 => Self::NotInitialized,
            100 => Self::NoDevice,
            101 => Self::InvalidDevice,
            301 => Self::FileNotFound,
            600 => Self::NotReady,
            _ => Self::Unknown,
        }
    }
}

/// `rocblas_status` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum RocblasStatus {
    Success = 0,
    InvalidHandle = 1,
    NotImplemented = 2,
    InvalidPointer = 3,
    InvalidSize = 4,
    MemoryError = 5,
    InternalError = 6,
    PerfDegraded = 7,
    SizeQueryMismatch = 8,
    SizeIncreased = 9,
    SizeUnchanged = 10,
    InvalidValue = 11,
    Continue = 12,
    CheckNumericsFail = 13,
    Unknown = u32::MAX,
}

impl RocblasStatus {
    pub fn from_raw(code: u32) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::InvalidHandle,
            2 => Self::NotImplemented,
            3 => Self::InvalidPointer,
            4 => Self::InvalidSize,
            5 => Self::MemoryError,
            6 => Self::InternalError,
            7 => Self::PerfDegraded,
            8 => Self::SizeQueryMismatch,
            9 => Self::SizeIncreased,
            10 => Self::SizeUnchanged,
            11 => Self::InvalidValue,
            12 => Self::Continue,
            13 => Self::CheckNumericsFail,
            _ => Self::Unknown,
        }
    }

    /// Statuses that report a completed call.
    pub fn is_ok(self) -> bool {
        matches!(self, Self::Success | Self::PerfDegraded)
    }
}

/// `rocfft_status` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum RocfftStatus {
    Success = 0,
    Failure = 1,
    InvalidArgValue = 2,
    InvalidDimensions = 3,
    InvalidArrayType = 4,
    InvalidStrides = 5,
    InvalidDistance = 6,
    InvalidOffset = 7,
    InvalidWorkBuffer = 8,
    Unknown = u32::MAX,
}

impl RocfftStatus {
    pub fn from_raw(code: u32) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::Failure,
            2 => Self::InvalidArgValue,
            3 => Self::InvalidDimensions,
            4 => Self::InvalidArrayType,
            5 => Self::InvalidStrides,
            6 => Self::InvalidDistance,
            7 => Self::InvalidOffset,
            8 => Self::InvalidWorkBuffer,
            _ => Self::Unknown,
        }
    }
}

/// Errors produced by the ROCm layer.
#[derive(Debug, Clone, Error)]
pub enum RocmError {
    #[error("HIP runtime error in {context}: {code:?}")]
    Hip { code: HipErrorCode, context: String },

    #[error("rocBLAS {routine} returned {status:?}")]
    Rocblas { status: RocblasStatus, routine: &'static str },

    #[error("rocFFT {routine} returned {status:?}")]
    Rocfft { status: RocfftStatus, routine: &'static str },

    #[error("ROCm runtime not found: {0}")]
    RuntimeNotFound(String),

    #[error("{library} support was not compiled in (enable the `{feature}` feature)")]
    NotLinked { library: &'static str, feature: &'static str },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, RocmError>;

/// Check a HIP status code and return an error if non-zero.
pub fn check_hip(status: u32, context: &str) -> Result<()> {
    if status == 0 {
        Ok(())
    } else {
        Err(RocmError::Hip { code: HipErrorCode::from_raw(status), context: context.to_string() })
    }
}

/// Check a `rocblas_status`.
pub fn check_rocblas(status: u32, routine: &'static str) -> Result<()> {
    let status = RocblasStatus::from_raw(status);
    if status.is_ok() { Ok(()) } else { Err(RocmError::Rocblas { status, routine }) }
}

/// Check a `rocfft_status`.
pub fn check_rocfft(status: u32, routine: &'static str) -> Result<()> {
    match RocfftStatus::from_raw(status) {
        RocfftStatus::Success => Ok(()),
        status => Err(RocmError::Rocfft { status, routine }),
    }
}

impl RocmError {
    /// Convert into the dispatch-level error for a call made on `device`.
    pub fn into_linhal(self, domain: &'static str, device: &Device) -> LinhalError {
        match self {
            RocmError::NotLinked { .. } | RocmError::RuntimeNotFound(_) => {
                LinhalError::backend_unavailable(domain, device)
            }
            RocmError::Rocblas { status: RocblasStatus::NotImplemented, routine } => {
                LinhalError::unimplemented(domain, routine, "by rocBLAS for these arguments")
            }
            RocmError::Rocblas { status, routine } => LinhalError::Backend {
                library: "rocBLAS",
                routine,
                status: status as i32,
                message: format!("{status:?}"),
            },
            RocmError::Rocfft { status, routine } => LinhalError::Backend {
                library: "rocFFT",
                routine,
                status: status as i32,
                message: format!("{status:?}"),
            },
            RocmError::Hip { code, context } => LinhalError::Backend {
                library: "HIP",
                routine: "runtime",
                status: code as i32,
                message: context,
            },
            RocmError::InvalidArgument(message) => {
                LinhalError::InvalidArgument { domain, function: "rocm", message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_decoding() {
        assert_eq!(HipErrorCode::from_raw(100), HipErrorCode::NoDevice);
        assert_eq!(HipErrorCode::from_raw(12345), HipErrorCode::Unknown);
        assert_eq!(RocblasStatus::from_raw(2), RocblasStatus::NotImplemented);
        assert_eq!(RocfftStatus::from_raw(5), RocfftStatus::InvalidStrides);
        assert_eq!(RocfftStatus::from_raw(77), RocfftStatus::Unknown);
    }

    #[test]
    fn perf_degraded_is_not_an_error() {
        assert!(check_rocblas(7, "rocblas_sgemm_strided_batched").is_ok());
        assert!(check_rocblas(4, "rocblas_sgemm_strided_batched").is_err());
    }

    #[test]
    fn not_implemented_maps_to_unimplemented() {
        let err = check_rocblas(2, "rocblas_strsm_batched").unwrap_err();
        let mapped = err.into_linhal("blas", &Device::host());
        assert!(mapped.is_unimplemented(), "got {mapped:?}");
    }

    #[test]
    fn not_linked_maps_to_backend_unavailable() {
        let err = RocmError::NotLinked { library: "rocFFT", feature: "rocfft" };
        let mapped = err.into_linhal("dft", &Device::host());
        assert!(mapped.is_backend_unavailable());
    }

    #[test]
    fn status_errors_keep_codes() {
        let err = check_rocfft(6, "rocfft_plan_create").unwrap_err();
        match err.into_linhal("dft", &Device::host()) {
            LinhalError::Backend { library, status, .. } => {
                assert_eq!(library, "rocFFT");
                assert_eq!(status, 6);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
