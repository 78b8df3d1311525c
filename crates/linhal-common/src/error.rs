//! Error type shared by every linhal crate.

use thiserror::Error;

/// Errors raised by the dispatch layer and its backends.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LinhalError {
    #[error("invalid argument to {domain}::{function}: {message}")]
    InvalidArgument { domain: &'static str, function: &'static str, message: String },

    #[error("{domain}::{function} is not implemented {detail}")]
    Unimplemented { domain: &'static str, function: &'static str, detail: String },

    #[error("no {domain} backend available for device {device}")]
    BackendUnavailable { domain: &'static str, device: String },

    #[error("{function}: argument `{argument}` = {value} overflows the backend integer type")]
    Overflow { function: &'static str, argument: &'static str, value: i64 },

    #[error("{library} call {routine} failed with status {status} ({message})")]
    Backend { library: &'static str, routine: &'static str, status: i32, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, LinhalError>;

impl LinhalError {
    pub fn invalid_argument(
        domain: &'static str,
        function: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument { domain, function, message: message.into() }
    }

    pub fn unimplemented(
        domain: &'static str,
        function: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        Self::Unimplemented { domain, function, detail: detail.into() }
    }

    pub fn backend_unavailable(domain: &'static str, device: impl ToString) -> Self {
        Self::BackendUnavailable { domain, device: device.to_string() }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    pub fn is_unimplemented(&self) -> bool {
        matches!(self, Self::Unimplemented { .. })
    }

    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, Self::BackendUnavailable { .. })
    }
}
