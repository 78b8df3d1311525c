//! `linhal-dft`: DFT descriptors dispatched to vendor FFT backends.
//!
//! A [`Descriptor`] is typed by precision ([`Single`], [`Double`]) and
//! forward domain ([`Real`], [`Complex`]). It is configured through
//! [`Descriptor::set_value`] / [`Descriptor::get_value`], then committed to
//! a [`Queue`](linhal_common::Queue), which selects a backend and builds a
//! plan. The `compute_*` functions run the committed plan.
//!
//! ```no_run
//! use linhal_dft::{ConfigParam, Descriptor, Double, Complex, compute_forward};
//! use linhal_common::{Buffer, Complex64};
//!
//! # fn main() -> linhal_common::Result<()> {
//! let queue = linhal_dft::default_queue()?;
//! let mut desc = Descriptor::<Double, Complex>::new([64])?;
//! desc.set_value(ConfigParam::BackwardScale, 1.0 / 64.0)?;
//! desc.commit(&queue)?;
//!
//! let data = Buffer::from_vec(vec![Complex64::new(1.0, 0.0); 64]);
//! compute_forward(&desc, &data)?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod compute;
pub mod descriptor;
pub mod registry;
pub mod rocfft;
pub mod types;
pub mod value;

pub use backend::{DftArgs, DftBackend, DftData, DftDataMut, DftPlan};
pub use compute::*;
pub use descriptor::{Descriptor, DescriptorValues, default_strides};
pub use registry::{backend_names, configure, register_backend, unregister_backend};
pub use rocfft::RocfftBackend;
pub use types::{
    Complex, ConfigParam, ConfigValue, DftElement, DftReal, Direction, Domain, DomainType, Double,
    Precision, PrecisionType, Real, Single,
};
pub use value::ParamValue;

/// A queue on the device chosen by the dispatch configuration
/// (`LINHAL_CONFIG`, `LINHAL_DEVICE`).
pub fn default_queue() -> linhal_common::Result<linhal_common::Queue> {
    linhal_rocm::queue_for(&linhal_common::DispatchConfig::load()?)
}
