use std::fmt;

use candle_core::Device;
use tracing::{debug, info, warn};

/// GPU backend compiled in through the `metal` / `cuda` features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accelerator {
    Metal,
    Cuda,
}

impl Accelerator {
    /// Backends enabled in this build, in the order they are tried.
    pub fn enabled() -> Vec<Accelerator> {
        let mut enabled = Vec::new();
        if cfg!(feature = "metal") {
            enabled.push(Accelerator::Metal);
        }
        if cfg!(feature = "cuda") {
            enabled.push(Accelerator::Cuda);
        }
        enabled
    }

    fn open(self) -> candle_core::Result<Device> {
        match self {
            Accelerator::Metal => Device::new_metal(0),
            Accelerator::Cuda => Device::new_cuda(0),
        }
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accelerator::Metal => write!(f, "metal"),
            Accelerator::Cuda => write!(f, "cuda"),
        }
    }
}

/// First enabled accelerator that opens, otherwise the CPU.
pub fn select_device() -> Device {
    for accelerator in Accelerator::enabled() {
        match accelerator.open() {
            Ok(device) => {
                info!(%accelerator, "Encoder using GPU");
                return device;
            }
            Err(e) => warn!(%accelerator, error = %e, "Accelerator unavailable"),
        }
    }

    debug!("Encoder running on CPU");
    Device::Cpu
}
