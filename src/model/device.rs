//! Compute device selection for the classifier.

use candle_core::Device;
use tracing::{debug, warn};

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::info;

/// Picks the first GPU backend compiled in via cargo features, else the CPU.
///
/// GPU initialization failures are logged and never fatal.
pub fn select_device() -> Device {
    #[allow(unused_mut)]
    let mut failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            info!(device = "metal", "Classifier using GPU acceleration");
            return device;
        }
        Err(e) => failures.push(format!("metal: {e}")),
    }

    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => {
            info!(device = "cuda", "Classifier using GPU acceleration");
            return device;
        }
        Err(e) => failures.push(format!("cuda: {e}")),
    }

    if failures.is_empty() {
        debug!("No GPU backend compiled, classifier running on CPU");
    } else {
        warn!(reason = %failures.join("; "), "GPU unavailable, classifier falling back to CPU");
    }

    Device::Cpu
}

/// Short label for logs and the health endpoint.
pub fn device_label(device: &Device) -> &'static str {
    if device.is_cuda() {
        "cuda"
    } else if device.is_metal() {
        "metal"
    } else {
        "cpu"
    }
}
