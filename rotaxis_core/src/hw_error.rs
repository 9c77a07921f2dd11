//! Maps `Box<dyn Error>` from trait boundaries to typed `AdjustError`.
//!
//! The traits in `rotaxis_traits` use `Box<dyn Error + Send + Sync>`; errors
//! raised by our own finalize hook travel back through the probe helper in
//! that form and are recovered here unchanged.

use crate::error::AdjustError;

/// Map a trait-boundary error to a typed `AdjustError`.
///
/// Attempts to downcast known error types first, then falls back to
/// string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> AdjustError {
    if let Some(ours) = e.downcast_ref::<AdjustError>() {
        return ours.clone();
    }

    // Feature-gated: try to downcast to HwError for precise mapping
    #[cfg(feature = "hardware-errors")]
    {
        use rotaxis_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::UnknownStepper(_) => AdjustError::Config(hw.to_string()),
                HwError::Probe(_) | HwError::Param(_) => AdjustError::Probe(hw.to_string()),
                other => AdjustError::HardwareFault(other.to_string()),
            };
        }
    }

    if let Some(p) = e.downcast_ref::<rotaxis_traits::ParamError>() {
        return AdjustError::Probe(p.to_string());
    }

    let s = e.to_string();
    if s.to_lowercase().contains("probe") {
        AdjustError::Probe(s)
    } else {
        AdjustError::Hardware(s)
    }
}
