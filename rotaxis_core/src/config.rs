//! Runtime configuration for the adjuster.
//!
//! Separate from the TOML-deserialized config in `rotaxis_config`; see
//! `conversions` for the mapping.

/// Command registered by the adjuster.
pub const COMMAND_NAME: &str = "ROT_AXIS_ADJUST";
pub const COMMAND_HELP: &str = "Tool to help adjust rotary axis alignment";

/// Index of the rotary axis in toolhead positions.
pub const ROTARY_AXIS_INDEX: usize = 3;

/// Probe helper must visit at least this many points per run.
pub const MIN_PROBE_POINTS: usize = 2;

pub const DEFAULT_MAX_CORRECTION_DEG: f64 = 3.0;
pub const DEFAULT_MOVE_SPEED: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AdjustCfg {
    /// Stepper that must be enabled before probing.
    pub stepper: String,
    /// Rotary axis letter (messages and re-zero command).
    pub axis: char,
    /// Corrections beyond this magnitude (degrees) are reported but not applied.
    pub max_correction_deg: f64,
    /// Feed rate for the corrective move.
    pub move_speed: f64,
}

impl Default for AdjustCfg {
    fn default() -> Self {
        Self {
            stepper: "stepper_a".to_string(),
            axis: 'A',
            max_correction_deg: DEFAULT_MAX_CORRECTION_DEG,
            move_speed: DEFAULT_MOVE_SPEED,
        }
    }
}

impl AdjustCfg {
    /// Command that makes the current rotary position the new logical zero.
    pub fn zero_script(&self) -> String {
        format!("G92 {}0", self.axis)
    }

    /// Lower-case axis letter used in report lines ("a_correction").
    pub(crate) fn axis_lower(&self) -> char {
        self.axis.to_ascii_lowercase()
    }
}
