//! Adjuster state and per-invocation outcomes.

use serde::Serialize;

/// Where the probe-and-correct cycle currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustState {
    #[default]
    Idle,
    /// Probe helper is visiting the reference points.
    Probing,
    /// Measured positions arrived; correction is being computed/applied.
    Finalizing,
}

/// Result of the correction step of one probe cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CorrectionOutcome {
    /// Rotary axis moved from `before` to `after` and re-zeroed.
    Applied {
        correction_deg: f64,
        before: f64,
        after: f64,
    },
    /// Correction over the safety limit; nothing moved.
    TooLarge { correction_deg: f64 },
}

impl CorrectionOutcome {
    pub fn correction_deg(&self) -> f64 {
        match *self {
            CorrectionOutcome::Applied { correction_deg, .. }
            | CorrectionOutcome::TooLarge { correction_deg } => correction_deg,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, CorrectionOutcome::Applied { .. })
    }
}

/// Result of handling one `ROT_AXIS_ADJUST` command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandOutcome {
    /// Rotary stepper disabled; nothing probed.
    MotorDisabled,
    /// Probe helper ran. `None` when it returned without calling finalize.
    Probed(Option<CorrectionOutcome>),
}
