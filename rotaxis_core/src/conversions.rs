//! Bridges `rotaxis_config` types to `rotaxis_core` types.

use rotaxis_config::{ConfigError, PositionCfg, RotAxisAdjustCfg};

use crate::config::AdjustCfg;
use crate::error::BuildError;
use crate::points::ReferencePoint;

// ── Reference points ─────────────────────────────────────────────────────────

impl From<&PositionCfg> for ReferencePoint {
    fn from(p: &PositionCfg) -> Self {
        ReferencePoint::new(p.coord, p.name.clone())
    }
}

/// Scan and validate the numbered positions, in configured order.
pub fn reference_points(cfg: &RotAxisAdjustCfg) -> Result<Vec<ReferencePoint>, ConfigError> {
    Ok(cfg.positions()?.iter().map(ReferencePoint::from).collect())
}

// ── AdjustCfg ────────────────────────────────────────────────────────────────

impl TryFrom<&RotAxisAdjustCfg> for AdjustCfg {
    type Error = eyre::Report;

    fn try_from(c: &RotAxisAdjustCfg) -> Result<Self, Self::Error> {
        let mut letters = c.axis.chars();
        let axis = match (letters.next(), letters.next()) {
            (Some(a), None) if a.is_ascii_alphabetic() => a.to_ascii_uppercase(),
            _ => {
                return Err(eyre::Report::new(BuildError::InvalidConfig(
                    "axis must be a single letter",
                )));
            }
        };
        Ok(Self {
            stepper: c.stepper.clone(),
            axis,
            max_correction_deg: c.max_correction_deg,
            move_speed: c.move_speed,
        })
    }
}
