//! Probe finalize hook: records heights, computes the correction and
//! applies it when it is within the safety limit.

use rotaxis_traits::{BoxError, ProbeFinalize, Responder, Toolhead};

use crate::config::{AdjustCfg, ROTARY_AXIS_INDEX};
use crate::correction::{corrected_rotary, correction_angle, exceeds_limit};
use crate::error::AdjustError;
use crate::hw_error::map_hw_error;
use crate::points::{MeasuredPosition, ReferencePoint};
use crate::results::AdjustmentResult;
use crate::status::{AdjustState, CorrectionOutcome};

/// Owns everything the finalize step touches, so the probe helper can borrow
/// it mutably while the adjuster still holds the helper.
pub struct CorrectionEngine<T: Toolhead, R: Responder> {
    pub(crate) cfg: AdjustCfg,
    pub(crate) points: Vec<ReferencePoint>,
    pub(crate) toolhead: T,
    pub(crate) responder: R,
    pub(crate) results: AdjustmentResult,
    pub(crate) state: AdjustState,
    pub(crate) transitions: Vec<AdjustState>,
    pub(crate) last_outcome: Option<CorrectionOutcome>,
}

impl<T: Toolhead, R: Responder> CorrectionEngine<T, R> {
    pub(crate) fn new(
        cfg: AdjustCfg,
        points: Vec<ReferencePoint>,
        toolhead: T,
        responder: R,
    ) -> Self {
        Self {
            cfg,
            points,
            toolhead,
            responder,
            results: AdjustmentResult::new(),
            state: AdjustState::Idle,
            transitions: Vec::new(),
            last_outcome: None,
        }
    }

    /// Move to `next`, recording it in the transition log of the current cycle.
    pub(crate) fn enter(&mut self, next: AdjustState) {
        tracing::debug!(from = ?self.state, to = ?next, "adjust state");
        self.state = next;
        self.transitions.push(next);
    }

    /// Process one set of measured positions (ordered like `points`).
    pub fn finalize(
        &mut self,
        positions: &[MeasuredPosition],
    ) -> Result<CorrectionOutcome, AdjustError> {
        if positions.len() < self.points.len() {
            return Err(AdjustError::Probe(format!(
                "expected {} probed positions, got {}",
                self.points.len(),
                positions.len()
            )));
        }

        let mut results = AdjustmentResult::new();
        for (i, (point, pos)) in self.points.iter().zip(positions).enumerate() {
            let z = pos[2];
            self.responder.respond_info(&format!(
                "{} : x={:.1}, y={:.1}, z={:.5}",
                point.name(),
                point.x(),
                point.y(),
                z
            ));
            tracing::debug!(point = point.name(), z, "probed reference point");
            results.insert(i + 1, z);
        }
        self.results = results;

        let axis = self.cfg.axis_lower();
        let correction = correction_angle(&positions[0], &positions[1]);
        self.responder
            .respond_info(&format!("{axis}_correction: {correction:.3} deg"));
        tracing::info!(correction_deg = correction, "rotary correction computed");

        if exceeds_limit(correction, self.cfg.max_correction_deg) {
            self.responder
                .respond_info(&format!("{axis}_correction too large, not moving axis!"));
            tracing::warn!(
                correction_deg = correction,
                limit_deg = self.cfg.max_correction_deg,
                "correction over limit; axis not moved"
            );
            return Ok(CorrectionOutcome::TooLarge {
                correction_deg: correction,
            });
        }

        let mut pos = self
            .toolhead
            .get_position()
            .map_err(|e| map_hw_error(&*e))?;
        if pos.len() <= ROTARY_AXIS_INDEX {
            return Err(AdjustError::State(format!(
                "toolhead reports {} axes, rotary axis needs index {ROTARY_AXIS_INDEX}",
                pos.len()
            )));
        }
        let before = pos[ROTARY_AXIS_INDEX];
        self.responder
            .respond_info(&format!("{axis}-axis before: {before:.3}"));
        let after = corrected_rotary(before, correction);
        pos[ROTARY_AXIS_INDEX] = after;
        self.responder
            .respond_info(&format!("{axis}-axis after: {after:.3}"));

        self.toolhead
            .manual_move(&pos, self.cfg.move_speed)
            .map_err(|e| map_hw_error(&*e))?;
        self.responder
            .run_script_from_command(&self.cfg.zero_script())
            .map_err(|e| map_hw_error(&*e))?;
        tracing::info!(before, after, "rotary correction applied");

        Ok(CorrectionOutcome::Applied {
            correction_deg: correction,
            before,
            after,
        })
    }
}

impl<T: Toolhead, R: Responder> ProbeFinalize for CorrectionEngine<T, R> {
    fn probe_finalize(
        &mut self,
        offsets: [f64; 3],
        positions: &[MeasuredPosition],
    ) -> Result<(), BoxError> {
        tracing::debug!(?offsets, count = positions.len(), "probe finalize");
        self.enter(AdjustState::Finalizing);
        let res = self.finalize(positions);
        self.enter(AdjustState::Idle);
        let outcome = res?;
        self.last_outcome = Some(outcome);
        Ok(())
    }
}
