//! The adjuster (`AdjusterCore`): command precondition, probe delegation and
//! status exposure, generic over its collaborators.

use eyre::WrapErr;
use rotaxis_traits::{GcodeCommand, ProbePointsHelper, Responder, StepperEnable, Toolhead};

use crate::config::{AdjustCfg, COMMAND_NAME};
use crate::engine::CorrectionEngine;
use crate::error::{AdjustError, Result};
use crate::hw_error::map_hw_error;
use crate::points::ReferencePoint;
use crate::results::{AdjustmentResult, AdjusterStatus};
use crate::status::{AdjustState, CommandOutcome, CorrectionOutcome};

/// Unified core for both dynamic (boxed) and generic (static dispatch) variants.
pub struct AdjusterCore<P, S, T, R>
where
    P: ProbePointsHelper,
    S: StepperEnable,
    T: Toolhead,
    R: Responder,
{
    pub(crate) probe: P,
    pub(crate) steppers: S,
    pub(crate) engine: CorrectionEngine<T, R>,
}

impl<P, S, T, R> core::fmt::Debug for AdjusterCore<P, S, T, R>
where
    P: ProbePointsHelper,
    S: StepperEnable,
    T: Toolhead,
    R: Responder,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AdjusterCore")
            .field("cfg", &self.engine.cfg)
            .field("points", &self.engine.points)
            .field("state", &self.engine.state)
            .field("transitions", &self.engine.transitions)
            .field("results", &self.engine.results)
            .finish()
    }
}

impl<P, S, T, R> AdjusterCore<P, S, T, R>
where
    P: ProbePointsHelper,
    S: StepperEnable,
    T: Toolhead,
    R: Responder,
{
    /// Dispatch a parsed command line. Only `ROT_AXIS_ADJUST` is registered.
    pub fn handle_command(&mut self, cmd: &GcodeCommand) -> Result<CommandOutcome> {
        if cmd.name() != COMMAND_NAME {
            return Err(eyre::Report::new(AdjustError::UnknownCommand(
                cmd.name().to_string(),
            )));
        }
        self.cmd_rot_axis_adjust(cmd)
    }

    /// `ROT_AXIS_ADJUST`: probe both reference points and correct the rotary axis.
    ///
    /// A disabled rotary stepper is not an error; the command reports it and
    /// returns `CommandOutcome::MotorDisabled` without probing.
    pub fn cmd_rot_axis_adjust(&mut self, cmd: &GcodeCommand) -> Result<CommandOutcome> {
        self.engine.transitions.clear();
        let stepper = self.engine.cfg.stepper.as_str();
        let enabled = self
            .steppers
            .is_motor_enabled(stepper)
            .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err_with(|| format!("looking up {stepper}"))?;
        if !enabled {
            tracing::info!(stepper, "rotary stepper disabled; adjustment skipped");
            let msg = format!(
                "{} axis stepper must be enabled! Not running adjustment",
                self.engine.cfg.axis
            );
            self.engine.responder.respond_info(&msg);
            return Ok(CommandOutcome::MotorDisabled);
        }

        tracing::info!(command = %cmd, "starting rotary axis probe");
        self.engine.last_outcome = None;
        self.engine.enter(AdjustState::Probing);
        let res = self.probe.start_probe(cmd, &mut self.engine);
        if self.engine.state != AdjustState::Idle {
            self.engine.enter(AdjustState::Idle);
        }
        res.map_err(|e| eyre::Report::new(map_hw_error(&*e)))
            .wrap_err("probing reference points")?;

        Ok(CommandOutcome::Probed(self.engine.last_outcome))
    }

    /// Status snapshot; `eventtime` is accepted for interface uniformity only.
    pub fn get_status(&self, _eventtime: f64) -> AdjusterStatus {
        AdjusterStatus {
            results: self.engine.results.clone(),
        }
    }

    pub fn results(&self) -> &AdjustmentResult {
        &self.engine.results
    }

    pub fn state(&self) -> AdjustState {
        self.engine.state
    }

    /// States entered during the latest probe cycle, in order. Empty when the
    /// last command did not start probing.
    pub fn transitions(&self) -> &[AdjustState] {
        &self.engine.transitions
    }

    /// Outcome of the latest probe cycle that reached finalize.
    pub fn last_outcome(&self) -> Option<CorrectionOutcome> {
        self.engine.last_outcome
    }

    pub fn reference_points(&self) -> &[ReferencePoint] {
        &self.engine.points
    }

    pub fn config(&self) -> &AdjustCfg {
        &self.engine.cfg
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }
}
