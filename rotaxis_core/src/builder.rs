//! `Adjuster` (boxed collaborators), its builder, and the generic
//! `build_adjuster` constructor.
//!
//! Collaborators are injected here; nothing is looked up by name at runtime.

use eyre::WrapErr;
use rotaxis_traits::{
    GcodeCommand, LateralPoint, ProbePointsHelper, Responder, StepperEnable, Toolhead,
};

use crate::adjuster::AdjusterCore;
use crate::config::{AdjustCfg, MIN_PROBE_POINTS};
use crate::conversions::reference_points;
use crate::engine::CorrectionEngine;
use crate::error::{BuildError, Result};
use crate::hw_error::map_hw_error;
use crate::points::ReferencePoint;
use crate::results::{AdjustmentResult, AdjusterStatus};
use crate::status::{AdjustState, CommandOutcome, CorrectionOutcome};

type DynCore = AdjusterCore<
    Box<dyn ProbePointsHelper>,
    Box<dyn StepperEnable>,
    Box<dyn Toolhead>,
    Box<dyn Responder>,
>;

// ── Public dynamic-dispatch wrapper ──────────────────────────────────────────

/// Rotary axis alignment adjuster with boxed collaborators.
pub struct Adjuster {
    pub(crate) inner: DynCore,
}

impl core::fmt::Debug for Adjuster {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Adjuster")
            .field("points", &self.inner.reference_points())
            .field("state", &self.inner.state())
            .field("results", &self.inner.results())
            .finish()
    }
}

impl Adjuster {
    /// Start building an Adjuster.
    pub fn builder() -> AdjusterBuilder {
        AdjusterBuilder::default()
    }

    /// Dispatch a parsed command line.
    pub fn handle_command(&mut self, cmd: &GcodeCommand) -> Result<CommandOutcome> {
        self.inner.handle_command(cmd)
    }

    /// Run `ROT_AXIS_ADJUST`.
    pub fn cmd_rot_axis_adjust(&mut self, cmd: &GcodeCommand) -> Result<CommandOutcome> {
        self.inner.cmd_rot_axis_adjust(cmd)
    }

    pub fn get_status(&self, eventtime: f64) -> AdjusterStatus {
        self.inner.get_status(eventtime)
    }

    pub fn results(&self) -> &AdjustmentResult {
        self.inner.results()
    }

    pub fn state(&self) -> AdjustState {
        self.inner.state()
    }

    pub fn last_outcome(&self) -> Option<CorrectionOutcome> {
        self.inner.last_outcome()
    }

    pub fn transitions(&self) -> &[AdjustState] {
        self.inner.transitions()
    }

    pub fn reference_points(&self) -> &[ReferencePoint] {
        self.inner.reference_points()
    }

    pub fn config(&self) -> &AdjustCfg {
        self.inner.config()
    }
}

/// Builder for `Adjuster`. Everything is validated on `try_build()`.
#[derive(Default)]
pub struct AdjusterBuilder {
    probe: Option<Box<dyn ProbePointsHelper>>,
    steppers: Option<Box<dyn StepperEnable>>,
    toolhead: Option<Box<dyn Toolhead>>,
    responder: Option<Box<dyn Responder>>,
    points: Option<Vec<ReferencePoint>>,
    cfg: Option<AdjustCfg>,
}

impl AdjusterBuilder {
    pub fn with_probe(mut self, probe: impl ProbePointsHelper + 'static) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }

    pub fn with_steppers(mut self, steppers: impl StepperEnable + 'static) -> Self {
        self.steppers = Some(Box::new(steppers));
        self
    }

    pub fn with_toolhead(mut self, toolhead: impl Toolhead + 'static) -> Self {
        self.toolhead = Some(Box::new(toolhead));
        self
    }

    pub fn with_responder(mut self, responder: impl Responder + 'static) -> Self {
        self.responder = Some(Box::new(responder));
        self
    }

    pub fn with_points(mut self, points: Vec<ReferencePoint>) -> Self {
        self.points = Some(points);
        self
    }

    pub fn with_config(mut self, cfg: AdjustCfg) -> Self {
        self.cfg = Some(cfg);
        self
    }

    /// Take settings and reference points from a loaded config file.
    pub fn apply_config(self, cfg: &rotaxis_config::Config) -> Result<Self> {
        let points = reference_points(&cfg.rot_axis_adjust).map_err(eyre::Report::new)?;
        let adjust = AdjustCfg::try_from(&cfg.rot_axis_adjust)?;
        Ok(self.with_points(points).with_config(adjust))
    }

    pub fn try_build(self) -> Result<Adjuster> {
        let probe = self
            .probe
            .ok_or_else(|| eyre::Report::new(BuildError::MissingProbe))?;
        let steppers = self
            .steppers
            .ok_or_else(|| eyre::Report::new(BuildError::MissingSteppers))?;
        let toolhead = self
            .toolhead
            .ok_or_else(|| eyre::Report::new(BuildError::MissingToolhead))?;
        let responder = self
            .responder
            .ok_or_else(|| eyre::Report::new(BuildError::MissingResponder))?;
        let points = self
            .points
            .ok_or_else(|| eyre::Report::new(BuildError::MissingPoints))?;
        let cfg = self.cfg.unwrap_or_default();

        let inner = validate_and_build(cfg, points, probe, steppers, toolhead, responder)?;
        Ok(Adjuster { inner })
    }
}

/// Validate configuration and construct an `AdjusterCore`.
///
/// Single source of truth for validation, used by both
/// `AdjusterBuilder::try_build()` and `build_adjuster()`.
fn validate_and_build<P, S, T, R>(
    cfg: AdjustCfg,
    points: Vec<ReferencePoint>,
    mut probe: P,
    steppers: S,
    toolhead: T,
    responder: R,
) -> Result<AdjusterCore<P, S, T, R>>
where
    P: ProbePointsHelper,
    S: StepperEnable,
    T: Toolhead,
    R: Responder,
{
    if points.len() != MIN_PROBE_POINTS {
        return Err(eyre::Report::new(BuildError::PointCount(points.len())));
    }
    if points
        .iter()
        .any(|p| !(p.x().is_finite() && p.y().is_finite()))
    {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "reference point coordinates must be finite",
        )));
    }
    if cfg.stepper.trim().is_empty() {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "stepper name must not be empty",
        )));
    }
    if !cfg.axis.is_ascii_alphabetic() {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "axis must be an ASCII letter",
        )));
    }
    if !(cfg.max_correction_deg.is_finite() && cfg.max_correction_deg > 0.0) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "max_correction_deg must be > 0",
        )));
    }
    // The folded angle never exceeds 90, so a limit at or above it disables the guard.
    if cfg.max_correction_deg >= 90.0 {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "max_correction_deg must be < 90",
        )));
    }
    if !(cfg.move_speed.is_finite() && cfg.move_speed > 0.0) {
        return Err(eyre::Report::new(BuildError::InvalidConfig(
            "move_speed must be > 0",
        )));
    }

    let targets: Vec<LateralPoint> = points.iter().map(ReferencePoint::coord).collect();
    probe
        .use_points(&targets, MIN_PROBE_POINTS)
        .map_err(|e| eyre::Report::new(map_hw_error(&*e)))
        .wrap_err("installing default probe points")?;

    tracing::debug!(
        stepper = %cfg.stepper,
        axis = %cfg.axis,
        max_correction_deg = cfg.max_correction_deg,
        "rotary axis adjuster ready"
    );

    Ok(AdjusterCore {
        probe,
        steppers,
        engine: CorrectionEngine::new(cfg, points, toolhead, responder),
    })
}

/// Generic constructor (static dispatch) for callers that know their
/// collaborator types.
pub fn build_adjuster<P, S, T, R>(
    cfg: AdjustCfg,
    points: Vec<ReferencePoint>,
    probe: P,
    steppers: S,
    toolhead: T,
    responder: R,
) -> Result<AdjusterCore<P, S, T, R>>
where
    P: ProbePointsHelper,
    S: StepperEnable,
    T: Toolhead,
    R: Responder,
{
    validate_and_build(cfg, points, probe, steppers, toolhead, responder)
}
