//! Collaborator interfaces consumed by the rotary axis adjuster.
//!
//! The probing engine, stepper enable tracking, motion layer and command
//! responder all live outside the adjuster; these traits are the seams.

pub mod command;

pub use command::{GcodeCommand, ParamError};

/// Error type crossing every trait boundary in this crate.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Lateral `[x, y]` coordinate of a probe target.
pub type LateralPoint = [f64; 2];

/// Measured `[x, y, z]` position reported by a probe helper.
pub type ProbedPosition = [f64; 3];

/// Receives the measured positions once the probe helper has visited every point.
pub trait ProbeFinalize {
    /// `positions` are ordered like the points handed to `ProbePointsHelper::use_points`.
    fn probe_finalize(
        &mut self,
        offsets: [f64; 3],
        positions: &[ProbedPosition],
    ) -> Result<(), BoxError>;
}

/// Drives a probe across a list of lateral points.
pub trait ProbePointsHelper {
    /// Install the default probe targets and the minimum count a run requires.
    fn use_points(&mut self, points: &[LateralPoint], minimum: usize) -> Result<(), BoxError>;

    /// Probe every default point, then hand the results to `finalize`.
    fn start_probe(
        &mut self,
        cmd: &GcodeCommand,
        finalize: &mut dyn ProbeFinalize,
    ) -> Result<(), BoxError>;
}

/// Stepper enable-line tracking.
pub trait StepperEnable {
    /// Whether the named stepper's driver is currently energized.
    ///
    /// Unknown stepper names are an error, not `false`.
    fn is_motor_enabled(&self, stepper: &str) -> Result<bool, BoxError>;
}

/// Motion layer for the toolhead.
pub trait Toolhead {
    /// Current commanded position; index 0..=2 are x/y/z, extra axes follow.
    fn get_position(&mut self) -> Result<Vec<f64>, BoxError>;

    /// Move to `position` at `speed` (units per second).
    fn manual_move(&mut self, position: &[f64], speed: f64) -> Result<(), BoxError>;
}

/// Command response channel.
pub trait Responder {
    fn respond_info(&mut self, msg: &str);

    /// Run a raw command line as if it came from the active command.
    fn run_script_from_command(&mut self, script: &str) -> Result<(), BoxError>;
}

impl<T: ProbePointsHelper + ?Sized> ProbePointsHelper for Box<T> {
    fn use_points(&mut self, points: &[LateralPoint], minimum: usize) -> Result<(), BoxError> {
        (**self).use_points(points, minimum)
    }

    fn start_probe(
        &mut self,
        cmd: &GcodeCommand,
        finalize: &mut dyn ProbeFinalize,
    ) -> Result<(), BoxError> {
        (**self).start_probe(cmd, finalize)
    }
}

impl<T: StepperEnable + ?Sized> StepperEnable for Box<T> {
    fn is_motor_enabled(&self, stepper: &str) -> Result<bool, BoxError> {
        (**self).is_motor_enabled(stepper)
    }
}

impl<T: Toolhead + ?Sized> Toolhead for Box<T> {
    fn get_position(&mut self) -> Result<Vec<f64>, BoxError> {
        (**self).get_position()
    }

    fn manual_move(&mut self, position: &[f64], speed: f64) -> Result<(), BoxError> {
        (**self).manual_move(position, speed)
    }
}

impl<T: Responder + ?Sized> Responder for Box<T> {
    fn respond_info(&mut self, msg: &str) {
        (**self).respond_info(msg);
    }

    fn run_script_from_command(&mut self, script: &str) -> Result<(), BoxError> {
        (**self).run_script_from_command(script)
    }
}
