//! Simulated probe-points helper.
//!
//! Visits each default point at `horizontal_move_z`, "triggers" on the
//! simulated surface, lifts back, then calls the finalize hook once with all
//! measured positions in order.

use rotaxis_traits::{
    BoxError, GcodeCommand, LateralPoint, ProbeFinalize, ProbePointsHelper, ProbedPosition,
};

use crate::error::HwError;
use crate::{A_AXIS, SimMachine};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSettings {
    pub horizontal_move_z: f64,
    pub speed: f64,
    pub lift_speed: f64,
    /// Probe x/y/z offsets relative to the nozzle
    pub offsets: [f64; 3],
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            horizontal_move_z: 5.0,
            speed: 50.0,
            lift_speed: 50.0,
            offsets: [0.0; 3],
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulatedProbe {
    machine: SimMachine,
    settings: ProbeSettings,
    points: Vec<LateralPoint>,
    minimum: usize,
    runs: usize,
}

impl SimulatedProbe {
    pub fn new(machine: SimMachine, settings: ProbeSettings) -> Self {
        Self {
            machine,
            settings,
            points: Vec::new(),
            minimum: 1,
            runs: 0,
        }
    }

    /// Default probe targets installed by the consumer.
    pub fn points(&self) -> &[LateralPoint] {
        &self.points
    }

    pub fn minimum_points(&self) -> usize {
        self.minimum
    }

    /// Number of completed `start_probe` calls.
    pub fn runs(&self) -> usize {
        self.runs
    }
}

impl ProbePointsHelper for SimulatedProbe {
    fn use_points(&mut self, points: &[LateralPoint], minimum: usize) -> Result<(), BoxError> {
        if points.len() < minimum {
            return Err(HwError::Probe(format!(
                "need at least {minimum} probe points, got {}",
                points.len()
            ))
            .into());
        }
        self.points = points.to_vec();
        self.minimum = minimum;
        Ok(())
    }

    fn start_probe(
        &mut self,
        cmd: &GcodeCommand,
        finalize: &mut dyn ProbeFinalize,
    ) -> Result<(), BoxError> {
        if self.points.len() < self.minimum {
            return Err(HwError::Probe(format!(
                "need at least {} probe points, got {}",
                self.minimum,
                self.points.len()
            ))
            .into());
        }
        let move_z = cmd
            .get_float("HORIZONTAL_MOVE_Z", self.settings.horizontal_move_z)
            .map_err(HwError::from)?;
        let speed = cmd
            .get_float("SPEED", self.settings.speed)
            .map_err(HwError::from)?;
        if speed <= 0.0 {
            return Err(HwError::Probe(format!("SPEED={speed} must be > 0")).into());
        }

        let [x_off, y_off, z_off] = self.settings.offsets;
        let mut positions: Vec<ProbedPosition> = Vec::with_capacity(self.points.len());
        for (i, &[x, y]) in self.points.iter().enumerate() {
            let a = self.machine.state().position[A_AXIS];
            self.machine.record_travel([x - x_off, y - y_off, move_z, a]);
            let z = self.machine.surface_height(y) + z_off;
            tracing::debug!(point = i, x, y, z, speed, "probe triggered");
            positions.push([x, y, z]);
            tracing::trace!(lift_speed = self.settings.lift_speed, move_z, "probe lift");
            self.machine.record_travel([x - x_off, y - y_off, move_z, a]);
        }
        self.runs += 1;
        finalize.probe_finalize(self.settings.offsets, &positions)
    }
}
