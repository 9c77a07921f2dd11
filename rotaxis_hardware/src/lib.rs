//! Simulated machine backing the adjuster's collaborator traits.
//!
//! A single `SimMachine` holds the shared state; the stepper registry,
//! toolhead, g-code responder and probe helper are cheap handles onto it.
//! The probed surface is a plane tilted about the X axis by
//! `tilt_deg + physical A`, so a correct rotary adjustment flattens it.
pub mod error;
pub mod probe;

use std::cell::{Ref, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use rotaxis_traits::{BoxError, Responder, StepperEnable, Toolhead};

use crate::error::HwError;

pub use probe::{ProbeSettings, SimulatedProbe};

/// Index of the rotary axis in toolhead positions.
pub const A_AXIS: usize = 3;

const AXIS_LETTERS: [char; 4] = ['X', 'Y', 'Z', 'A'];

#[derive(Debug, Clone)]
pub struct MachineState {
    /// Logical x, y, z, a
    pub position: [f64; 4],
    /// physical a = logical a + a_origin
    pub a_origin: f64,
    /// Surface tilt (degrees) with the rotary axis at physical zero
    pub tilt_deg: f64,
    /// Surface height at y = 0
    pub surface_z: f64,
    pub enabled: BTreeMap<String, bool>,
    /// Toolhead `manual_move` calls: (target, speed)
    pub moves: Vec<([f64; 4], f64)>,
    /// Probe travel moves (not part of `moves`)
    pub travel: Vec<[f64; 4]>,
    pub scripts: Vec<String>,
    pub messages: Vec<String>,
}

/// Shared handle to the simulated machine.
#[derive(Debug, Clone)]
pub struct SimMachine {
    state: Rc<RefCell<MachineState>>,
}

impl SimMachine {
    /// A machine with every stepper enabled and the rotary axis at zero.
    pub fn new(tilt_deg: f64) -> Self {
        let enabled = ["stepper_x", "stepper_y", "stepper_z", "stepper_a"]
            .into_iter()
            .map(|s| (s.to_string(), true))
            .collect();
        SimMachine {
            state: Rc::new(RefCell::new(MachineState {
                position: [0.0; 4],
                a_origin: 0.0,
                tilt_deg,
                surface_z: 0.0,
                enabled,
                moves: Vec::new(),
                travel: Vec::new(),
                scripts: Vec::new(),
                messages: Vec::new(),
            })),
        }
    }

    /// Start the rotary axis at logical (and physical) `a`.
    pub fn with_a_position(self, a: f64) -> Self {
        self.state.borrow_mut().position[A_AXIS] = a;
        self
    }

    pub fn set_enabled(&self, stepper: &str, enabled: bool) {
        self.state
            .borrow_mut()
            .enabled
            .insert(stepper.to_string(), enabled);
    }

    pub fn state(&self) -> Ref<'_, MachineState> {
        self.state.borrow()
    }

    pub fn physical_a(&self) -> f64 {
        let st = self.state.borrow();
        st.position[A_AXIS] + st.a_origin
    }

    /// Tilt currently seen by the probe, in degrees.
    pub fn effective_tilt_deg(&self) -> f64 {
        self.state.borrow().tilt_deg + self.physical_a()
    }

    /// Surface height under lateral coordinate `y`.
    pub fn surface_height(&self, y: f64) -> f64 {
        let z0 = self.state.borrow().surface_z;
        z0 + y * self.effective_tilt_deg().to_radians().tan()
    }

    pub fn messages(&self) -> Vec<String> {
        self.state.borrow().messages.clone()
    }

    /// Drain recorded responder messages.
    pub fn take_messages(&self) -> Vec<String> {
        std::mem::take(&mut self.state.borrow_mut().messages)
    }

    pub fn steppers(&self) -> SimulatedSteppers {
        SimulatedSteppers {
            machine: self.clone(),
        }
    }

    pub fn toolhead(&self) -> SimulatedToolhead {
        SimulatedToolhead {
            machine: self.clone(),
        }
    }

    pub fn gcode(&self) -> SimulatedGcode {
        SimulatedGcode {
            machine: self.clone(),
        }
    }

    pub fn probe(&self, settings: ProbeSettings) -> SimulatedProbe {
        SimulatedProbe::new(self.clone(), settings)
    }

    pub(crate) fn record_travel(&self, target: [f64; 4]) {
        let mut st = self.state.borrow_mut();
        st.travel.push(target);
        st.position = target;
    }

    /// `G92`: redefine logical coordinates without moving. Only A shifts the origin.
    fn set_position(&self, args: &str) -> Result<(), HwError> {
        let mut st = self.state.borrow_mut();
        for word in args.split_whitespace() {
            let mut chars = word.chars();
            let letter = chars
                .next()
                .map(|c| c.to_ascii_uppercase())
                .ok_or_else(|| HwError::UnsupportedCommand(word.to_string()))?;
            let idx = AXIS_LETTERS
                .iter()
                .position(|&l| l == letter)
                .ok_or_else(|| HwError::UnsupportedCommand(format!("G92 {word}")))?;
            let value: f64 = chars
                .as_str()
                .parse()
                .map_err(|_| HwError::UnsupportedCommand(format!("G92 {word}")))?;
            if idx == A_AXIS {
                st.a_origin += st.position[A_AXIS] - value;
            }
            st.position[idx] = value;
        }
        Ok(())
    }
}

/// Stepper enable registry.
#[derive(Debug, Clone)]
pub struct SimulatedSteppers {
    machine: SimMachine,
}

impl StepperEnable for SimulatedSteppers {
    fn is_motor_enabled(&self, stepper: &str) -> Result<bool, BoxError> {
        self.machine
            .state
            .borrow()
            .enabled
            .get(stepper)
            .copied()
            .ok_or_else(|| HwError::UnknownStepper(stepper.to_string()).into())
    }
}

/// Four-axis toolhead (x, y, z, a).
#[derive(Debug, Clone)]
pub struct SimulatedToolhead {
    machine: SimMachine,
}

impl Toolhead for SimulatedToolhead {
    fn get_position(&mut self) -> Result<Vec<f64>, BoxError> {
        Ok(self.machine.state.borrow().position.to_vec())
    }

    fn manual_move(&mut self, position: &[f64], speed: f64) -> Result<(), BoxError> {
        let target: [f64; 4] = position.try_into().map_err(|_| {
            HwError::InvalidMove(format!("expected 4 coordinates, got {}", position.len()))
        })?;
        if !(speed.is_finite() && speed > 0.0) {
            return Err(HwError::InvalidMove(format!("speed {speed} must be > 0")).into());
        }
        if target.iter().any(|v| !v.is_finite()) {
            return Err(HwError::InvalidMove("non-finite coordinate".to_string()).into());
        }
        tracing::debug!(?target, speed, "simulated manual move");
        let mut st = self.machine.state.borrow_mut();
        st.moves.push((target, speed));
        st.position = target;
        Ok(())
    }
}

/// Command responder; records messages and executes `G92`.
#[derive(Debug, Clone)]
pub struct SimulatedGcode {
    machine: SimMachine,
}

impl Responder for SimulatedGcode {
    fn respond_info(&mut self, msg: &str) {
        tracing::debug!(msg, "respond_info");
        self.machine.state.borrow_mut().messages.push(msg.to_string());
    }

    fn run_script_from_command(&mut self, script: &str) -> Result<(), BoxError> {
        self.machine
            .state
            .borrow_mut()
            .scripts
            .push(script.to_string());
        let script = script.trim();
        let (cmd, args) = script.split_once(' ').unwrap_or((script, ""));
        if cmd.eq_ignore_ascii_case("G92") {
            self.machine.set_position(args)?;
            Ok(())
        } else {
            Err(HwError::UnsupportedCommand(script.to_string()).into())
        }
    }
}
