//! Test and helper mocks for rotaxis_core
//!
//! Every mock shares one `Recorder` log, so a test can hand the mocks to an
//! adjuster by value and still inspect what happened afterwards.

use std::cell::RefCell;
use std::rc::Rc;

use rotaxis_traits::{
    BoxError, GcodeCommand, LateralPoint, ProbeFinalize, ProbePointsHelper, ProbedPosition,
    Responder, StepperEnable, Toolhead,
};

#[derive(Debug, Default)]
pub struct Log {
    pub messages: Vec<String>,
    pub scripts: Vec<String>,
    pub moves: Vec<(Vec<f64>, f64)>,
    pub probe_points: Vec<LateralPoint>,
    pub probe_minimum: usize,
    pub probe_runs: usize,
    /// Positions the canned probe hands to finalize on the next run
    pub positions: Vec<ProbedPosition>,
    pub motor_enabled: bool,
    pub toolhead_position: Vec<f64>,
}

/// Shared log handle.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    log: Rc<RefCell<Log>>,
}

impl Recorder {
    /// Motor enabled, toolhead at the origin of a four-axis machine.
    pub fn new() -> Self {
        let rec = Self::default();
        {
            let mut log = rec.log.borrow_mut();
            log.motor_enabled = true;
            log.toolhead_position = vec![0.0; 4];
        }
        rec
    }

    pub fn set_positions(&self, positions: Vec<ProbedPosition>) {
        self.log.borrow_mut().positions = positions;
    }

    pub fn set_motor_enabled(&self, enabled: bool) {
        self.log.borrow_mut().motor_enabled = enabled;
    }

    pub fn set_toolhead_position(&self, position: Vec<f64>) {
        self.log.borrow_mut().toolhead_position = position;
    }

    pub fn messages(&self) -> Vec<String> {
        self.log.borrow().messages.clone()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.log.borrow().scripts.clone()
    }

    pub fn moves(&self) -> Vec<(Vec<f64>, f64)> {
        self.log.borrow().moves.clone()
    }

    pub fn probe_points(&self) -> Vec<LateralPoint> {
        self.log.borrow().probe_points.clone()
    }

    pub fn probe_minimum(&self) -> usize {
        self.log.borrow().probe_minimum
    }

    pub fn probe_runs(&self) -> usize {
        self.log.borrow().probe_runs
    }

    pub fn probe(&self) -> CannedProbe {
        CannedProbe {
            log: self.log.clone(),
        }
    }

    pub fn steppers(&self) -> SwitchSteppers {
        SwitchSteppers {
            log: self.log.clone(),
        }
    }

    pub fn toolhead(&self) -> RecordingToolhead {
        RecordingToolhead {
            log: self.log.clone(),
        }
    }

    pub fn responder(&self) -> RecordingResponder {
        RecordingResponder {
            log: self.log.clone(),
        }
    }
}

/// Probe helper that finalizes with whatever positions the recorder holds.
pub struct CannedProbe {
    log: Rc<RefCell<Log>>,
}

impl ProbePointsHelper for CannedProbe {
    fn use_points(&mut self, points: &[LateralPoint], minimum: usize) -> Result<(), BoxError> {
        let mut log = self.log.borrow_mut();
        log.probe_points = points.to_vec();
        log.probe_minimum = minimum;
        Ok(())
    }

    fn start_probe(
        &mut self,
        _cmd: &GcodeCommand,
        finalize: &mut dyn ProbeFinalize,
    ) -> Result<(), BoxError> {
        let positions = {
            let mut log = self.log.borrow_mut();
            log.probe_runs += 1;
            log.positions.clone()
        };
        finalize.probe_finalize([0.0; 3], &positions)
    }
}

/// Enable registry answering for any stepper name.
pub struct SwitchSteppers {
    log: Rc<RefCell<Log>>,
}

impl StepperEnable for SwitchSteppers {
    fn is_motor_enabled(&self, _stepper: &str) -> Result<bool, BoxError> {
        Ok(self.log.borrow().motor_enabled)
    }
}

pub struct RecordingToolhead {
    log: Rc<RefCell<Log>>,
}

impl Toolhead for RecordingToolhead {
    fn get_position(&mut self) -> Result<Vec<f64>, BoxError> {
        Ok(self.log.borrow().toolhead_position.clone())
    }

    fn manual_move(&mut self, position: &[f64], speed: f64) -> Result<(), BoxError> {
        let mut log = self.log.borrow_mut();
        log.moves.push((position.to_vec(), speed));
        log.toolhead_position = position.to_vec();
        Ok(())
    }
}

pub struct RecordingResponder {
    log: Rc<RefCell<Log>>,
}

impl Responder for RecordingResponder {
    fn respond_info(&mut self, msg: &str) {
        self.log.borrow_mut().messages.push(msg.to_string());
    }

    fn run_script_from_command(&mut self, script: &str) -> Result<(), BoxError> {
        self.log.borrow_mut().scripts.push(script.to_string());
        Ok(())
    }
}
