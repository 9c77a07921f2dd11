#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Rotary axis alignment adjuster (hardware-agnostic).
//!
//! Probes two reference points, derives the tilt of the surface carried by
//! the rotary axis from their height difference, and rotates the axis to
//! cancel it. All machine interaction goes through the `rotaxis_traits`
//! collaborator traits.
//!
//! ## Architecture
//!
//! - **Configuration**: runtime settings and constants (`config` module)
//! - **Correction math**: angle, wrap, guard (`correction` module)
//! - **Finalize**: per-point results and the corrective move (`engine` module)
//! - **Command handling**: precondition and probe delegation (`adjuster` module)
//! - **Construction**: builder and generic constructor (`builder` module)
//! - **Status**: state machine and last results (`status`, `results` modules)

pub mod adjuster;
pub mod builder;
pub mod config;
pub mod conversions;
pub mod correction;
pub mod engine;
pub mod error;
pub mod hw_error;
pub mod mocks;
pub mod points;
pub mod results;
pub mod status;

pub use adjuster::AdjusterCore;
pub use builder::{Adjuster, AdjusterBuilder, build_adjuster};
pub use config::{AdjustCfg, COMMAND_HELP, COMMAND_NAME};
pub use conversions::reference_points;
pub use correction::correction_angle;
pub use error::{AdjustError, BuildError, Result};
pub use points::{MeasuredPosition, ReferencePoint};
pub use results::{AdjusterStatus, AdjustmentResult, ScrewResult};
pub use status::{AdjustState, CommandOutcome, CorrectionOutcome};
