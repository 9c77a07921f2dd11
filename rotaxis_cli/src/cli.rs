//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(
    name = "rotaxis",
    version,
    about = "Rotary axis alignment against a simulated machine"
)]
pub struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE", default_value = "etc/rotaxis.toml")]
    pub config: PathBuf,

    /// Emit JSON lines (output, logs and errors) instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe the reference points and correct the rotary axis
    Adjust {
        /// Simulated surface tilt in degrees with A at physical zero
        #[arg(long, value_name = "DEG", default_value_t = 0.0, allow_negative_numbers = true)]
        tilt_deg: f64,
        /// Starting A position
        #[arg(long, value_name = "POS", default_value_t = 0.0, allow_negative_numbers = true)]
        a_start: f64,
        /// Simulate a disabled rotary stepper
        #[arg(long, action = ArgAction::SetTrue)]
        disabled: bool,
        /// Run the command this many times in a row
        #[arg(long, value_name = "N", default_value_t = 1)]
        repeat: u32,
        /// Extra command parameters, e.g. SPEED=20 HORIZONTAL_MOVE_Z=10
        #[arg(value_name = "PARAM=VALUE")]
        params: Vec<String>,
    },
    /// Load and validate the config, then list the reference points
    CheckConfig,
    /// Quick health check (build the adjuster against the simulator)
    SelfCheck,
}
