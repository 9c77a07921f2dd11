//! Human-readable error descriptions and structured JSON error formatting.

use std::fmt;
use std::path::PathBuf;

use rotaxis_config::ConfigError;
use rotaxis_core::error::{AdjustError, BuildError};

/// Context attached to every config load failure so it maps to exit code 3.
#[derive(Debug)]
pub struct ConfigLoad(pub PathBuf);

impl fmt::Display for ConfigLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid configuration in {}", self.0.display())
    }
}

/// Context for a failed adjust run, carrying the messages reported before
/// the failure so JSON output can include them.
#[derive(Debug)]
pub struct RunFailed {
    pub run: u32,
    pub repeat: u32,
    pub messages: Vec<String>,
}

impl fmt::Display for RunFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run {} of {}", self.run, self.repeat)
    }
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(ce) = err.downcast_ref::<ConfigError>() {
        return match ce {
            ConfigError::PointCount { expected, found } => format!(
                "What happened: Found {found} reference positions, need exactly {expected}.\nLikely causes: Missing pos1/pos2 in [rot_axis_adjust], or a gap in the numbering.\nHow to fix: Define pos1 and pos2 as [x, y] and nothing beyond."
            ),
            ConfigError::InvalidPosition { key } => format!(
                "What happened: '{key}' is not a valid position.\nLikely causes: Not a two-element array of numbers.\nHow to fix: Write it as {key} = [x, y]."
            ),
            ConfigError::InvalidName { key } => format!(
                "What happened: '{key}' must be a string.\nHow to fix: Quote the name, e.g. {key} = \"front\"."
            ),
            ConfigError::UnknownOption { key } => format!(
                "What happened: Unknown option '{key}' in [rot_axis_adjust].\nLikely causes: Typo, or a position beyond the two that are used.\nHow to fix: Remove or rename the option."
            ),
        };
    }

    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::PointCount(n) => format!(
                "What happened: The adjuster needs exactly 2 reference points, got {n}.\nHow to fix: Check pos1/pos2 in [rot_axis_adjust]."
            ),
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
            other => format!(
                "What happened: The adjuster could not be assembled ({other}).\nHow to fix: This is a wiring bug; re-run with --log-level=debug and report it."
            ),
        };
    }

    if let Some(ae) = err.downcast_ref::<AdjustError>() {
        return match ae {
            AdjustError::Config(msg) => format!(
                "What happened: {msg}.\nLikely causes: rot_axis_adjust.stepper names a stepper the machine does not have.\nHow to fix: Set stepper to the rotary axis stepper (default stepper_a)."
            ),
            AdjustError::Probe(msg) => format!(
                "What happened: Probing failed ({msg}).\nLikely causes: Bad SPEED/HORIZONTAL_MOVE_Z parameter or probe fault.\nHow to fix: Check the command parameters and the [probe] section."
            ),
            AdjustError::State(msg) => format!(
                "What happened: {msg}.\nHow to fix: The toolhead must report X, Y, Z and A."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    let msg = format!("{err:#}");
    if err.downcast_ref::<ConfigLoad>().is_some() {
        return format!("What happened: {msg}.\nHow to fix: Edit the config file, then rerun.");
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 config, 4 build, 5 hardware/probe, 1 anything else.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<ConfigLoad>().is_some() || err.downcast_ref::<ConfigError>().is_some()
    {
        return 3;
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return 4;
    }
    match err.downcast_ref::<AdjustError>() {
        Some(AdjustError::Config(_)) => 3,
        Some(
            AdjustError::Hardware(_)
            | AdjustError::HardwareFault(_)
            | AdjustError::Probe(_)
            | AdjustError::State(_),
        ) => 5,
        _ => 1,
    }
}

pub fn reason_name(err: &eyre::Report) -> &'static str {
    match exit_code_for_error(err) {
        3 => "Config",
        4 => "Build",
        5 => "Hardware",
        _ => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    let messages = err
        .downcast_ref::<RunFailed>()
        .map_or(&[][..], |r| r.messages.as_slice());
    json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "error": format!("{err:#}"),
        "message": humanize(err),
        "messages": messages,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_errors_map_to_exit_codes() {
        let e = eyre::Report::new(ConfigError::PointCount {
            expected: 2,
            found: 1,
        });
        assert_eq!(exit_code_for_error(&e), 3);

        let e = eyre::Report::new(BuildError::MissingProbe).wrap_err("building");
        assert_eq!(exit_code_for_error(&e), 4);

        let e = eyre::Report::new(AdjustError::Probe("x".into())).wrap_err("probing");
        assert_eq!(exit_code_for_error(&e), 5);
        assert_eq!(reason_name(&e), "Hardware");

        let e = eyre::Report::new(AdjustError::UnknownCommand("G28".into()));
        assert_eq!(exit_code_for_error(&e), 1);
    }

    #[test]
    fn config_load_context_wins() {
        let e = eyre::eyre!("max_correction_deg must be > 0 and < 90")
            .wrap_err(ConfigLoad(PathBuf::from("cfg.toml")));
        assert_eq!(exit_code_for_error(&e), 3);
        assert!(humanize(&e).contains("max_correction_deg"));
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&e)).unwrap();
        assert_eq!(v["reason"], "Config");
        assert_eq!(v["exit_code"], 3);
    }

    #[test]
    fn run_failure_carries_reported_messages() {
        let e = eyre::Report::new(AdjustError::State("no rotary axis".into())).wrap_err(
            RunFailed {
                run: 2,
                repeat: 3,
                messages: vec!["a_correction: 1.000 deg".into()],
            },
        );
        assert_eq!(exit_code_for_error(&e), 5);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&e)).unwrap();
        assert_eq!(v["messages"], serde_json::json!(["a_correction: 1.000 deg"]));
        assert!(v["error"].as_str().unwrap().starts_with("run 2 of 3"));

        let plain = eyre::eyre!("boom");
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&plain)).unwrap();
        assert_eq!(v["messages"], serde_json::json!([]));
    }
}
