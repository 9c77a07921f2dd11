#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the rotary axis adjuster.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//! - Reference positions use numbered keys (`pos1`, `pos2`, ...) that are
//!   scanned in order until the first gap, then checked to be exactly two.
use std::collections::BTreeMap;
use std::path::Path;

use eyre::WrapErr;
use serde::Deserialize;
use thiserror::Error;

/// Upper bound on numbered `posN` keys scanned.
pub const MAX_POSITIONS: usize = 99;

/// The routine measures an angle between two points; nothing else is accepted.
pub const REQUIRED_POSITIONS: usize = 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("rot_axis_adjust: must have exactly {expected} positions, found {found}")]
    PointCount { expected: usize, found: usize },
    #[error("rot_axis_adjust: {key} must be a pair of finite numbers")]
    InvalidPosition { key: String },
    #[error("rot_axis_adjust: {key} must be a string")]
    InvalidName { key: String },
    #[error("rot_axis_adjust: unknown option '{key}'")]
    UnknownOption { key: String },
}

/// One configured reference position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionCfg {
    pub coord: [f64; 2],
    pub name: String,
}

/// Default label for a position without `posN_name`.
pub fn default_position_name(coord: [f64; 2]) -> String {
    format!("pos at {:.3},{:.3}", coord[0], coord[1])
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RotAxisAdjustCfg {
    /// Stepper whose enable line must be active before probing.
    pub stepper: String,
    /// Axis letter used for messages and the re-zero command.
    pub axis: String,
    /// Corrections with a larger magnitude (degrees) are reported, not applied.
    pub max_correction_deg: f64,
    /// Feed rate for the corrective move.
    pub move_speed: f64,
    /// `posN` / `posN_name` entries, scanned by `positions()`.
    #[serde(flatten)]
    pub entries: BTreeMap<String, toml::Value>,
}

impl Default for RotAxisAdjustCfg {
    fn default() -> Self {
        Self {
            stepper: "stepper_a".to_string(),
            axis: "A".to_string(),
            max_correction_deg: 3.0,
            move_speed: 5.0,
            entries: BTreeMap::new(),
        }
    }
}

impl RotAxisAdjustCfg {
    /// Scan `pos1..pos99`, stopping at the first missing index.
    pub fn positions(&self) -> Result<Vec<PositionCfg>, ConfigError> {
        let mut out = Vec::new();
        for i in 1..=MAX_POSITIONS {
            let key = format!("pos{i}");
            let Some(value) = self.entries.get(&key) else {
                break;
            };
            let coord = parse_pair(value).ok_or_else(|| ConfigError::InvalidPosition {
                key: key.clone(),
            })?;
            let name_key = format!("{key}_name");
            let name = match self.entries.get(&name_key) {
                None => default_position_name(coord),
                Some(toml::Value::String(s)) => s.clone(),
                Some(_) => return Err(ConfigError::InvalidName { key: name_key }),
            };
            out.push(PositionCfg { coord, name });
        }
        if out.len() != REQUIRED_POSITIONS {
            return Err(ConfigError::PointCount {
                expected: REQUIRED_POSITIONS,
                found: out.len(),
            });
        }
        Ok(out)
    }

    /// Flattened keys that are neither `posN` nor `posN_name`.
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(|k| !is_position_key(k))
    }
}

fn is_position_key(key: &str) -> bool {
    let Some(rest) = key.strip_prefix("pos") else {
        return false;
    };
    let digits = rest.strip_suffix("_name").unwrap_or(rest);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_pair(value: &toml::Value) -> Option<[f64; 2]> {
    let toml::Value::Array(items) = value else {
        return None;
    };
    if items.len() != 2 {
        return None;
    }
    let num = |v: &toml::Value| match v {
        toml::Value::Float(f) if f.is_finite() => Some(*f),
        toml::Value::Integer(i) => Some(*i as f64),
        _ => None,
    };
    Some([num(&items[0])?, num(&items[1])?])
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProbeCfg {
    /// Z height for travel moves between probe points
    pub horizontal_move_z: f64,
    /// Travel speed between points
    pub speed: f64,
    /// Speed when lifting back to `horizontal_move_z`; defaults to `speed`
    pub lift_speed: Option<f64>,
    pub x_offset: f64,
    pub y_offset: f64,
    pub z_offset: f64,
}

impl Default for ProbeCfg {
    fn default() -> Self {
        Self {
            horizontal_move_z: 5.0,
            speed: 50.0,
            lift_speed: None,
            x_offset: 0.0,
            y_offset: 0.0,
            z_offset: 0.0,
        }
    }
}

impl ProbeCfg {
    pub fn offsets(&self) -> [f64; 3] {
        [self.x_offset, self.y_offset, self.z_offset]
    }

    pub fn lift_speed(&self) -> f64 {
        self.lift_speed.unwrap_or(self.speed)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub rot_axis_adjust: RotAxisAdjustCfg,
    #[serde(default)]
    pub probe: ProbeCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read config {}", path.display()))?;
    let cfg = load_toml(&text).wrap_err_with(|| format!("parse config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        let adj = &self.rot_axis_adjust;

        // Positions
        adj.positions().map_err(eyre::Report::new)?;
        if let Some(key) = adj.unknown_keys().next() {
            return Err(eyre::Report::new(ConfigError::UnknownOption {
                key: key.to_string(),
            }));
        }

        // Adjustment
        if adj.stepper.trim().is_empty() {
            eyre::bail!("rot_axis_adjust.stepper must not be empty");
        }
        if adj.axis.len() != 1 || !adj.axis.bytes().all(|b| b.is_ascii_alphabetic()) {
            eyre::bail!("rot_axis_adjust.axis must be a single letter");
        }
        if !(adj.max_correction_deg.is_finite() && adj.max_correction_deg > 0.0) {
            eyre::bail!("rot_axis_adjust.max_correction_deg must be > 0");
        }
        if adj.max_correction_deg >= 90.0 {
            eyre::bail!("rot_axis_adjust.max_correction_deg must be < 90");
        }
        if !(adj.move_speed.is_finite() && adj.move_speed > 0.0) {
            eyre::bail!("rot_axis_adjust.move_speed must be > 0");
        }

        // Probe
        if !(self.probe.speed.is_finite() && self.probe.speed > 0.0) {
            eyre::bail!("probe.speed must be > 0");
        }
        if let Some(lift) = self.probe.lift_speed
            && !(lift.is_finite() && lift > 0.0)
        {
            eyre::bail!("probe.lift_speed must be > 0");
        }
        if !self.probe.horizontal_move_z.is_finite() {
            eyre::bail!("probe.horizontal_move_z must be finite");
        }
        if !self.probe.offsets().iter().all(|v| v.is_finite()) {
            eyre::bail!("probe offsets must be finite");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
