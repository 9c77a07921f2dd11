//! Simulator assembly, config mapping and command execution.

use rotaxis_config::{Config, ProbeCfg};
use rotaxis_core::error::Result as CoreResult;
use rotaxis_core::{Adjuster, COMMAND_NAME, CommandOutcome, CorrectionOutcome};
use rotaxis_hardware::{ProbeSettings, SimMachine};
use rotaxis_traits::GcodeCommand;
use serde_json::json;

use crate::error_fmt::RunFailed;

/// Simulated machine knobs from the command line.
#[derive(Debug, Clone, Copy)]
pub struct SimParams {
    pub tilt_deg: f64,
    pub a_start: f64,
    pub disabled: bool,
}

pub fn probe_settings(p: &ProbeCfg) -> ProbeSettings {
    ProbeSettings {
        horizontal_move_z: p.horizontal_move_z,
        speed: p.speed,
        lift_speed: p.lift_speed(),
        offsets: p.offsets(),
    }
}

/// Build the simulated machine and an adjuster wired onto it.
pub fn assemble(cfg: &Config, sim: SimParams) -> CoreResult<(SimMachine, Adjuster)> {
    let machine = SimMachine::new(sim.tilt_deg).with_a_position(sim.a_start);
    machine.set_enabled(&cfg.rot_axis_adjust.stepper, !sim.disabled);

    let adjuster = Adjuster::builder()
        .with_probe(machine.probe(probe_settings(&cfg.probe)))
        .with_steppers(machine.steppers())
        .with_toolhead(machine.toolhead())
        .with_responder(machine.gcode())
        .apply_config(cfg)?
        .try_build()?;
    Ok((machine, adjuster))
}

/// Turn `KEY=VALUE` words into a `ROT_AXIS_ADJUST` command.
pub fn build_command(params: &[String]) -> eyre::Result<GcodeCommand> {
    let mut cmd = GcodeCommand::new(COMMAND_NAME);
    for p in params {
        let (k, v) = p
            .split_once('=')
            .ok_or_else(|| eyre::eyre!("expected PARAM=VALUE, got '{p}'"))?;
        if k.trim().is_empty() {
            eyre::bail!("expected PARAM=VALUE, got '{p}'");
        }
        cmd = cmd.with_param(k.trim(), v.trim());
    }
    Ok(cmd)
}

pub fn outcome_name(out: &CommandOutcome) -> &'static str {
    match out {
        CommandOutcome::MotorDisabled => "motor_disabled",
        CommandOutcome::Probed(None) => "no_result",
        CommandOutcome::Probed(Some(CorrectionOutcome::Applied { .. })) => "applied",
        CommandOutcome::Probed(Some(CorrectionOutcome::TooLarge { .. })) => "too_large",
    }
}

/// Run the adjust command `repeat` times, printing each run's report.
pub fn run_adjust(
    cfg: &Config,
    sim: SimParams,
    repeat: u32,
    params: &[String],
    json_mode: bool,
) -> CoreResult<()> {
    let cmd = build_command(params)?;
    let (machine, mut adjuster) = assemble(cfg, sim)?;
    let repeat = repeat.max(1);
    tracing::info!(command = %cmd, repeat, "running adjustment");

    for run in 1..=repeat {
        let outcome = adjuster.handle_command(&cmd);
        let messages = machine.take_messages();
        let outcome = match outcome {
            Ok(o) => o,
            Err(e) => {
                // Whatever was reported before the failure still reaches the user.
                if !json_mode {
                    for m in &messages {
                        println!("{m}");
                    }
                }
                return Err(e.wrap_err(RunFailed {
                    run,
                    repeat,
                    messages,
                }));
            }
        };
        let status = adjuster.get_status(f64::from(run));

        if json_mode {
            let correction = match outcome {
                CommandOutcome::Probed(Some(o)) => serde_json::to_value(o)?,
                _ => serde_json::Value::Null,
            };
            let line = json!({
                "run": run,
                "outcome": outcome_name(&outcome),
                "correction": correction,
                "a_position": machine.state().position[rotaxis_hardware::A_AXIS],
                "messages": messages,
                "status": status,
            });
            println!("{line}");
        } else {
            for m in &messages {
                println!("{m}");
            }
            for (key, z) in status.results.iter() {
                println!("{key}: z={z:.5}");
            }
            println!("{}", outcome_name(&outcome));
        }
    }
    Ok(())
}

pub fn check_config(cfg: &Config, json_mode: bool) -> CoreResult<()> {
    let points = rotaxis_core::reference_points(&cfg.rot_axis_adjust).map_err(eyre::Report::new)?;
    if json_mode {
        let list: Vec<_> = points
            .iter()
            .map(|p| json!({ "name": p.name(), "x": p.x(), "y": p.y() }))
            .collect();
        println!(
            "{}",
            json!({
                "ok": true,
                "stepper": cfg.rot_axis_adjust.stepper,
                "axis": cfg.rot_axis_adjust.axis,
                "points": list,
            })
        );
    } else {
        println!("config ok");
        for (i, p) in points.iter().enumerate() {
            println!("pos{}: {} ({:.3}, {:.3})", i + 1, p.name(), p.x(), p.y());
        }
    }
    Ok(())
}

pub fn self_check(cfg: &Config) -> CoreResult<()> {
    let sim = SimParams {
        tilt_deg: 0.0,
        a_start: 0.0,
        disabled: false,
    };
    let (_machine, adjuster) = assemble(cfg, sim)?;
    tracing::debug!(?adjuster, "self-check adjuster");
    println!("OK");
    Ok(())
}
