//! `rotaxis`: run the rotary axis alignment routine against the simulator.

mod adjust;
mod cli;
mod error_fmt;

use clap::Parser;
use eyre::WrapErr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::adjust::SimParams;
use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{ConfigLoad, exit_code_for_error, format_error_json, humanize};

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    let loaded = rotaxis_config::load_file(&cli.config)
        .wrap_err_with(|| ConfigLoad(cli.config.clone()));
    let file_guard = init_tracing(&cli, loaded.as_ref().ok().map(|c| &c.logging));

    let res = loaded.and_then(|cfg| run(&cli, &cfg));
    if let Err(e) = res {
        tracing::error!(error = %format!("{e:#}"), "command failed");
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        drop(file_guard);
        std::process::exit(exit_code_for_error(&e));
    }
}

fn run(cli: &Cli, cfg: &rotaxis_config::Config) -> eyre::Result<()> {
    match &cli.cmd {
        Commands::Adjust {
            tilt_deg,
            a_start,
            disabled,
            repeat,
            params,
        } => {
            let sim = SimParams {
                tilt_deg: *tilt_deg,
                a_start: *a_start,
                disabled: *disabled,
            };
            adjust::run_adjust(cfg, sim, *repeat, params, cli.json)
        }
        Commands::CheckConfig => adjust::check_config(cfg, cli.json),
        Commands::SelfCheck => adjust::self_check(cfg),
    }
}

/// Console layer on stderr (`RUST_LOG` wins over `--log-level`), plus an
/// optional JSON-lines file layer from `[logging]`. The returned guard flushes
/// the file writer on drop.
fn init_tracing(cli: &Cli, logging: Option<&rotaxis_config::Logging>) -> Option<WorkerGuard> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let console = if cli.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(console_filter)
            .boxed()
    };

    let mut guard = None;
    let file = logging.and_then(|l| {
        let path = std::path::Path::new(l.file.as_deref()?);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| std::path::Path::new("."));
        let name = path.file_name()?;
        let appender = match l.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, g) = tracing_appender::non_blocking(appender);
        guard = Some(g);
        let level = l.level.as_deref().unwrap_or("info");
        Some(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(EnvFilter::new(level))
                .boxed(),
        )
    });

    let _ = tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init();
    guard
}
