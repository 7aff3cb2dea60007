use crate::error::{CliError, Result};
use piviewer::engine::detector::NARRATION_TARGET;
use std::fs::File;
use std::path::Path;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    fmt,
    prelude::*,
};

/// Maps `-q` and the `-v` count to a level: WARN by default, up to TRACE.
/// `-q` keeps errors only.
pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Per-target filter for both log layers.
///
/// At the default level the detector's narration is still let through at
/// INFO, so `criteria.verbose` alone decides whether it is shown.
pub fn log_targets(verbosity: u8, quiet: bool) -> Targets {
    let level = level_filter(verbosity, quiet);
    let targets = Targets::new().with_default(level);
    if level == LevelFilter::WARN {
        targets.with_target(NARRATION_TARGET, LevelFilter::INFO)
    } else {
        targets
    }
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .compact();

    let file_layer = log_file
        .map(|path| {
            File::create(path).map(|file| {
                fmt::layer()
                    .with_writer(file)
                    .with_ansi(false)
                    .with_target(true)
            })
        })
        .transpose()
        .map_err(CliError::Io)?;

    tracing_subscriber::registry()
        .with(log_targets(verbosity, quiet))
        .with(console)
        .with(file_layer)
        .init();

    Ok(())
}
