use super::progress_reporter;
use crate::cli::DetectArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use crate::utils::table;
use piviewer::core::io::report;
use piviewer::workflows::detect::{self, LIGAND_NOT_FOUND};
use std::io::{self, Write};
use tracing::info;

pub fn run(args: DetectArgs, show_progress: bool) -> Result<()> {
    let partial_config = PartialConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let (detection_config, perception_config) = partial_config.merge_with_detect_args(&args)?;

    let reporter = progress_reporter(show_progress && !args.legacy);
    let result = detect::run(
        &args.input,
        args.format,
        &args.ligand,
        &detection_config,
        &perception_config,
        &reporter,
    );

    let report = match result {
        Ok(report) => report,
        Err(e) if args.legacy && e.is_ligand_not_found() => {
            info!("{}", e);
            println!("{}", LIGAND_NOT_FOUND);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.legacy {
        writeln!(out, "{}", report.count())?;
    } else {
        table::write_pair_table(&mut out, &report)?;
    }

    if let Some(path) = &args.output {
        info!("Writing {} pair record(s) to {:?}", report.count(), path);
        report::write_csv_file(path, &detect::pair_records(&report))?;
        if !args.legacy {
            writeln!(out, "Pair report written to: {}", path.display())?;
        }
    }

    Ok(())
}
