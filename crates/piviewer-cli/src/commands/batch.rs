use super::progress_reporter;
use crate::cli::BatchArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use piviewer::core::io::report::{self, BatchRecord};
use piviewer::workflows::batch::{self, EntryStatus};
use std::io::{self, Write};
use tracing::{info, warn};

pub fn run(args: BatchArgs, show_progress: bool) -> Result<()> {
    let partial_config = PartialConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_batch_args(&args)?;

    let entries = batch::read_list(&args.list)?;
    info!(
        "Loaded {} entr(ies) from dataset list {:?}",
        entries.len(),
        &args.list
    );

    let results = {
        let reporter = progress_reporter(show_progress);
        batch::run(&entries, &config, &reporter)
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for result in &results {
        writeln!(out, "{} {}", result.code, result.legacy_value())?;
    }

    for result in &results {
        if let EntryStatus::LoadFailed(message) = &result.status {
            warn!("{}: {}", result.code, message);
        }
    }

    if let Some(path) = &args.output {
        let records: Vec<BatchRecord> = results.iter().map(BatchRecord::from).collect();
        info!("Writing batch summary to {:?}", path);
        report::write_csv_file(path, &records)?;
    }

    Ok(())
}
