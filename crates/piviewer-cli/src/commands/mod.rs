pub mod batch;
pub mod detect;

use crate::utils::progress::CliProgressHandler;
use piviewer::engine::progress::ProgressReporter;

/// A reporter drawing to stderr, or a silent one when progress is unwanted.
fn progress_reporter(show_progress: bool) -> ProgressReporter<'static> {
    if show_progress {
        ProgressReporter::with_callback(CliProgressHandler::new().get_callback())
    } else {
        ProgressReporter::new()
    }
}
