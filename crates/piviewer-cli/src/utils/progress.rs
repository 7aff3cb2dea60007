use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use piviewer::engine::progress::{Progress, ProgressCallback};
use piviewer::workflows::detect::LIGAND_NOT_FOUND;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

#[derive(Debug)]
struct BarState {
    pb: ProgressBar,
    phase: &'static str,
    /// Entries reported with the `-1` legacy value in the current task.
    unresolved: u64,
}

impl BarState {
    /// Folds a `<code> <legacy value>` batch message into the bar.
    fn record_entry(&mut self, message: &str) {
        let entry = message
            .rsplit_once(' ')
            .and_then(|(code, value)| Some((code, value.parse::<i64>().ok()?)));
        let Some((code, value)) = entry else {
            self.pb.set_message(message.to_string());
            return;
        };
        if value == LIGAND_NOT_FOUND {
            self.unresolved += 1;
        }
        self.pb.set_message(format!("{code} -> {value}"));
    }

    fn summary(&self) -> String {
        let total = self.pb.length().unwrap_or(0);
        match self.unresolved {
            0 => format!("{}: {} entries", self.phase, total),
            n => format!("{}: {} entries, {} without ligand", self.phase, total, n),
        }
    }
}

/// Draws workflow progress on stderr: a spinner per phase and a counted bar
/// while a batch runs, labelled with the most recent entry result.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<BarState>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
        pb.finish_and_clear();
        Self {
            state: Arc::new(Mutex::new(BarState {
                pb,
                phase: "",
                unresolved: 0,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut state) = state.lock() else {
                warn!("Progress state mutex was poisoned; dropping progress event.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    state.phase = name;
                    state.unresolved = 0;
                    state.pb.reset();
                    state.pb.set_length(0);
                    state.pb.set_style(spinner_style());
                    state.pb.set_prefix(name);
                    state.pb.set_message("");
                    state.pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                }
                Progress::TaskStart { total_steps } => {
                    state.pb.disable_steady_tick();
                    state.pb.reset();
                    state.pb.set_length(total_steps);
                    state.pb.set_style(bar_style());
                }
                Progress::TaskIncrement => state.pb.inc(1),
                Progress::Message(message) => state.record_entry(&message),
                Progress::TaskFinish => {
                    let total = state.pb.length().unwrap_or(0);
                    state.pb.set_position(total);
                    let summary = state.summary();
                    state.pb.finish_with_message(summary);
                }
                // A finished task keeps its summary on screen.
                Progress::PhaseFinish if state.pb.is_finished() => {}
                Progress::PhaseFinish => {
                    state.pb.disable_steady_tick();
                    state.pb.finish_and_clear();
                }
            }
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {prefix} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
        .map(|style| style.progress_chars("##-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}
