use super::detect::{LIGAND_NOT_FOUND, prepare};
use crate::core::io::report::BatchRecord;
use crate::engine::config::BatchConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// One line of a dataset list: a structure code and the ligand names to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    /// 1-based line number in the list file.
    pub line: usize,
    pub code: String,
    pub ligands: Vec<String>,
}

/// Parses a dataset list.
///
/// Each non-blank line not starting with `#` holds a structure code and a
/// comma-separated list of ligand residue names, separated by whitespace
/// (e.g. `1ACJ THA,TAC`).
///
/// # Errors
///
/// Returns [`EngineError::BatchList`] for a line with a missing ligand list,
/// an empty ligand list, or extra fields.
pub fn parse_list(content: &str) -> Result<Vec<BatchEntry>, EngineError> {
    let mut entries = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let (Some(code), Some(ligand_field)) = (fields.next(), fields.next()) else {
            return Err(EngineError::BatchList {
                line,
                reason: "expected '<code> <ligand>[,<ligand>...]'".to_string(),
            });
        };
        if let Some(extra) = fields.next() {
            return Err(EngineError::BatchList {
                line,
                reason: format!("unexpected extra field '{}'", extra),
            });
        }

        let ligands: Vec<String> = ligand_field
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        if ligands.is_empty() {
            return Err(EngineError::BatchList {
                line,
                reason: "ligand list is empty".to_string(),
            });
        }

        entries.push(BatchEntry {
            line,
            code: code.to_string(),
            ligands,
        });
    }
    Ok(entries)
}

/// Reads and parses a dataset list file.
pub fn read_list(path: &Path) -> Result<Vec<BatchEntry>, EngineError> {
    let content = std::fs::read_to_string(path).map_err(|source| EngineError::ListIo {
        path: path.to_path_buf(),
        source,
    })?;
    parse_list(&content)
}

/// Detection outcome for one candidate ligand name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateResult {
    pub ligand: String,
    /// Number of qualifying pairs, `None` if no residue carries the name.
    pub count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    Ok,
    /// The structure could not be loaded; carries the error message.
    LoadFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryResult {
    pub code: String,
    pub path: PathBuf,
    pub candidates: Vec<CandidateResult>,
    pub status: EntryStatus,
}

impl EntryResult {
    /// Sum of qualifying pairs over all resolved candidates.
    pub fn total_found(&self) -> usize {
        self.candidates.iter().filter_map(|c| c.count).sum()
    }

    pub fn resolved(&self) -> usize {
        self.candidates.iter().filter(|c| c.count.is_some()).count()
    }

    pub fn unresolved(&self) -> usize {
        self.candidates.len() - self.resolved()
    }

    /// `-1` if no candidate resolved to a residue, otherwise [`Self::total_found`].
    pub fn legacy_value(&self) -> i64 {
        if self.resolved() == 0 {
            LIGAND_NOT_FOUND
        } else {
            self.total_found() as i64
        }
    }
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::LoadFailed(_) => "load-failed",
        }
    }
}

impl From<&EntryResult> for BatchRecord {
    fn from(result: &EntryResult) -> Self {
        Self {
            code: result.code.clone(),
            path: result.path.display().to_string(),
            total_found: result.total_found(),
            resolved: result.resolved(),
            unresolved: result.unresolved(),
            legacy_value: result.legacy_value(),
            status: result.status.as_str().to_string(),
        }
    }
}

/// Listed ligand names followed by the fallbacks, without repeats.
fn candidate_names(entry: &BatchEntry, fallbacks: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(entry.ligands.len() + fallbacks.len());
    for name in entry.ligands.iter().chain(fallbacks) {
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    names
}

fn process_entry(entry: &BatchEntry, config: &BatchConfig) -> EntryResult {
    let path = config.structure_path(&entry.code);
    let candidates = candidate_names(entry, &config.fallback_ligands);

    let prepared = match prepare(
        &path,
        config.format,
        &config.perception,
        &ProgressReporter::new(),
    ) {
        Ok(prepared) => prepared,
        Err(e) => {
            warn!(code = %entry.code, error = %e, "Skipping entry: structure could not be loaded.");
            return EntryResult {
                code: entry.code.clone(),
                path,
                candidates: candidates
                    .into_iter()
                    .map(|ligand| CandidateResult {
                        ligand,
                        count: None,
                    })
                    .collect(),
                status: EntryStatus::LoadFailed(e.to_string()),
            };
        }
    };

    let candidates = candidates
        .into_iter()
        .map(|ligand| {
            let count = prepared
                .detect(&ligand, &config.detection)
                .ok()
                .map(|report| report.count());
            CandidateResult { ligand, count }
        })
        .collect();

    EntryResult {
        code: entry.code.clone(),
        path,
        candidates,
        status: EntryStatus::Ok,
    }
}

/// Runs detection for every dataset entry, in order.
///
/// Each structure is loaded and perceived once and then scanned for every
/// candidate ligand. An entry whose structure cannot be loaded is recorded as
/// [`EntryStatus::LoadFailed`] and the batch carries on. After each entry a
/// [`Progress::Message`] of the form `<code> <legacy value>` is reported.
#[instrument(skip_all, name = "batch_workflow")]
pub fn run(
    entries: &[BatchEntry],
    config: &BatchConfig,
    reporter: &ProgressReporter,
) -> Vec<EntryResult> {
    reporter.report(Progress::PhaseStart {
        name: "Batch Analysis",
    });
    reporter.report(Progress::TaskStart {
        total_steps: entries.len() as u64,
    });
    info!(entries = entries.len(), "Starting batch analysis.");

    let mut results = Vec::with_capacity(entries.len());
    for entry in entries {
        let result = process_entry(entry, config);
        reporter.message(|| format!("{} {}", result.code, result.legacy_value()));
        reporter.report(Progress::TaskIncrement);
        results.push(result);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let failed = results
        .iter()
        .filter(|r| matches!(r.status, EntryStatus::LoadFailed(_)))
        .count();
    info!(
        entries = results.len(),
        failed, "Batch analysis complete."
    );
    results
}
