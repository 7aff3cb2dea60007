use super::config::ConfigError;
use crate::core::io::format::StructureLoadError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("No ligand residue named '{name}' found in the structure")]
    LigandNotFound { name: String },

    #[error(transparent)]
    StructureLoad(#[from] StructureLoadError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read dataset list '{path}': {source}")]
    ListIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed dataset list entry on line {line}: {reason}")]
    BatchList { line: usize, reason: String },
}

impl EngineError {
    /// Whether the error only means that the requested ligand is absent.
    pub fn is_ligand_not_found(&self) -> bool {
        matches!(self, Self::LigandNotFound { .. })
    }
}
