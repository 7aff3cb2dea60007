use super::bgf::{BgfError, BgfFile};
use super::pdb::{PdbError, PdbFile};
use super::traits::{FileMetadata, MolecularFile};
use crate::core::models::system::MolecularSystem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Structure file formats the readers understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureFormat {
    Pdb,
    Bgf,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown structure format: '{0}' (expected pdb, ent or bgf)")]
pub struct ParseFormatError(pub String);

impl FromStr for StructureFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdb" | "ent" => Ok(Self::Pdb),
            "bgf" => Ok(Self::Bgf),
            _ => Err(ParseFormatError(s.to_string())),
        }
    }
}

impl fmt::Display for StructureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pdb => "pdb",
            Self::Bgf => "bgf",
        })
    }
}

impl StructureFormat {
    /// Infers the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self, ParseFormatError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ParseFormatError(path.display().to_string()))?;
        extension.parse()
    }
}

/// A parsed structure together with what the reader learned about its bonds.
#[derive(Debug, Clone)]
pub struct LoadedStructure {
    pub system: MolecularSystem,
    pub format: StructureFormat,
    /// `true` when the file's own connectivity is complete and bond perception can be skipped.
    pub complete_connectivity: bool,
}

#[derive(Debug, Error)]
pub enum StructureLoadError {
    #[error("Cannot determine format of '{path}': {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: ParseFormatError,
    },
    #[error("Failed to read PDB file '{path}': {source}")]
    Pdb {
        path: PathBuf,
        #[source]
        source: PdbError,
    },
    #[error("Failed to read BGF file '{path}': {source}")]
    Bgf {
        path: PathBuf,
        #[source]
        source: BgfError,
    },
}

/// Reads a structure file, inferring the format from the extension when `format` is `None`.
///
/// PDB connectivity is never considered complete (CONECT records usually cover
/// only hetero groups); BGF connectivity is complete whenever the file carries
/// CONECT records.
pub fn read_structure(
    path: &Path,
    format: Option<StructureFormat>,
) -> Result<LoadedStructure, StructureLoadError> {
    let format = match format {
        Some(format) => format,
        None => StructureFormat::from_path(path).map_err(|source| StructureLoadError::Format {
            path: path.to_path_buf(),
            source,
        })?,
    };

    match format {
        StructureFormat::Pdb => {
            load::<PdbFile>(path).map_err(|source| StructureLoadError::Pdb {
                path: path.to_path_buf(),
                source,
            })
        }
        StructureFormat::Bgf => {
            load::<BgfFile>(path).map_err(|source| StructureLoadError::Bgf {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

fn load<F: MolecularFile>(path: &Path) -> Result<LoadedStructure, F::Error> {
    let (system, metadata) = F::read_from_path(path)?;
    Ok(LoadedStructure {
        system,
        format: F::FORMAT,
        complete_connectivity: metadata.has_complete_connectivity(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::fixtures::pdb_line;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_identifiers_case_insensitively() {
        assert_eq!("pdb".parse(), Ok(StructureFormat::Pdb));
        assert_eq!("ENT".parse(), Ok(StructureFormat::Pdb));
        assert_eq!(" Bgf ".parse(), Ok(StructureFormat::Bgf));
        assert!("mol2".parse::<StructureFormat>().is_err());
    }

    #[test]
    fn infers_format_from_extension() {
        assert_eq!(
            StructureFormat::from_path(Path::new("1abc_d1refined.pdb")),
            Ok(StructureFormat::Pdb)
        );
        assert_eq!(
            StructureFormat::from_path(Path::new("complex.BGF")),
            Ok(StructureFormat::Bgf)
        );
        assert!(StructureFormat::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn read_structure_loads_pdb_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lig.pdb");
        fs::write(&path, pdb_line("HETATM", 1, "C1", "LIG", 'A', 1, [0.0; 3], "C")).unwrap();

        let loaded = read_structure(&path, None).unwrap();
        assert_eq!(loaded.format, StructureFormat::Pdb);
        assert!(!loaded.complete_connectivity);
        assert_eq!(loaded.system.atom_count(), 1);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let dir = tempdir().unwrap();
        let err = read_structure(&dir.path().join("absent.pdb"), None).unwrap_err();
        assert!(matches!(
            err,
            StructureLoadError::Pdb {
                source: PdbError::Io(_),
                ..
            }
        ));
    }

    #[test]
    fn unknown_extension_is_a_format_error() {
        let err = read_structure(Path::new("structure.xyz"), None).unwrap_err();
        assert!(matches!(err, StructureLoadError::Format { .. }));
    }

    #[test]
    fn explicit_format_overrides_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("structure.txt");
        fs::write(&path, pdb_line("ATOM", 1, "N", "GLY", 'A', 1, [0.0; 3], "N")).unwrap();
        assert!(read_structure(&path, Some(StructureFormat::Pdb)).is_ok());
    }
}
