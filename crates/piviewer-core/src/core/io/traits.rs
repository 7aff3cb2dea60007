use super::format::StructureFormat;
use crate::core::models::system::MolecularSystem;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// What a reader learned about a file beyond its atoms.
pub trait FileMetadata {
    /// Whether the file's own bond records cover the whole structure, so that
    /// distance-based bond perception is unnecessary.
    fn has_complete_connectivity(&self) -> bool;
}

/// A structure file format that can be parsed into a [`MolecularSystem`].
pub trait MolecularFile {
    const FORMAT: StructureFormat;

    type Metadata: FileMetadata;

    type Error: Error + From<io::Error>;

    /// Parses a whole structure from `reader`.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed records or unreadable input.
    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error>;

    fn read_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        let file = File::open(path)?;
        Self::read_from(&mut BufReader::new(file))
    }
}
