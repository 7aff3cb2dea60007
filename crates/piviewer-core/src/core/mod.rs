//! # Core Module
//!
//! The stateless foundation of PiViewer: everything needed to turn a structure
//! file into atoms, bonds and rings, with no knowledge of what the rings will
//! be used for.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues, chains, bonds and the system that owns them
//! - **File I/O** ([`io`]) - PDB and BGF readers, format identification, CSV report writers
//! - **Perception** ([`perception`]) - Distance-based bonds, SSSR rings and aromaticity
//! - **Utilities** ([`utils`]) - Centroids, plane fitting and angle helpers

pub mod io;
pub mod models;
pub mod perception;
pub mod utils;
