//! Provides input/output functionality for molecular file formats.
//!
//! This module contains the fixed-column readers for the PDB and BGF structure
//! formats behind a common trait, format identification, and the CSV writers
//! used for detection and batch reports.

pub mod bgf;
pub mod format;
pub mod pdb;
pub mod report;
pub mod traits;

#[cfg(test)]
pub(crate) mod fixtures;
