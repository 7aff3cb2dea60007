//! # PiViewer Core Library
//!
//! Detection of π–π stacking between the aromatic rings of a small-molecule
//! ligand and the aromatic rings of the receptor around it.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`MolecularSystem`),
//!   structure readers, and the perception of bonds, rings and aromaticity.
//!
//! - **[`engine`]: The Logic Core.** The ring interaction detector: ring role
//!   partitioning, the distance/dihedral decision rule, configuration, errors
//!   and progress reporting. The detector only sees rings through the
//!   [`engine::rings::RingView`] capability trait.
//!
//! - **[`workflows`]: The Public API.** Complete procedures that tie `core` and
//!   `engine` together: detection on a single structure file (including the
//!   integer-returning `find_pi_pi` entry point) and the dataset-list batch driver.

pub mod core;
pub mod engine;
pub mod workflows;
