//! # Workflows Module
//!
//! High-level entry points that tie structure loading, perception and the
//! detector together.
//!
//! ## Architecture
//!
//! - **Detection Workflow** ([`detect`]) - Load one structure, perceive its rings and
//!   report π–π stacking for one ligand, plus the integer-returning [`detect::find_pi_pi`].
//! - **Batch Workflow** ([`batch`]) - Run detection over a dataset list of structure
//!   codes and candidate ligand names.

pub mod batch;
pub mod detect;
