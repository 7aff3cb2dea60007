//! # Core Models Module
//!
//! This module contains the data structures used to represent a parsed
//! macromolecular structure in PiViewer: atoms, residues, chains, bonds and the
//! container that owns them.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom with element, serial number and coordinates
//! - [`element`] - Chemical elements and their covalent radii
//! - [`residue`] - Named group of atoms, the unit a ligand is selected by
//! - [`chain`] - Ordered collection of residues
//! - [`topology`] - Bonds and bond orders
//! - [`system`] - The complete molecular system with lookup helpers
//! - [`ids`] - Stable identifier types for atoms, residues, and chains
//!
//! ## Usage
//!
//! ```ignore
//! use piviewer::core::models::{atom::Atom, element::Element, system::MolecularSystem};
//!
//! let mut system = MolecularSystem::new();
//! let chain_id = system.add_chain('A');
//! let residue_id = system.add_residue(chain_id, 1, None, "LIG").unwrap();
//!
//! let atom = Atom::new("C1", Element::C, residue_id, Point3::new(0.0, 0.0, 0.0));
//! system.add_atom_to_residue(residue_id, atom);
//! ```

pub mod atom;
pub mod chain;
pub mod element;
pub mod ids;
pub mod residue;
pub mod system;
pub mod topology;
