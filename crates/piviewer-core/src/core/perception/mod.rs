//! # Perception Module
//!
//! Derives the chemistry that structure files do not state explicitly: bonds
//! from interatomic distances, the smallest set of smallest rings, and which
//! of those rings are aromatic.

pub mod aromaticity;
pub mod bonds;
pub mod rings;

use self::aromaticity::AromaticityCriteria;
use self::rings::Ring;
use crate::core::models::system::MolecularSystem;

/// Parameters of bond, ring and aromaticity perception.
#[derive(Debug, Clone, PartialEq)]
pub struct PerceptionConfig {
    /// Slack in Angstroms added to the sum of covalent radii when perceiving bonds.
    pub bond_tolerance: f64,
    /// Largest ring, in atoms, that ring perception will report.
    pub max_ring_size: usize,
    /// Maximal out-of-plane deviation of an aromatic ring member, in Angstroms.
    pub planarity_tolerance: f64,
    /// Maximal ring bond length of an aromatic ring, in Angstroms.
    pub max_aromatic_bond_length: f64,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            bond_tolerance: 0.45,
            max_ring_size: 24,
            planarity_tolerance: 0.15,
            max_aromatic_bond_length: 1.48,
        }
    }
}

/// Outcome of [`perceive`].
#[derive(Debug, Clone)]
pub struct Perception {
    pub rings: Vec<Ring>,
    /// Bonds added by distance-based perception.
    pub perceived_bonds: usize,
}

/// Perceives bonds (unless `complete_connectivity`), the SSSR and ring aromaticity.
///
/// # Arguments
///
/// * `system` - The structure; perceived bonds are added to it.
/// * `complete_connectivity` - Whether the bonds already present describe the whole structure.
/// * `config` - Perception parameters.
pub fn perceive(
    system: &mut MolecularSystem,
    complete_connectivity: bool,
    config: &PerceptionConfig,
) -> Perception {
    let perceived_bonds = if complete_connectivity {
        0
    } else {
        bonds::perceive_bonds(system, config.bond_tolerance)
    };

    let criteria = AromaticityCriteria {
        planarity_tolerance: config.planarity_tolerance,
        max_bond_length: config.max_aromatic_bond_length,
    };
    let rings = rings::find_sssr(system, config.max_ring_size)
        .into_iter()
        .map(|atoms| {
            let aromatic = aromaticity::is_aromatic(system, &atoms, &criteria);
            Ring::new(system, atoms, aromatic)
        })
        .collect();

    Perception {
        rings,
        perceived_bonds,
    }
}
