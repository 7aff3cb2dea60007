use crate::core::models::ids::AtomId;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry;
use nalgebra::Point3;

/// Thresholds of the geometric aromaticity model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AromaticityCriteria {
    /// Maximal out-of-plane deviation of any member atom, in Angstroms.
    pub planarity_tolerance: f64,
    /// Maximal length of any ring bond, in Angstroms.
    pub max_bond_length: f64,
}

/// Decides whether the ring given by `atoms` (in cycle order) is aromatic.
///
/// A ring whose bonds all carry an explicit aromatic order is aromatic. Otherwise
/// the ring must have five or six members, consist only of elements that can
/// take part in a pi system, be flat within `planarity_tolerance`, and have no
/// bond longer than `max_bond_length`.
pub fn is_aromatic(system: &MolecularSystem, atoms: &[AtomId], criteria: &AromaticityCriteria) -> bool {
    if atoms.len() < 3 {
        return false;
    }
    let ring_bonds = || (0..atoms.len()).map(|i| (atoms[i], atoms[(i + 1) % atoms.len()]));

    let explicitly_aromatic = ring_bonds().all(|(a, b)| {
        system
            .bond_between(a, b)
            .is_some_and(|bond| bond.order.is_aromatic())
    });
    if explicitly_aromatic {
        return true;
    }

    if !matches!(atoms.len(), 5 | 6) {
        return false;
    }

    let mut positions: Vec<Point3<f64>> = Vec::with_capacity(atoms.len());
    for &id in atoms {
        match system.atom(id) {
            Some(atom) if atom.element.is_aromatic_capable() => positions.push(atom.position),
            _ => return false,
        }
    }

    let Some((center, normal)) = geometry::center_and_normal(&positions) else {
        return false;
    };
    if geometry::max_plane_deviation(&positions, &center, &normal) > criteria.planarity_tolerance {
        return false;
    }

    let n = positions.len();
    (0..n).all(|i| (positions[(i + 1) % n] - positions[i]).norm() <= criteria.max_bond_length)
}
