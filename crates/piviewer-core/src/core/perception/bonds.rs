use crate::core::models::ids::AtomId;
use crate::core::models::system::MolecularSystem;
use crate::core::models::topology::BondOrder;
use kiddo::{KdTree, SquaredEuclidean};

/// Pairs closer than this are treated as overlapping duplicates, never as bonded.
pub const MIN_BOND_DISTANCE: f64 = 0.4;

struct Candidate {
    id: AtomId,
    radius: f64,
    is_hydrogen: bool,
}

/// Adds single bonds between atoms whose distance falls within the sum of their
/// covalent radii plus `tolerance`.
///
/// Atoms of unknown element are ignored, and two hydrogens are never bonded.
/// Existing bonds are left untouched.
///
/// # Arguments
///
/// * `system` - The system to augment with perceived bonds.
/// * `tolerance` - Slack in Angstroms added to the sum of covalent radii.
///
/// # Return
///
/// The number of bonds that were newly added.
pub fn perceive_bonds(system: &mut MolecularSystem, tolerance: f64) -> usize {
    let mut candidates = Vec::with_capacity(system.atom_count());
    let mut points: Vec<[f64; 3]> = Vec::with_capacity(system.atom_count());
    for (id, atom) in system.atoms_iter() {
        if let Some(radius) = atom.element.covalent_radius() {
            candidates.push(Candidate {
                id,
                radius,
                is_hydrogen: atom.element.is_hydrogen(),
            });
            points.push([atom.position.x, atom.position.y, atom.position.z]);
        }
    }
    if candidates.len() < 2 {
        return 0;
    }

    let max_radius = candidates.iter().map(|c| c.radius).fold(0.0, f64::max);
    let kdtree: KdTree<f64, 3> = (&points).into();

    let mut new_bonds = Vec::new();
    for (i, (candidate, point)) in candidates.iter().zip(&points).enumerate() {
        let search = candidate.radius + max_radius + tolerance;
        for neighbour in kdtree.within_unsorted::<SquaredEuclidean>(point, search * search) {
            let j = neighbour.item as usize;
            if j <= i {
                continue;
            }
            let other = &candidates[j];
            if candidate.is_hydrogen && other.is_hydrogen {
                continue;
            }
            let distance = neighbour.distance.sqrt();
            if distance > MIN_BOND_DISTANCE && distance <= candidate.radius + other.radius + tolerance
            {
                new_bonds.push((candidate.id, other.id));
            }
        }
    }

    let before = system.bonds().len();
    for (a, b) in new_bonds {
        system.add_bond(a, b, BondOrder::Single);
    }
    system.bonds().len() - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::fixtures::benzene;
    use crate::core::models::atom::Atom;
    use crate::core::models::element::Element;
    use nalgebra::{Point3, Vector3};

    fn system_with(atoms: &[(Element, Point3<f64>)]) -> (MolecularSystem, Vec<AtomId>) {
        let mut system = MolecularSystem::new();
        let chain = system.add_chain('A');
        let residue = system.add_residue(chain, 1, None, "LIG").unwrap();
        let ids = atoms
            .iter()
            .enumerate()
            .map(|(i, &(element, pos))| {
                system
                    .add_atom_to_residue(residue, Atom::new(&format!("X{i}"), element, residue, pos))
                    .unwrap()
            })
            .collect();
        (system, ids)
    }

    #[test]
    fn bonds_benzene_ring_without_cross_ring_contacts() {
        let atoms: Vec<_> = benzene(Point3::origin(), Vector3::x(), Vector3::y())
            .into_iter()
            .map(|p| (Element::C, p))
            .collect();
        let (mut system, ids) = system_with(&atoms);

        assert_eq!(perceive_bonds(&mut system, 0.45), 6);
        for &id in &ids {
            assert_eq!(system.get_bonded_neighbors(id).unwrap().len(), 2);
        }
    }

    #[test]
    fn respects_distance_window() {
        let (mut system, ids) = system_with(&[
            (Element::C, Point3::new(0.0, 0.0, 0.0)),
            (Element::C, Point3::new(0.3, 0.0, 0.0)),
            (Element::C, Point3::new(2.5, 0.0, 0.0)),
        ]);
        assert_eq!(perceive_bonds(&mut system, 0.45), 0);
        assert!(system.bond_between(ids[0], ids[1]).is_none());
    }

    #[test]
    fn hydrogens_bond_only_to_heavy_atoms() {
        let (mut system, ids) = system_with(&[
            (Element::C, Point3::new(0.0, 0.0, 0.0)),
            (Element::H, Point3::new(1.09, 0.0, 0.0)),
            (Element::H, Point3::new(1.09, 0.74, 0.0)),
        ]);
        perceive_bonds(&mut system, 0.45);
        assert!(system.bond_between(ids[0], ids[1]).is_some());
        assert!(system.bond_between(ids[1], ids[2]).is_none());
    }

    #[test]
    fn keeps_existing_bonds_and_ignores_unknown_elements() {
        let (mut system, ids) = system_with(&[
            (Element::C, Point3::new(0.0, 0.0, 0.0)),
            (Element::C, Point3::new(1.40, 0.0, 0.0)),
            (Element::Unknown, Point3::new(0.0, 1.0, 0.0)),
        ]);
        system.add_bond(ids[0], ids[1], BondOrder::Aromatic).unwrap();

        assert_eq!(perceive_bonds(&mut system, 0.45), 0);
        assert_eq!(system.bonds().len(), 1);
        assert_eq!(
            system.bond_between(ids[0], ids[1]).unwrap().order,
            BondOrder::Aromatic
        );
    }
}
