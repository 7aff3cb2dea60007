use crate::core::models::ids::AtomId;
use crate::core::perception::rings::Ring;
use nalgebra::{Point3, Vector3};

/// What the detector needs to know about a ring.
///
/// The detector never inspects a concrete ring type, so any ring source
/// (perceived rings, rings read from elsewhere, test doubles) can be scanned.
pub trait RingView {
    /// Whether `atom` is one of the ring's members.
    fn is_member(&self, atom: AtomId) -> bool;

    fn is_aromatic(&self) -> bool;

    /// Centroid and unit plane normal (sign arbitrary), or `None` when undefined.
    fn center_and_normal(&self) -> Option<(Point3<f64>, Vector3<f64>)>;

    /// Any one member atom, used to name the residue that owns the ring.
    fn representative_atom(&self) -> Option<AtomId>;
}

impl RingView for Ring {
    fn is_member(&self, atom: AtomId) -> bool {
        self.contains(atom)
    }

    fn is_aromatic(&self) -> bool {
        Ring::is_aromatic(self)
    }

    fn center_and_normal(&self) -> Option<(Point3<f64>, Vector3<f64>)> {
        self.geometry()
    }

    fn representative_atom(&self) -> Option<AtomId> {
        self.atoms().first().copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingRole {
    LigandRing,
    ReceptorRing,
}

/// Assigns the role of a single ring.
///
/// A ring is a ligand ring as soon as any ligand atom is one of its members;
/// the scan stops at the first such atom.
pub fn assign_role<R: RingView + ?Sized>(ring: &R, ligand_atoms: &[AtomId]) -> RingRole {
    if ligand_atoms.iter().any(|&atom| ring.is_member(atom)) {
        RingRole::LigandRing
    } else {
        RingRole::ReceptorRing
    }
}

/// Ring indices split by role. Every ring index appears in exactly one list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RingPartition {
    pub ligand: Vec<usize>,
    pub receptor: Vec<usize>,
}

pub fn partition_rings<R: RingView>(rings: &[R], ligand_atoms: &[AtomId]) -> RingPartition {
    let mut partition = RingPartition::default();
    for (index, ring) in rings.iter().enumerate() {
        match assign_role(ring, ligand_atoms) {
            RingRole::LigandRing => partition.ligand.push(index),
            RingRole::ReceptorRing => partition.receptor.push(index),
        }
    }
    partition
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use slotmap::KeyData;
    use std::collections::HashSet;

    pub(crate) fn atom_id(n: u64) -> AtomId {
        AtomId::from(KeyData::from_ffi(n))
    }

    /// Ring double with fixed geometry.
    #[derive(Debug, Clone)]
    pub(crate) struct MockRing {
        pub members: Vec<AtomId>,
        pub aromatic: bool,
        pub geometry: Option<(Point3<f64>, Vector3<f64>)>,
    }

    impl MockRing {
        pub(crate) fn new(members: &[u64], center: [f64; 3], normal: [f64; 3]) -> Self {
            Self {
                members: members.iter().map(|&n| atom_id(n)).collect(),
                aromatic: true,
                geometry: Some((
                    Point3::new(center[0], center[1], center[2]),
                    Vector3::new(normal[0], normal[1], normal[2]),
                )),
            }
        }

        pub(crate) fn saturated(mut self) -> Self {
            self.aromatic = false;
            self
        }

        pub(crate) fn collinear(mut self) -> Self {
            self.geometry = None;
            self
        }
    }

    impl RingView for MockRing {
        fn is_member(&self, atom: AtomId) -> bool {
            self.members.contains(&atom)
        }
        fn is_aromatic(&self) -> bool {
            self.aromatic
        }
        fn center_and_normal(&self) -> Option<(Point3<f64>, Vector3<f64>)> {
            self.geometry
        }
        fn representative_atom(&self) -> Option<AtomId> {
            self.members.first().copied()
        }
    }

    #[test]
    fn ring_sharing_any_ligand_atom_is_a_ligand_ring() {
        let ligand = [atom_id(1), atom_id(2)];
        let fused = MockRing::new(&[2, 10, 11, 12, 13, 14], [0.0; 3], [0.0, 0.0, 1.0]);
        let remote = MockRing::new(&[20, 21, 22, 23, 24, 25], [0.0; 3], [0.0, 0.0, 1.0]);

        assert_eq!(assign_role(&fused, &ligand), RingRole::LigandRing);
        assert_eq!(assign_role(&remote, &ligand), RingRole::ReceptorRing);
    }

    #[test]
    fn partition_is_strict_and_covering() {
        let ligand = [atom_id(1)];
        let rings = vec![
            MockRing::new(&[1, 2, 3], [0.0; 3], [0.0, 0.0, 1.0]),
            MockRing::new(&[4, 5, 6], [0.0; 3], [0.0, 0.0, 1.0]).saturated(),
            MockRing::new(&[7, 8, 1], [0.0; 3], [0.0, 0.0, 1.0]).saturated(),
            MockRing::new(&[9, 10, 11], [0.0; 3], [0.0, 0.0, 1.0]),
        ];
        let partition = partition_rings(&rings, &ligand);

        assert_eq!(partition.ligand, vec![0, 2]);
        assert_eq!(partition.receptor, vec![1, 3]);
        let all: HashSet<usize> = partition
            .ligand
            .iter()
            .chain(&partition.receptor)
            .copied()
            .collect();
        assert_eq!(all.len(), rings.len());
    }

    #[test]
    fn empty_ligand_makes_every_ring_a_receptor_ring() {
        let rings = vec![MockRing::new(&[1, 2, 3], [0.0; 3], [0.0, 0.0, 1.0])];
        let partition = partition_rings(&rings, &[]);
        assert!(partition.ligand.is_empty());
        assert_eq!(partition.receptor, vec![0]);
    }
}
