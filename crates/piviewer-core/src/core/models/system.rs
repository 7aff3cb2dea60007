use super::atom::Atom;
use super::chain::Chain;
use super::ids::{AtomId, ChainId, ResidueId};
use super::residue::{Residue, ResidueLabel};
use super::topology::{Bond, BondOrder};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::HashMap;

/// Residues are told apart by name as well, so a ligand sharing a chain and
/// number with a receptor residue stays a residue of its own.
type ResidueKey = (ChainId, isize, Option<char>, String);

/// Represents a complete molecular system with atoms, residues, chains, and bonds.
///
/// This struct is the parsed form of a structure file. Atoms, residues and
/// chains are stored in slot maps and are never removed, so iteration order is
/// insertion order, i.e. the order of the source file.
#[derive(Debug, Clone, Default)]
pub struct MolecularSystem {
    /// Primary storage for atoms.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues.
    residues: SlotMap<ResidueId, Residue>,
    /// Primary storage for chains.
    chains: SlotMap<ChainId, Chain>,
    /// List of all bonds in the system.
    bonds: Vec<Bond>,
    /// Lookup from an ordered atom pair to its index in `bonds`.
    bond_index: HashMap<(AtomId, AtomId), usize>,
    /// Lookup map for finding residues by chain, sequence number, insertion code and name.
    residue_id_map: HashMap<ResidueKey, ResidueId>,
    /// Lookup map for finding chains by their single-character identifier.
    chain_id_map: HashMap<char, ChainId>,
    /// Cached adjacency list for bond connectivity, indexed by atom ID.
    bond_adjacency: SecondaryMap<AtomId, Vec<AtomId>>,
}

impl MolecularSystem {
    /// Creates a new, empty molecular system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves an immutable reference to an atom by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The atom ID to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Atom)` if the atom exists, otherwise `None`.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Returns an iterator over all atoms in file order.
    ///
    /// # Return
    ///
    /// An iterator yielding `(AtomId, &Atom)` pairs.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Retrieves an immutable reference to a residue by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The residue ID to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Residue)` if the residue exists, otherwise `None`.
    pub fn residue(&self, id: ResidueId) -> Option<&Residue> {
        self.residues.get(id)
    }

    /// Returns an iterator over all residues in file order.
    ///
    /// # Return
    ///
    /// An iterator yielding `(ResidueId, &Residue)` pairs.
    pub fn residues_iter(&self) -> impl Iterator<Item = (ResidueId, &Residue)> {
        self.residues.iter()
    }

    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    /// Retrieves an immutable reference to a chain by its ID.
    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.chains.get(id)
    }

    /// Returns an iterator over all chains in file order.
    pub fn chains_iter(&self) -> impl Iterator<Item = (ChainId, &Chain)> {
        self.chains.iter()
    }

    /// Returns a slice of all bonds in the system.
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Finds the bond joining two atoms, regardless of the order they are given in.
    ///
    /// # Arguments
    ///
    /// * `a` - ID of one atom.
    /// * `b` - ID of the other atom.
    ///
    /// # Return
    ///
    /// Returns `Some(&Bond)` if the atoms are bonded, otherwise `None`.
    pub fn bond_between(&self, a: AtomId, b: AtomId) -> Option<&Bond> {
        self.bond_index
            .get(&Bond::key(a, b))
            .map(|&index| &self.bonds[index])
    }

    /// Finds a chain ID by its single-character identifier.
    pub fn find_chain_by_id(&self, id: char) -> Option<ChainId> {
        self.chain_id_map.get(&id).copied()
    }

    /// Finds a residue ID by its chain, sequence number and insertion code.
    ///
    /// When several residues share these, the first one in file order is returned.
    ///
    /// # Arguments
    ///
    /// * `chain_id` - The ID of the chain containing the residue.
    /// * `residue_number` - The sequence number of the residue.
    /// * `insertion_code` - The insertion code, `None` for most residues.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if the residue exists, otherwise `None`.
    pub fn find_residue_by_id(
        &self,
        chain_id: ChainId,
        residue_number: isize,
        insertion_code: Option<char>,
    ) -> Option<ResidueId> {
        let residues = &self.residues;
        self.chains
            .get(chain_id)?
            .residues
            .iter()
            .copied()
            .find(|&id| {
                residues.get(id).is_some_and(|residue| {
                    residue.residue_number == residue_number
                        && residue.insertion_code == insertion_code
                })
            })
    }

    /// Finds the first residue, in file order, whose name equals `name` exactly.
    ///
    /// The comparison is case-sensitive and does not support wildcards.
    ///
    /// # Arguments
    ///
    /// * `name` - The residue name to search for (e.g., "THA").
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` of the first match, otherwise `None`.
    pub fn find_first_residue_by_name(&self, name: &str) -> Option<ResidueId> {
        self.residues
            .iter()
            .find(|(_, residue)| residue.name == name)
            .map(|(id, _)| id)
    }

    /// Builds a detached, printable label for a residue.
    pub fn residue_label(&self, residue_id: ResidueId) -> Option<ResidueLabel> {
        let residue = self.residues.get(residue_id)?;
        let chain = self.chains.get(residue.chain_id)?;
        Some(ResidueLabel {
            chain: chain.id,
            residue_number: residue.residue_number,
            insertion_code: residue.insertion_code,
            name: residue.name.clone(),
        })
    }

    /// Adds a new chain to the system or returns the existing one.
    ///
    /// This method is idempotent; if a chain with the given ID already exists,
    /// it returns the existing chain ID without creating a duplicate.
    pub fn add_chain(&mut self, id: char) -> ChainId {
        *self
            .chain_id_map
            .entry(id)
            .or_insert_with(|| self.chains.insert(Chain::new(id)))
    }

    /// Adds a new residue to the system or returns the existing one.
    ///
    /// This method is idempotent; if a residue with the given chain ID, sequence
    /// number, insertion code and name already exists, it returns the existing
    /// residue ID. A different name under the same number starts a new residue.
    ///
    /// # Arguments
    ///
    /// * `chain_id` - The ID of the chain to add the residue to.
    /// * `residue_number` - The sequence number of the residue.
    /// * `insertion_code` - The insertion code of the residue, if any.
    /// * `name` - The name of the residue.
    ///
    /// # Return
    ///
    /// Returns `Some(ResidueId)` if successful, otherwise `None` (e.g., if the chain doesn't exist).
    pub fn add_residue(
        &mut self,
        chain_id: ChainId,
        residue_number: isize,
        insertion_code: Option<char>,
        name: &str,
    ) -> Option<ResidueId> {
        let chain = self.chains.get_mut(chain_id)?;
        let key = (chain_id, residue_number, insertion_code, name.to_string());

        let residue_id = *self.residue_id_map.entry(key).or_insert_with(|| {
            let residue = Residue::new(residue_number, insertion_code, name, chain_id);
            self.residues.insert(residue)
        });

        if !chain.residues.contains(&residue_id) {
            chain.residues.push(residue_id);
        }

        Some(residue_id)
    }

    /// Adds an atom to a specific residue.
    ///
    /// The atom's `residue_id` is overwritten with `residue_id` so the two can
    /// never disagree.
    ///
    /// # Arguments
    ///
    /// * `residue_id` - The ID of the residue to add the atom to.
    /// * `atom` - The atom to add.
    ///
    /// # Return
    ///
    /// Returns `Some(AtomId)` if successful, otherwise `None` (e.g., if the residue doesn't exist).
    pub fn add_atom_to_residue(&mut self, residue_id: ResidueId, mut atom: Atom) -> Option<AtomId> {
        if !self.residues.contains_key(residue_id) {
            return None;
        }

        atom.residue_id = residue_id;
        let name = atom.name.clone();
        let atom_id = self.atoms.insert(atom);
        self.bond_adjacency.insert(atom_id, Vec::new());
        self.residues[residue_id].add_atom(&name, atom_id);

        Some(atom_id)
    }

    /// Adds a bond between two atoms.
    ///
    /// Adding a bond that already exists succeeds without creating a duplicate;
    /// an explicit non-single order upgrades the stored order. Self-bonds are rejected.
    ///
    /// # Arguments
    ///
    /// * `atom1_id` - ID of the first atom.
    /// * `atom2_id` - ID of the second atom.
    /// * `order` - The order of the bond.
    ///
    /// # Return
    ///
    /// Returns `Some(())` if successful, otherwise `None` (e.g., if atoms don't exist).
    pub fn add_bond(&mut self, atom1_id: AtomId, atom2_id: AtomId, order: BondOrder) -> Option<()> {
        if atom1_id == atom2_id
            || !self.atoms.contains_key(atom1_id)
            || !self.atoms.contains_key(atom2_id)
        {
            return None;
        }

        let key = Bond::key(atom1_id, atom2_id);
        if let Some(&index) = self.bond_index.get(&key) {
            if order != BondOrder::Single {
                self.bonds[index].order = order;
            }
            return Some(());
        }

        self.bond_index.insert(key, self.bonds.len());
        self.bonds.push(Bond::new(atom1_id, atom2_id, order));
        self.bond_adjacency[atom1_id].push(atom2_id);
        self.bond_adjacency[atom2_id].push(atom1_id);
        Some(())
    }

    /// Retrieves the bonded neighbors of an atom.
    ///
    /// # Arguments
    ///
    /// * `atom_id` - The ID of the atom to query.
    ///
    /// # Return
    ///
    /// Returns `Some(&[AtomId])` if the atom exists, otherwise `None`.
    pub fn get_bonded_neighbors(&self, atom_id: AtomId) -> Option<&[AtomId]> {
        self.bond_adjacency.get(atom_id).map(|v| v.as_slice())
    }
}
