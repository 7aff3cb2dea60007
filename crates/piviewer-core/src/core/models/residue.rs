use super::ids::{AtomId, ChainId};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub residue_number: isize,         // Residue sequence number from source file
    pub insertion_code: Option<char>,  // PDB insertion code, if any
    pub name: String,                  // Name of the residue (e.g., "PHE", "THA")
    pub chain_id: ChainId,             // ID of the parent chain
    pub(crate) atoms: Vec<AtomId>,     // Atoms belonging to this residue, in file order
    atom_name_map: HashMap<String, AtomId>, // First atom registered under each name
}

impl Residue {
    pub(crate) fn new(
        residue_number: isize,
        insertion_code: Option<char>,
        name: &str,
        chain_id: ChainId,
    ) -> Self {
        Self {
            residue_number,
            insertion_code,
            name: name.to_string(),
            chain_id,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) {
        self.atoms.push(atom_id);
        self.atom_name_map
            .entry(atom_name.to_string())
            .or_insert(atom_id);
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }
}

/// Human-readable identity of a residue, detached from the system it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResidueLabel {
    pub chain: char,
    pub residue_number: isize,
    pub insertion_code: Option<char>,
    pub name: String,
}

impl fmt::Display for ResidueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.residue_number)?;
        if let Some(code) = self.insertion_code {
            write!(f, "{}", code)?;
        }
        if self.chain.is_whitespace() {
            Ok(())
        } else {
            write!(f, ":{}", self.chain)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn dummy_atom_id(n: u64) -> AtomId {
        AtomId::from(KeyData::from_ffi(n))
    }

    fn dummy_chain_id(n: u64) -> ChainId {
        ChainId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn new_residue_initializes_fields_correctly() {
        let chain_id = dummy_chain_id(1);
        let residue = Residue::new(10, Some('A'), "PHE", chain_id);
        assert_eq!(residue.residue_number, 10);
        assert_eq!(residue.insertion_code, Some('A'));
        assert_eq!(residue.name, "PHE");
        assert_eq!(residue.chain_id, chain_id);
        assert!(residue.atoms().is_empty());
        assert!(residue.get_atom_id_by_name("CG").is_none());
    }

    #[test]
    fn add_atom_preserves_order_and_maps_name() {
        let mut residue = Residue::new(5, None, "TYR", dummy_chain_id(2));
        let cg = dummy_atom_id(1);
        let cd1 = dummy_atom_id(2);
        residue.add_atom("CG", cg);
        residue.add_atom("CD1", cd1);
        assert_eq!(residue.atoms(), &[cg, cd1]);
        assert_eq!(residue.get_atom_id_by_name("CG"), Some(cg));
        assert_eq!(residue.get_atom_id_by_name("CD1"), Some(cd1));
    }

    #[test]
    fn duplicate_atom_names_keep_first_mapping() {
        let mut residue = Residue::new(1, None, "UNL", dummy_chain_id(3));
        let first = dummy_atom_id(10);
        let second = dummy_atom_id(11);
        residue.add_atom("C", first);
        residue.add_atom("C", second);
        assert_eq!(residue.atoms().len(), 2);
        assert_eq!(residue.get_atom_id_by_name("C"), Some(first));
    }

    #[test]
    fn residue_label_display_includes_insertion_code() {
        let plain = ResidueLabel {
            chain: 'A',
            residue_number: 84,
            insertion_code: None,
            name: "TRP".to_string(),
        };
        assert_eq!(plain.to_string(), "TRP84:A");

        let inserted = ResidueLabel {
            insertion_code: Some('B'),
            ..plain
        };
        assert_eq!(inserted.to_string(), "TRP84B:A");

        let unchained = ResidueLabel {
            chain: ' ',
            residue_number: 1,
            insertion_code: None,
            name: "UNL".to_string(),
        };
        assert_eq!(unchained.to_string(), "UNL1");
    }
}
