use super::ids::AtomId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bond order as recorded by a structure file; perceived bonds are `Single`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    pub fn is_aromatic(self) -> bool {
        self == Self::Aromatic
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid bond order: '{0}'")]
pub struct ParseBondOrderError(pub String);

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;

    /// Accepts numeric BGF orders (`1`, `2`, `3`, `4` or `1.5` for aromatic)
    /// as well as the names and their first letters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "s" | "single" => Ok(Self::Single),
            "2" | "d" | "double" => Ok(Self::Double),
            "3" | "t" | "triple" => Ok(Self::Triple),
            "4" | "1.5" | "ar" | "aromatic" => Ok(Self::Aromatic),
            _ => Err(ParseBondOrderError(s.to_string())),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "single",
            Self::Double => "double",
            Self::Triple => "triple",
            Self::Aromatic => "aromatic",
        })
    }
}

/// An undirected bond. The system stores at most one bond per atom pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1_id: AtomId,
    pub atom2_id: AtomId,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(atom1_id: AtomId, atom2_id: AtomId, order: BondOrder) -> Self {
        Self {
            atom1_id,
            atom2_id,
            order,
        }
    }

    /// Direction-independent identity of the atom pair `(a, b)`.
    pub fn key(a: AtomId, b: AtomId) -> (AtomId, AtomId) {
        if a <= b { (a, b) } else { (b, a) }
    }

    /// The atom at the other end from `atom_id`, if the bond touches it.
    pub fn partner(&self, atom_id: AtomId) -> Option<AtomId> {
        if self.atom1_id == atom_id {
            Some(self.atom2_id)
        } else if self.atom2_id == atom_id {
            Some(self.atom1_id)
        } else {
            None
        }
    }
}
