use super::ids::ResidueId;

/// A chain and its residues in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: char,
    pub(crate) residues: Vec<ResidueId>,
}

impl Chain {
    pub(crate) fn new(id: char) -> Self {
        Self {
            id,
            residues: Vec::new(),
        }
    }

    pub fn residues(&self) -> &[ResidueId] {
        &self.residues
    }

    /// Whether the file left the chain identifier blank.
    pub fn is_unnamed(&self) -> bool {
        self.id.is_whitespace()
    }
}
