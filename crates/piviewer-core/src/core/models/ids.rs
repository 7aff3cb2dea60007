use slotmap::new_key_type;

new_key_type! {
    /// Stable handle of an atom inside a `MolecularSystem`.
    pub struct AtomId;
    /// Stable handle of a residue inside a `MolecularSystem`.
    pub struct ResidueId;
    /// Stable handle of a chain inside a `MolecularSystem`.
    pub struct ChainId;
}
