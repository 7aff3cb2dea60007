use super::element::Element;
use super::ids::ResidueId;
use nalgebra::Point3;

/// Represents an atom of a parsed structure.
///
/// Atoms carry only what ring perception and the stacking analysis need:
/// identity (name, serial), chemistry (element) and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom (e.g., "CA", "C1").
    pub name: String,
    /// The serial number from the source file, `0` when the atom was built in memory.
    pub serial: usize,
    /// The chemical element.
    pub element: Element,
    /// The ID of the parent residue this atom belongs to.
    pub residue_id: ResidueId,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom` with a zero serial number.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the atom.
    /// * `element` - The chemical element of the atom.
    /// * `residue_id` - The ID of the residue this atom belongs to.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(name: &str, element: Element, residue_id: ResidueId, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            serial: 0,
            element,
            residue_id,
            position,
        }
    }

    /// Sets the serial number carried over from the source file.
    pub fn with_serial(mut self, serial: usize) -> Self {
        self.serial = serial;
        self
    }
}
