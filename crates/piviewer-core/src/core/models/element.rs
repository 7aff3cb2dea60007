use phf::phf_map;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Chemical elements recognized by the structure readers.
///
/// Only the elements that routinely occur in protein-ligand complexes are
/// enumerated; anything else parses as [`Element::Unknown`] and never takes
/// part in bond perception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Element {
    H,
    B,
    C,
    N,
    O,
    F,
    Na,
    Mg,
    Si,
    P,
    S,
    Cl,
    K,
    Ca,
    Mn,
    Fe,
    Co,
    Ni,
    Cu,
    Zn,
    Se,
    Br,
    I,
    #[default]
    Unknown,
}

static SYMBOLS: phf::Map<&'static str, Element> = phf_map! {
    "H" => Element::H,
    "D" => Element::H,
    "B" => Element::B,
    "C" => Element::C,
    "N" => Element::N,
    "O" => Element::O,
    "F" => Element::F,
    "NA" => Element::Na,
    "MG" => Element::Mg,
    "SI" => Element::Si,
    "P" => Element::P,
    "S" => Element::S,
    "CL" => Element::Cl,
    "K" => Element::K,
    "CA" => Element::Ca,
    "MN" => Element::Mn,
    "FE" => Element::Fe,
    "CO" => Element::Co,
    "NI" => Element::Ni,
    "CU" => Element::Cu,
    "ZN" => Element::Zn,
    "SE" => Element::Se,
    "BR" => Element::Br,
    "I" => Element::I,
};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unrecognized element symbol: '{0}'")]
pub struct ParseElementError(pub String);

impl Element {
    /// Looks up an element by symbol, ignoring case and surrounding whitespace.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        SYMBOLS
            .get(symbol.trim().to_ascii_uppercase().as_str())
            .copied()
    }

    /// Single-bond covalent radius in Angstroms (Cordero et al., 2008).
    ///
    /// Returns `None` for [`Element::Unknown`].
    pub fn covalent_radius(self) -> Option<f64> {
        let radius = match self {
            Element::H => 0.31,
            Element::B => 0.84,
            Element::C => 0.76,
            Element::N => 0.71,
            Element::O => 0.66,
            Element::F => 0.57,
            Element::Na => 1.66,
            Element::Mg => 1.41,
            Element::Si => 1.11,
            Element::P => 1.07,
            Element::S => 1.05,
            Element::Cl => 1.02,
            Element::K => 2.03,
            Element::Ca => 1.76,
            Element::Mn => 1.39,
            Element::Fe => 1.32,
            Element::Co => 1.26,
            Element::Ni => 1.24,
            Element::Cu => 1.32,
            Element::Zn => 1.22,
            Element::Se => 1.20,
            Element::Br => 1.20,
            Element::I => 1.39,
            Element::Unknown => return None,
        };
        Some(radius)
    }

    pub fn is_hydrogen(self) -> bool {
        self == Element::H
    }

    /// Whether the element can contribute to an aromatic pi system.
    pub fn is_aromatic_capable(self) -> bool {
        matches!(
            self,
            Element::C | Element::N | Element::O | Element::S | Element::P | Element::Se
        )
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Element::H => "H",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Na => "Na",
            Element::Mg => "Mg",
            Element::Si => "Si",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::K => "K",
            Element::Ca => "Ca",
            Element::Mn => "Mn",
            Element::Fe => "Fe",
            Element::Co => "Co",
            Element::Ni => "Ni",
            Element::Cu => "Cu",
            Element::Zn => "Zn",
            Element::Se => "Se",
            Element::Br => "Br",
            Element::I => "I",
            Element::Unknown => "X",
        }
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s).ok_or_else(|| ParseElementError(s.to_string()))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_symbol_is_case_insensitive_and_trims() {
        assert_eq!(Element::from_symbol("C"), Some(Element::C));
        assert_eq!(Element::from_symbol(" cl "), Some(Element::Cl));
        assert_eq!(Element::from_symbol("Zn"), Some(Element::Zn));
        assert_eq!(Element::from_symbol("D"), Some(Element::H));
    }

    #[test]
    fn from_str_rejects_unknown_symbols() {
        assert_eq!(
            "Xx".parse::<Element>(),
            Err(ParseElementError("Xx".to_string()))
        );
        assert!("".parse::<Element>().is_err());
    }

    #[test]
    fn unknown_element_has_no_covalent_radius() {
        assert_eq!(Element::Unknown.covalent_radius(), None);
        assert_eq!(Element::C.covalent_radius(), Some(0.76));
    }

    #[test]
    fn aromatic_capability_covers_common_heteroatoms() {
        for element in [Element::C, Element::N, Element::O, Element::S] {
            assert!(element.is_aromatic_capable(), "{element} should be capable");
        }
        assert!(!Element::H.is_aromatic_capable());
        assert!(!Element::Zn.is_aromatic_capable());
        assert!(!Element::Unknown.is_aromatic_capable());
    }

    #[test]
    fn display_round_trips_through_symbol_lookup() {
        for element in [Element::Cl, Element::Se, Element::N, Element::Fe] {
            assert_eq!(Element::from_symbol(&element.to_string()), Some(element));
        }
    }
}
