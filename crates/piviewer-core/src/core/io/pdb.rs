use crate::core::io::format::StructureFormat;
use crate::core::io::traits::{FileMetadata, MolecularFile};
use crate::core::models::atom::Atom;
use crate::core::models::element::Element;
use crate::core::models::ids::{AtomId, ResidueId};
use crate::core::models::system::MolecularSystem;
use crate::core::models::topology::BondOrder;
use nalgebra::Point3;
use std::collections::HashMap;
use std::io::{self, BufRead};
use thiserror::Error;

/// Last column an ATOM/HETATM record must reach: the end of the z coordinate.
const MIN_ATOM_RECORD_LEN: usize = 54;

/// Column ranges (0-based, exclusive end) of the serials on a CONECT record.
const CONECT_FIELDS: [(usize, usize); 5] = [(6, 11), (11, 16), (16, 21), (21, 26), (26, 31)];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    /// Concatenated TITLE records.
    pub title: String,
    /// Number of MODEL records seen; only the first model is read.
    pub model_count: usize,
    /// ATOM/HETATM records dropped because of a non-selected alternate location.
    pub skipped_alt_locations: usize,
    /// Whether the file carried any CONECT records.
    pub has_connectivity: bool,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn column_char(line: &str, index: usize) -> Option<char> {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .filter(|c| !c.is_whitespace())
}

fn columns_label(start: usize, end: usize) -> String {
    format!("{}-{}", start + 1, end)
}

fn parse_int<T: std::str::FromStr>(
    line: &str,
    start: usize,
    end: usize,
    line_num: usize,
) -> Result<T, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: columns_label(start, end),
            value: value.into(),
        },
    })
}

fn parse_float(line: &str, start: usize, end: usize, line_num: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: columns_label(start, end),
            value: value.into(),
        },
    })
}

/// Infers the element from the raw 4-column atom name field.
///
/// Names of two-letter elements start in column 13 (e.g. `"CL1 "`, `"FE  "`);
/// single-letter elements are right-shifted by one column (e.g. `" CA "`).
/// Two-letter symbols are only considered for HETATM records, since standard
/// residues contain no such atoms and their 4-character hydrogen names (e.g.
/// `"HD21"`) would otherwise be misread.
fn infer_element(raw_name: &str, is_hetatm: bool) -> Element {
    if is_hetatm {
        let two: String = raw_name.chars().take(2).collect();
        if two.len() == 2 && two.chars().all(|c| c.is_ascii_alphabetic()) {
            if let Some(element) = Element::from_symbol(&two) {
                return element;
            }
        }
    }
    raw_name
        .chars()
        .find(|c| c.is_ascii_alphabetic())
        .and_then(|c| Element::from_symbol(&c.to_string()))
        .unwrap_or_default()
}

pub struct PdbFile;

/// CONECT records in PDB files usually cover only hetero groups.
impl FileMetadata for PdbMetadata {
    fn has_complete_connectivity(&self) -> bool {
        false
    }
}

impl MolecularFile for PdbFile {
    const FORMAT: StructureFormat = StructureFormat::Pdb;

    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        let mut system = MolecularSystem::new();
        let mut metadata = PdbMetadata::default();
        let mut serial_map: HashMap<usize, AtomId> = HashMap::new();
        let mut conect_records: Vec<Vec<usize>> = Vec::new();
        let mut selected_alt_locs: HashMap<ResidueId, char> = HashMap::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let record_type = slice_and_trim(&line, 0, 6);
            match record_type {
                "TITLE" => {
                    let fragment = line.get(10..).unwrap_or("").trim();
                    if !fragment.is_empty() {
                        if !metadata.title.is_empty() {
                            metadata.title.push(' ');
                        }
                        metadata.title.push_str(fragment);
                    }
                }
                "MODEL" => metadata.model_count += 1,
                "ATOM" | "HETATM" => {
                    if metadata.model_count > 1 {
                        continue;
                    }
                    if line.len() < MIN_ATOM_RECORD_LEN {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let raw_name = line.get(12..16).unwrap_or("");
                    let name = raw_name.trim();
                    if name.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }
                    let res_name = slice_and_trim(&line, 17, 20);
                    if res_name.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "18-20".into(),
                            },
                        });
                    }

                    let serial: usize = parse_int(&line, 6, 11, line_num)?;
                    let chain_id = line.get(21..22).and_then(|s| s.chars().next()).unwrap_or(' ');
                    let res_seq: isize = parse_int(&line, 22, 26, line_num)?;
                    let insertion_code = column_char(&line, 26);
                    let x = parse_float(&line, 30, 38, line_num)?;
                    let y = parse_float(&line, 38, 46, line_num)?;
                    let z = parse_float(&line, 46, 54, line_num)?;

                    let element = Element::from_symbol(slice_and_trim(&line, 76, 78))
                        .unwrap_or_else(|| infer_element(raw_name, record_type == "HETATM"));

                    let chain = system.add_chain(chain_id);
                    let residue = system
                        .add_residue(chain, res_seq, insertion_code, res_name)
                        .ok_or_else(|| {
                            PdbError::Inconsistency(format!("Chain '{}' vanished", chain_id))
                        })?;

                    // The first alternate location seen in a residue is the one kept for it.
                    if let Some(alt_loc) = column_char(&line, 16) {
                        let selected = *selected_alt_locs.entry(residue).or_insert(alt_loc);
                        if selected != alt_loc {
                            metadata.skipped_alt_locations += 1;
                            continue;
                        }
                    }

                    let atom = Atom::new(name, element, residue, Point3::new(x, y, z))
                        .with_serial(serial);
                    let atom_id = system.add_atom_to_residue(residue, atom).ok_or_else(|| {
                        PdbError::Inconsistency(format!("Residue {} vanished", res_seq))
                    })?;
                    serial_map.entry(serial).or_insert(atom_id);
                }
                "CONECT" => {
                    metadata.has_connectivity = true;
                    let mut serials = Vec::with_capacity(CONECT_FIELDS.len());
                    for (start, end) in CONECT_FIELDS {
                        if slice_and_trim(&line, start, end).is_empty() {
                            break;
                        }
                        serials.push(parse_int::<usize>(&line, start, end, line_num)?);
                    }
                    conect_records.push(serials);
                }
                "END" => break,
                _ => {}
            }
        }

        if serial_map.is_empty() {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }

        // CONECT records may reference atoms of skipped models or alternate locations.
        for serials in conect_records {
            let Some((origin, partners)) = serials.split_first() else {
                continue;
            };
            let Some(&origin_id) = serial_map.get(origin) else {
                continue;
            };
            for partner in partners {
                if let Some(&partner_id) = serial_map.get(partner) {
                    system.add_bond(origin_id, partner_id, BondOrder::Single);
                }
            }
        }

        Ok((system, metadata))
    }
}
