use crate::core::io::format::StructureFormat;
use crate::core::io::traits::{FileMetadata, MolecularFile};
use crate::core::models::atom::Atom;
use crate::core::models::element::Element;
use crate::core::models::ids::AtomId;
use crate::core::models::system::MolecularSystem;
use crate::core::models::topology::BondOrder;
use nalgebra::Point3;
use std::collections::HashMap;
use std::io::{self, BufRead};
use thiserror::Error;

/// Last column an ATOM/HETATM record must reach: the end of the force-field type.
const MIN_ATOM_RECORD_LEN: usize = 66;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BgfMetadata {
    /// Non-atom, non-connectivity records, in file order.
    pub header_lines: Vec<String>,
    /// Value of the `FORCEFIELD` record, if present.
    pub force_field: Option<String>,
    /// Whether the file carried any `CONECT` records.
    pub has_connectivity: bool,
}

#[derive(Debug, Error)]
pub enum BgfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: BgfParseErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum BgfParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 66 chars)")]
    LineTooShort,
    #[error("CONECT/ORDER record contains a non-integer serial ('{value}')")]
    InvalidConectFormat { value: String },
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn parse_float(value: &str, columns: &str, line: usize) -> Result<f64, BgfError> {
    value.parse().map_err(|_| BgfError::Parse {
        line,
        kind: BgfParseErrorKind::InvalidFloat {
            columns: columns.into(),
            value: value.into(),
        },
    })
}

/// Derives the element from a DREIDING-style force-field type such as `C_R` or `Cl`.
fn element_from_ff_type(ff_type: &str) -> Option<Element> {
    let prefix = ff_type.split('_').next().unwrap_or("");
    let symbol: String = prefix.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    Element::from_symbol(&symbol).or_else(|| Element::from_symbol(symbol.get(..1)?))
}

fn element_from_name(name: &str) -> Element {
    name.chars()
        .find(|c| c.is_ascii_alphabetic())
        .and_then(|c| Element::from_symbol(&c.to_string()))
        .unwrap_or_default()
}

struct ConectRecord {
    line: usize,
    origin: usize,
    partners: Vec<usize>,
}

fn parse_serials(line: &str, line_num: usize) -> Result<Vec<usize>, BgfError> {
    line.split_whitespace()
        .skip(1)
        .map(|token| {
            token.parse::<usize>().map_err(|_| BgfError::Parse {
                line: line_num,
                kind: BgfParseErrorKind::InvalidConectFormat {
                    value: token.into(),
                },
            })
        })
        .collect()
}

pub struct BgfFile;

impl FileMetadata for BgfMetadata {
    fn has_complete_connectivity(&self) -> bool {
        self.has_connectivity
    }
}

impl MolecularFile for BgfFile {
    const FORMAT: StructureFormat = StructureFormat::Bgf;

    type Metadata = BgfMetadata;
    type Error = BgfError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        let mut system = MolecularSystem::new();
        let mut metadata = BgfMetadata::default();
        let mut serial_map: HashMap<usize, AtomId> = HashMap::new();

        let mut conect_records: Vec<ConectRecord> = Vec::new();
        let mut order_records: HashMap<usize, Vec<BondOrder>> = HashMap::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let record_type = slice_and_trim(&line, 0, 6);
            if record_type.is_empty() {
                continue;
            }

            match record_type {
                "ATOM" | "HETATM" => {
                    if line.len() < MIN_ATOM_RECORD_LEN {
                        return Err(BgfError::Parse {
                            line: line_num,
                            kind: BgfParseErrorKind::LineTooShort,
                        });
                    }

                    let serial_str = slice_and_trim(&line, 7, 12);
                    let name_str = slice_and_trim(&line, 13, 18);
                    let res_name_str = slice_and_trim(&line, 19, 22);
                    let chain_id_str = slice_and_trim(&line, 23, 24);
                    let res_id_str = slice_and_trim(&line, 25, 30);
                    let ff_type_str = slice_and_trim(&line, 61, 66);

                    if name_str.is_empty() {
                        return Err(BgfError::Parse {
                            line: line_num,
                            kind: BgfParseErrorKind::MissingRequiredField {
                                columns: "14-18".into(),
                            },
                        });
                    }
                    let serial: usize = serial_str.parse().map_err(|_| BgfError::Parse {
                        line: line_num,
                        kind: BgfParseErrorKind::InvalidInt {
                            columns: "8-12".into(),
                            value: serial_str.into(),
                        },
                    })?;
                    if serial_map.contains_key(&serial) {
                        return Err(BgfError::Inconsistency(format!(
                            "Duplicate atom serial: {}",
                            serial
                        )));
                    }

                    let chain_id: char = chain_id_str.chars().next().unwrap_or('A');
                    let res_id: isize = res_id_str.parse().map_err(|_| BgfError::Parse {
                        line: line_num,
                        kind: BgfParseErrorKind::InvalidInt {
                            columns: "26-30".into(),
                            value: res_id_str.into(),
                        },
                    })?;
                    let x = parse_float(slice_and_trim(&line, 30, 40), "31-40", line_num)?;
                    let y = parse_float(slice_and_trim(&line, 40, 50), "41-50", line_num)?;
                    let z = parse_float(slice_and_trim(&line, 50, 60), "51-60", line_num)?;
                    if ff_type_str.is_empty() {
                        return Err(BgfError::Parse {
                            line: line_num,
                            kind: BgfParseErrorKind::MissingRequiredField {
                                columns: "62-66".into(),
                            },
                        });
                    }

                    let element = element_from_ff_type(ff_type_str)
                        .unwrap_or_else(|| element_from_name(name_str));

                    let chain = system.add_chain(chain_id);
                    let residue = system
                        .add_residue(chain, res_id, None, res_name_str)
                        .ok_or_else(|| {
                            BgfError::Inconsistency(format!("Chain '{}' vanished", chain_id))
                        })?;
                    let atom = Atom::new(name_str, element, residue, Point3::new(x, y, z))
                        .with_serial(serial);
                    let atom_id = system.add_atom_to_residue(residue, atom).ok_or_else(|| {
                        BgfError::Inconsistency(format!("Residue {} vanished", res_id))
                    })?;
                    serial_map.insert(serial, atom_id);
                }
                "CONECT" => {
                    metadata.has_connectivity = true;
                    let serials = parse_serials(&line, line_num)?;
                    if let Some((&origin, partners)) = serials.split_first() {
                        conect_records.push(ConectRecord {
                            line: line_num,
                            origin,
                            partners: partners.to_vec(),
                        });
                    }
                }
                "ORDER" => {
                    let mut tokens = line.split_whitespace().skip(1);
                    let Some(origin_str) = tokens.next() else {
                        continue;
                    };
                    let origin: usize = origin_str.parse().map_err(|_| BgfError::Parse {
                        line: line_num,
                        kind: BgfParseErrorKind::InvalidConectFormat {
                            value: origin_str.into(),
                        },
                    })?;
                    let orders = tokens.map(|t| t.parse().unwrap_or_default()).collect();
                    order_records.insert(origin, orders);
                }
                "FORCEF" if line.starts_with("FORCEFIELD") => {
                    metadata.force_field = Some(line["FORCEFIELD".len()..].trim().to_string());
                }
                "FORMAT" => {}
                "END" => break,
                _ => metadata.header_lines.push(line.clone()),
            }
        }

        if serial_map.is_empty() {
            return Err(BgfError::MissingRecord("ATOM/HETATM records".into()));
        }

        for record in conect_records {
            let lookup = |serial: usize| {
                serial_map.get(&serial).copied().ok_or_else(|| {
                    BgfError::Inconsistency(format!(
                        "CONECT on line {} references unknown atom serial {}",
                        record.line, serial
                    ))
                })
            };
            let origin = lookup(record.origin)?;
            let orders = order_records.get(&record.origin);
            for (position, &partner_serial) in record.partners.iter().enumerate() {
                let partner = lookup(partner_serial)?;
                let order = orders
                    .and_then(|o| o.get(position))
                    .copied()
                    .unwrap_or_default();
                system.add_bond(origin, partner, order);
            }
        }

        Ok((system, metadata))
    }
}
