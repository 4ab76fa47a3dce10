use crate::core::io::traits::StructureSource;
use crate::core::models::atom::{AtomRecord, MoleculeClass};
use crate::core::models::structure::ClassifiedStructure;
use crate::core::tables;
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::warn;

/// A half-open byte range addressing one field of a fixed-column record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub start: usize,
    pub end: usize,
}

impl ColumnSpan {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Extracts and trims the field from a record line. Lines shorter than the
    /// span yield an empty field.
    pub fn extract<'a>(&self, line: &'a str) -> &'a str {
        line.get(self.start..self.end).unwrap_or("").trim()
    }

    /// One-based column label for error messages.
    pub fn label(&self) -> String {
        format!("{}-{}", self.start + 1, self.end)
    }
}

/// The field-to-column schema of a fixed-column coordinate record.
///
/// Keeping the byte offsets in one table isolates the fixed-width contract
/// from the parsing logic; a format variant is a different schema value, not a
/// different parser.
#[derive(Debug, Clone, Copy)]
pub struct RecordSchema {
    pub record_tag: ColumnSpan,
    pub atom_name: ColumnSpan,
    pub alt_location: ColumnSpan,
    pub residue_name: ColumnSpan,
    pub chain_id: ColumnSpan,
    pub residue_number: ColumnSpan,
    pub x: ColumnSpan,
    pub y: ColumnSpan,
    pub z: ColumnSpan,
    /// Minimum line length for a coordinate record of this schema.
    pub min_line_len: usize,
}

/// Column layout of PDB ATOM/HETATM records.
pub const PDB_SCHEMA: RecordSchema = RecordSchema {
    record_tag: ColumnSpan::new(0, 6),
    atom_name: ColumnSpan::new(12, 16),
    alt_location: ColumnSpan::new(16, 17),
    residue_name: ColumnSpan::new(17, 20),
    chain_id: ColumnSpan::new(20, 22),
    residue_number: ColumnSpan::new(22, 26),
    x: ColumnSpan::new(30, 38),
    y: ColumnSpan::new(38, 46),
    z: ColumnSpan::new(46, 54),
    min_line_len: 54,
};

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least {min} chars)")]
    LineTooShort { min: usize },
}

fn parse_int(span: &ColumnSpan, line: &str, line_num: usize) -> Result<i32, PdbError> {
    let value = span.extract(line);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: span.label(),
            value: value.into(),
        },
    })
}

fn parse_float(span: &ColumnSpan, line: &str, line_num: usize) -> Result<f64, PdbError> {
    let value = span.extract(line);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: span.label(),
            value: value.into(),
        },
    })
}

/// Protein atoms kept for the reduced model (backbone plus the CB anchor).
fn is_kept_protein_atom(name: &str) -> bool {
    matches!(name, "N" | "CA" | "C" | "O" | "OT1" | "CB")
}

/// Nucleic-acid and saccharide entries keep nitrogen, oxygen and phosphorus.
fn is_kept_nop_atom(name: &str) -> bool {
    matches!(name.as_bytes().first(), Some(b'N') | Some(b'O') | Some(b'P'))
}

/// Detergent entries keep nitrogens, oxygens, and carbons bonded to oxygen
/// (second character 'O').
fn is_kept_detergent_atom(name: &str) -> bool {
    matches!(name.as_bytes().first(), Some(b'N') | Some(b'O'))
        || name.as_bytes().get(1) == Some(&b'O')
}

/// Fixed-column PDB structure source.
pub struct PdbFile;

impl StructureSource for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<ClassifiedStructure, Self::Error> {
        let schema = &PDB_SCHEMA;
        let mut out = ClassifiedStructure::default();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let record_type = schema.record_tag.extract(&line);
            if record_type != "ATOM" && record_type != "HETATM" {
                continue;
            }
            if line.len() < schema.min_line_len {
                return Err(PdbError::Parse {
                    line: line_num,
                    kind: PdbParseErrorKind::LineTooShort {
                        min: schema.min_line_len,
                    },
                });
            }

            let residue_name = schema.residue_name.extract(&line).replace('\'', "");
            if tables::is_water(&residue_name) {
                continue;
            }
            // Only the primary (blank or 'A') alternate location is kept.
            let alt = schema.alt_location.extract(&line);
            if !alt.is_empty() && alt != "A" {
                continue;
            }

            let atom_name = schema.atom_name.extract(&line).to_string();
            let chain_id = schema.chain_id.extract(&line);
            let residue_number = parse_int(&schema.residue_number, &line, line_num)?;
            let x = parse_float(&schema.x, &line, line_num)?;
            let y = parse_float(&schema.y, &line, line_num)?;
            let z = parse_float(&schema.z, &line, line_num)?;
            let position = Point3::new(x, y, z);

            if record_type == "HETATM" {
                // Ion tallies take precedence over residue-class membership.
                match atom_name.as_str() {
                    "MG" => {
                        out.ions.magnesium += 1;
                        continue;
                    }
                    "MN" => {
                        out.ions.manganese += 1;
                        continue;
                    }
                    "K" => {
                        out.ions.potassium += 1;
                        continue;
                    }
                    "NA" | "Na" => {
                        out.ions.sodium += 1;
                        continue;
                    }
                    _ => {}
                }
            }

            let class = tables::classify_residue(&residue_name);
            if record_type == "HETATM" && class == Some(MoleculeClass::AminoAcid) {
                // Amino acids are only taken from ATOM records.
                continue;
            }
            if record_type == "HETATM" && class.is_none() {
                out.unclassified += 1;
                continue;
            }

            let mut record = AtomRecord::new(
                out.records.len(),
                &atom_name,
                &residue_name,
                chain_id,
                residue_number,
                position,
            );
            // Electron weighting covers ATOM records only; heteroatom
            // residues shape the gyration tensor but not the electron cloud.
            if record_type == "HETATM" {
                record.electrons = 0.0;
            }

            match class {
                Some(MoleculeClass::AminoAcid) => {
                    if is_kept_protein_atom(&atom_name) {
                        out.protein.push(record.clone());
                    }
                }
                Some(MoleculeClass::NucleicAcid) => {
                    if is_kept_nop_atom(&atom_name) {
                        out.nucleic.push(record.clone());
                    }
                }
                Some(MoleculeClass::Saccharide) => {
                    if is_kept_nop_atom(&atom_name) {
                        out.saccharide.push(record.clone());
                    }
                }
                Some(MoleculeClass::Detergent) => {
                    if is_kept_detergent_atom(&atom_name) {
                        out.detergent.push(record.clone());
                    }
                }
                None => {
                    // Unknown residues in ATOM records still contribute to the
                    // all-atom moments, mirroring sparse real-world structures.
                    out.unclassified += 1;
                }
            }
            out.records.push(record);
        }

        if out.records.is_empty() {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        if out.unclassified > 0 {
            warn!(
                count = out.unclassified,
                "atom records matched no residue-class table and were excluded from classification"
            );
        }
        Ok(out)
    }
}
