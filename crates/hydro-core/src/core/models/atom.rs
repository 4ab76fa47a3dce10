use nalgebra::Point3;
use std::str::FromStr;

/// Classifies an atom by its effective scattering group for electron-weighted
/// radius-of-gyration calculations.
///
/// The reduced model works with heavy atoms only; hydrogens bound to a carbon
/// are folded into the carbon's electron count, which is why carbons appear in
/// a "light" (bare) and a "heavy" (hydrogen-carrying) flavor. The exact electron
/// weight of a record also depends on the atom name (methyl carbons carry more
/// implicit hydrogens), so the weight is stored alongside the class rather than
/// derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementClass {
    /// A carbon without implicit hydrogens (carbonyl and most aromatic carbons).
    CarbonLight,
    /// A carbon carrying one or more implicit hydrogens.
    CarbonHeavy,
    /// A nitrogen atom (amide hydrogens folded in).
    Nitrogen,
    /// An oxygen atom.
    Oxygen,
    /// A phosphorus atom (nucleic-acid backbone).
    Phosphorus,
    /// A thioether sulfur (methionine SD).
    SulfurThioether,
    /// A thiol sulfur (cysteine SG).
    SulfurThiol,
}

impl FromStr for ElementClass {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "carbon-light" => Ok(ElementClass::CarbonLight),
            "carbon-heavy" => Ok(ElementClass::CarbonHeavy),
            "nitrogen" => Ok(ElementClass::Nitrogen),
            "oxygen" => Ok(ElementClass::Oxygen),
            "phosphorus" => Ok(ElementClass::Phosphorus),
            "sulfur-thioether" => Ok(ElementClass::SulfurThioether),
            "sulfur-thiol" => Ok(ElementClass::SulfurThiol),
            _ => Err(()),
        }
    }
}

/// The residue class a record was assigned to by the composition tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoleculeClass {
    /// Standard or modified amino acid residue.
    AminoAcid,
    /// Nucleoside/nucleotide residue (RNA or DNA, including modified bases).
    NucleicAcid,
    /// Saccharide residue (glycosylations).
    Saccharide,
    /// Detergent molecule.
    Detergent,
}

/// An immutable per-atom entry produced by the structure loader.
///
/// Records are created once during parsing and never mutated afterwards; the
/// reduced-model builder produces fresh records when it displaces side-chain
/// pseudo-atoms.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// Zero-based index of the record in loader output order.
    pub index: usize,
    /// The atom name (e.g., "CA", "N", "O").
    pub name: String,
    /// The three-letter residue name (e.g., "ALA").
    pub residue_name: String,
    /// The chain identifier; `"X"` when the file leaves the column blank.
    pub chain_id: String,
    /// The residue sequence number.
    pub residue_number: i32,
    /// The 3D coordinates in Angstroms.
    pub position: Point3<f64>,
    /// Scattering-group classification, when the atom name matches a known group.
    pub element_class: Option<ElementClass>,
    /// Electron count used for Rg weighting; `0.0` for unclassified atoms.
    pub electrons: f64,
}

impl AtomRecord {
    /// Creates a record with its element class resolved from the atom name.
    pub fn new(
        index: usize,
        name: &str,
        residue_name: &str,
        chain_id: &str,
        residue_number: i32,
        position: Point3<f64>,
    ) -> Self {
        let classified = crate::core::tables::classify_element(name);
        Self {
            index,
            name: name.to_string(),
            residue_name: residue_name.to_string(),
            chain_id: if chain_id.is_empty() {
                "X".to_string()
            } else {
                chain_id.to_string()
            },
            residue_number,
            position,
            element_class: classified.map(|(class, _)| class),
            electrons: classified.map_or(0.0, |(_, e)| e),
        }
    }

    /// Key identifying the residue this record belongs to.
    pub fn residue_key(&self) -> (String, i32) {
        (self.chain_id.clone(), self.residue_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_resolves_element_class_from_name() {
        let rec = AtomRecord::new(0, "CA", "ALA", "A", 1, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(rec.element_class, Some(ElementClass::CarbonHeavy));
        assert_eq!(rec.electrons, 7.0);
    }

    #[test]
    fn new_record_with_unknown_name_is_unclassified() {
        let rec = AtomRecord::new(0, "XX", "ALA", "A", 1, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(rec.element_class, None);
        assert_eq!(rec.electrons, 0.0);
    }

    #[test]
    fn blank_chain_id_maps_to_placeholder() {
        let rec = AtomRecord::new(0, "N", "GLY", "", 7, Point3::origin());
        assert_eq!(rec.chain_id, "X");
    }

    #[test]
    fn element_class_parses_from_str() {
        assert_eq!(
            ElementClass::from_str("carbon-heavy"),
            Ok(ElementClass::CarbonHeavy)
        );
        assert_eq!(
            ElementClass::from_str("sulfur-thiol"),
            Ok(ElementClass::SulfurThiol)
        );
        assert_eq!(ElementClass::from_str("helium"), Err(()));
    }
}
