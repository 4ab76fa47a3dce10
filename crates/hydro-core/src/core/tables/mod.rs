//! # Composition Tables
//!
//! Static physicochemical constants for the four residue classes handled by the
//! pipeline, plus the electron-weight classification of atom names.
//!
//! Amino acid masses are residue masses (minus water, SEDNTERP database);
//! volumes from Cohn and Edsall (1943) as corrected by Perkins (EJB 1986);
//! vbar is `0.60224 * (V/M)`. Nucleoside data from Voss (JMB 2005) and Nadassy
//! (NAR 2001). Saccharide and detergent data from Schuck et al., Basic
//! Principles of Analytical Ultracentrifugation, CRC Press, 2016, and the
//! sources cited therein. The side-chain radius is the radius of a sphere with
//! the volume of the residue's side chain, used to place the unified side-chain
//! pseudo-atom.

use crate::core::models::atom::{ElementClass, MoleculeClass};
use phf::{Map, Set, phf_map, phf_set};

/// Per-residue physicochemical constants.
///
/// Mass in g/mol, volume in Å³, partial specific volume in mL/g, and the
/// unified side-chain sphere radius in Å (zero for residues without a side
/// chain and for non-protein residue classes).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidueData {
    pub mass: f64,
    pub volume: f64,
    pub vbar: f64,
    pub sidechain_radius: f64,
}

const fn rd(mass: f64, volume: f64, vbar: f64, sidechain_radius: f64) -> ResidueData {
    ResidueData {
        mass,
        volume,
        vbar,
        sidechain_radius,
    }
}

/// Amino acid residues, including the CHARMM histidine variants and MSE.
static AMINO_ACIDS: Map<&'static str, ResidueData> = phf_map! {
    "ALA" => rd(71.0779, 87.2, 0.738842, 1.852),
    "ARG" => rd(156.1857, 188.2, 0.725685, 3.123),
    "ASN" => rd(114.1026, 120.1, 0.633895, 2.422),
    "ASP" => rd(115.0874, 115.4, 0.603876, 2.356),
    "CYS" => rd(103.1429, 106.7, 0.62301, 2.224),
    "GLN" => rd(128.1292, 145.1, 0.682007, 2.722),
    "GLU" => rd(129.114, 140.9, 0.657215, 2.676),
    "GLY" => rd(57.0513, 60.6, 0.6397, 0.000),
    "HIS" => rd(137.1393, 152.4, 0.669257, 2.798),
    "HSE" => rd(137.1393, 152.4, 0.669257, 2.798),
    "HSP" => rd(137.1393, 152.4, 0.669257, 2.798),
    "HSD" => rd(137.1393, 152.4, 0.669257, 2.798),
    "ILE" => rd(113.1576, 168.9, 0.898909, 2.957),
    "LEU" => rd(113.1576, 168.9, 0.898909, 2.957),
    "LYS" => rd(128.1723, 174.3, 0.818979, 3.005),
    "MET" => rd(131.1961, 163.1, 0.748691, 2.903),
    "MSE" => rd(178.125, 163.1, 0.551441, 2.903),
    "PHE" => rd(147.1739, 187.9, 0.768892, 3.121),
    "PRO" => rd(97.1152, 122.4, 0.759039, 2.453),
    "SER" => rd(87.0773, 91.0, 0.62937, 1.936),
    "THR" => rd(101.1039, 117.4, 0.69931, 2.385),
    "TRP" => rd(186.2099, 228.5, 0.739015, 3.422),
    "TYR" => rd(163.1733, 192.1, 0.709003, 3.155),
    "VAL" => rd(99.1311, 141.4, 0.859031, 2.682),
};

/// Nucleosides (nucleotide minus the PO3H phosphate), plus the PO2 increment.
static NUCLEIC_ACIDS: Map<&'static str, ResidueData> = phf_map! {
    "A" => rd(267.25, 244.1, 0.55, 0.0),
    "1MA" => rd(281.25, 256.9, 0.55, 0.0),
    "MIA" => rd(383.45, 350.2, 0.55, 0.0),
    "C" => rd(243.22, 222.1, 0.55, 0.0),
    "5MC" => rd(257.22, 234.9, 0.55, 0.0),
    "OMC" => rd(257.22, 234.9, 0.55, 0.0),
    "G" => rd(283.24, 258.7, 0.55, 0.0),
    "2MG" => rd(297.27, 271.5, 0.55, 0.0),
    "7MG" => rd(299.27, 273.3, 0.55, 0.0),
    "M2G" => rd(311.27, 284.3, 0.55, 0.0),
    "OMG" => rd(297.27, 271.5, 0.55, 0.0),
    "YYG" => rd(508.54, 464.4, 0.55, 0.0),
    "YG" => rd(428.55, 391.4, 0.55, 0.0),
    "U" => rd(244.20, 223.0, 0.531, 0.0),
    "5MU" => rd(258.20, 235.8, 0.531, 0.0),
    "4SU" => rd(260.35, 237.8, 0.531, 0.0),
    "H2U" => rd(246.20, 224.8, 0.531, 0.0),
    "PSU" => rd(244.20, 223.0, 0.531, 0.0),
    "I" => rd(268.23, 245.0, 0.55, 0.0),
    "DA" => rd(251.25, 229.4, 0.55, 0.0),
    "DC" => rd(227.22, 207.5, 0.55, 0.0),
    "DG" => rd(267.25, 244.1, 0.55, 0.0),
    "DT" => rd(242.23, 221.2, 0.55, 0.0),
    "DI" => rd(252.22, 230.3, 0.55, 0.0),
    "PO2" => rd(62.97, 52.4, 0.501, 0.0),
};

/// Saccharides; default vbar 0.63 unless a measured value is available.
static SACCHARIDES: Map<&'static str, ResidueData> = phf_map! {
    "NG6" => rd(301.27, 315.2, 0.630, 0.0),
    "NAG" => rd(221.21, 231.4, 0.630, 0.0),
    "BM3" => rd(221.21, 231.4, 0.630, 0.0),
    "NGA" => rd(221.21, 231.4, 0.684, 0.0),
    "GCU" => rd(194.14, 203.1, 0.630, 0.0),
    "IDR" => rd(194.14, 203.1, 0.630, 0.0),
    "BMA" => rd(180.16, 188.4, 0.607, 0.0),
    "MAN" => rd(180.16, 188.4, 0.607, 0.0),
    "GAL" => rd(180.16, 188.4, 0.622, 0.0),
    "GLA" => rd(180.16, 188.4, 0.622, 0.0),
    "GLC" => rd(180.16, 188.4, 0.622, 0.0),
    "BGC" => rd(180.16, 188.4, 0.622, 0.0),
    "AOS" => rd(180.16, 188.4, 0.630, 0.0),
    "GCS" => rd(179.17, 187.4, 0.630, 0.0),
    "RAM" => rd(164.16, 171.7, 0.630, 0.0),
    "FUC" => rd(164.16, 171.7, 0.671, 0.0),
    "SIA" => rd(309.27, 299.9, 0.584, 0.0),
};

/// Detergents.
static DETERGENTS: Map<&'static str, ResidueData> = phf_map! {
    "SB3" => rd(335.50, 533.9, 0.957, 0.0),
    "LMT" => rd(510.62, 691.0, 0.820, 0.0),
    "BOG" => rd(417.02, 594.8, 0.859, 0.0),
    "LDA" => rd(229.40, 429.7, 1.128, 0.0),
    "SDS" => rd(266.40, 384.8, 0.880, 0.0),
    "DXC" => rd(392.47, 507.0, 0.778, 0.0),
    "FOS" => rd(351.46, 548.6, 0.940, 0.0),
};

/// Residue names treated as solvent and always excluded.
static WATER_NAMES: Set<&'static str> = phf_set! { "HOH", "TIP" };

// Bare carbons without implicit hydrogens.
static LIGHT_CARBONS: Set<&'static str> = phf_set! {
    "C", "CG", "CD", "CE", "C2", "C5", "C4", "C6", "CZ", "CD2", "CE2",
};

// Carbons carrying one implicit hydrogen.
static HEAVY_CARBONS: Set<&'static str> = phf_set! {
    "CA", "CB", "CD1", "CE1", "CE3", "CH2", "CZ2", "CZ3", "C1", "C3", "C4'", "C8", "C2'",
};

/// Mass of one water molecule, added once for the termini of a protein chain.
pub const WATER_MASS: f64 = 18.0;

/// PO2 phosphate increment applied to nucleotides carrying a 5' phosphate.
pub const PHOSPHATE: ResidueData = rd(62.97, 52.4, 0.501, 0.0);

/// Atomic masses of the coordinating ions tallied by the loader (g/mol).
pub const MG_MASS: f64 = 24.305;
pub const MN_MASS: f64 = 54.938;
pub const K_MASS: f64 = 39.0983;
pub const NA_MASS: f64 = 22.9898;

/// K+ volume contribution (Voronoi volume, Blatova et al. 2005) times 0.602.
pub const K_VOLUME_TERM: f64 = 30.1 * 0.602;

/// Looks up an amino acid residue by its three-letter code.
pub fn amino_acid(residue_name: &str) -> Option<&'static ResidueData> {
    AMINO_ACIDS.get(residue_name)
}

/// Looks up a nucleoside residue.
pub fn nucleic_acid(residue_name: &str) -> Option<&'static ResidueData> {
    NUCLEIC_ACIDS.get(residue_name)
}

/// Looks up a saccharide residue.
pub fn saccharide(residue_name: &str) -> Option<&'static ResidueData> {
    SACCHARIDES.get(residue_name)
}

/// Looks up a detergent residue.
pub fn detergent(residue_name: &str) -> Option<&'static ResidueData> {
    DETERGENTS.get(residue_name)
}

/// Returns true for residue names treated as solvent water.
pub fn is_water(residue_name: &str) -> bool {
    WATER_NAMES.contains(residue_name)
}

/// Resolves the residue class of a residue name, checking the tables in the
/// loader's classification order.
pub fn classify_residue(residue_name: &str) -> Option<MoleculeClass> {
    if AMINO_ACIDS.contains_key(residue_name) {
        Some(MoleculeClass::AminoAcid)
    } else if NUCLEIC_ACIDS.contains_key(residue_name) {
        Some(MoleculeClass::NucleicAcid)
    } else if SACCHARIDES.contains_key(residue_name) {
        Some(MoleculeClass::Saccharide)
    } else if DETERGENTS.contains_key(residue_name) {
        Some(MoleculeClass::Detergent)
    } else {
        None
    }
}

/// Classifies an atom name into its scattering group and electron weight.
///
/// The weight is the heavy atom's electron count plus one electron per implicit
/// hydrogen (e.g. a methyl carbon counts 9). First match wins; atoms outside
/// the table (hydrogens, exotic names) return `None` and do not contribute to
/// electron-weighted moments.
pub fn classify_element(atom_name: &str) -> Option<(ElementClass, f64)> {
    let name = atom_name.trim();
    if name.starts_with('N') {
        return Some((ElementClass::Nitrogen, 7.0));
    }
    if name.starts_with('O') {
        return Some((ElementClass::Oxygen, 8.0));
    }
    match name {
        "P" => Some((ElementClass::Phosphorus, 15.0)),
        "SD" => Some((ElementClass::SulfurThioether, 16.0)),
        "SG" => Some((ElementClass::SulfurThiol, 17.0)),
        "CG2" => Some((ElementClass::CarbonHeavy, 9.0)),
        "CG1" | "C5*" => Some((ElementClass::CarbonHeavy, 8.0)),
        _ if LIGHT_CARBONS.contains(name) => Some((ElementClass::CarbonLight, 6.0)),
        _ if HEAVY_CARBONS.contains(name) => Some((ElementClass::CarbonHeavy, 7.0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amino_acid_lookup_returns_table_values() {
        let ala = amino_acid("ALA").unwrap();
        assert_eq!(ala.mass, 71.0779);
        assert_eq!(ala.sidechain_radius, 1.852);
        assert!(amino_acid("XYZ").is_none());
    }

    #[test]
    fn glycine_has_no_sidechain_sphere() {
        assert_eq!(amino_acid("GLY").unwrap().sidechain_radius, 0.0);
    }

    #[test]
    fn residue_classification_covers_all_four_tables() {
        assert_eq!(classify_residue("TRP"), Some(MoleculeClass::AminoAcid));
        assert_eq!(classify_residue("DA"), Some(MoleculeClass::NucleicAcid));
        assert_eq!(classify_residue("NAG"), Some(MoleculeClass::Saccharide));
        assert_eq!(classify_residue("SDS"), Some(MoleculeClass::Detergent));
        assert_eq!(classify_residue("UNK"), None);
    }

    #[test]
    fn water_residues_are_recognized() {
        assert!(is_water("HOH"));
        assert!(is_water("TIP"));
        assert!(!is_water("ALA"));
    }

    #[test]
    fn element_weights_match_reference_table() {
        assert_eq!(
            classify_element("N"),
            Some((ElementClass::Nitrogen, 7.0))
        );
        assert_eq!(classify_element("ND2"), Some((ElementClass::Nitrogen, 7.0)));
        assert_eq!(classify_element("O"), Some((ElementClass::Oxygen, 8.0)));
        assert_eq!(classify_element("C"), Some((ElementClass::CarbonLight, 6.0)));
        assert_eq!(classify_element("CA"), Some((ElementClass::CarbonHeavy, 7.0)));
        assert_eq!(classify_element("CG2"), Some((ElementClass::CarbonHeavy, 9.0)));
        assert_eq!(classify_element("CG1"), Some((ElementClass::CarbonHeavy, 8.0)));
        assert_eq!(classify_element("P"), Some((ElementClass::Phosphorus, 15.0)));
        assert_eq!(
            classify_element("SD"),
            Some((ElementClass::SulfurThioether, 16.0))
        );
        assert_eq!(
            classify_element("SG"),
            Some((ElementClass::SulfurThiol, 17.0))
        );
        assert_eq!(classify_element("HB1"), None);
    }
}
