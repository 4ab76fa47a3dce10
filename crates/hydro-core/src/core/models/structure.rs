use super::atom::AtomRecord;

/// Tallies of coordinating ions found among heteroatom records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IonCounts {
    pub magnesium: usize,
    pub manganese: usize,
    pub potassium: usize,
    pub sodium: usize,
}

/// The classified output of the structure loader.
///
/// `records` holds every relevant heavy-atom record in file order (used for the
/// gyration tensor and the electron-weighted radius of gyration); the class
/// subsets hold the records that feed the reduced model. Water residues and
/// non-primary alternate locations are excluded from all of them.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedStructure {
    /// All relevant atom records in file order.
    pub records: Vec<AtomRecord>,
    /// Protein backbone and CB records (atoms N, CA, C, O, OT1, CB of residues
    /// found in the amino acid table).
    pub protein: Vec<AtomRecord>,
    /// Nucleic-acid N/O/P records.
    pub nucleic: Vec<AtomRecord>,
    /// Saccharide N/O/P records.
    pub saccharide: Vec<AtomRecord>,
    /// Detergent N/O records.
    pub detergent: Vec<AtomRecord>,
    /// Coordinating ion tallies.
    pub ions: IonCounts,
    /// Number of atom records that matched no residue-class table. These are
    /// excluded from the class subsets but still reported for diagnostics.
    pub unclassified: usize,
}

impl ClassifiedStructure {
    /// True when no atom of any class survived filtering.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
