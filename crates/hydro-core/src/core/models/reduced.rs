use super::atom::AtomRecord;
use super::structure::IonCounts;

/// Per-molecule-class residue tallies and the mass/volume accumulators the
/// hydrodynamics calculator needs.
///
/// `vbar_numerator` is the Cohn-Edsall sum `Σ mᵢ·v̄ᵢ` over counted residues
/// (plus ion volume terms); dividing by `mass` yields the uncorrected partial
/// specific volume.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Composition {
    pub amino_acids: usize,
    pub nucleotides: usize,
    pub saccharides: usize,
    pub detergents: usize,
    pub ions: IonCounts,
    /// Total molecular mass in g/mol.
    pub mass: f64,
    /// Cohn-Edsall numerator in (g/mol)·(mL/g).
    pub vbar_numerator: f64,
}

/// The unified-side-chain reduced model of a structure.
///
/// Protein residues contribute their four backbone atoms followed by one
/// side-chain pseudo-atom displaced along the CA→CB direction (glycines
/// contribute backbone only); nucleic-acid, saccharide and detergent records
/// follow unmodified, in that order. Derived once per structure and read-only
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct ReducedModel {
    /// Model entries in deterministic output order.
    pub entries: Vec<AtomRecord>,
    /// Residue tallies and mass accumulators for the whole model.
    pub composition: Composition,
}

impl ReducedModel {
    /// Number of entries in the model.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the model holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
