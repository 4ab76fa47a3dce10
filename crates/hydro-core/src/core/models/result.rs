use serde::Serialize;

/// The complete coefficient set computed for one structure.
///
/// Immutable once computed; one instance per input structure. Lengths are in
/// Angstroms, masses in g/mol, specific volumes in mL/g, the sedimentation
/// coefficient in seconds, diffusion coefficients in cm²/s and s⁻¹, the
/// rotational correlation time in ns, and the hydration terms in grams of
/// water per gram of macromolecule.
#[derive(Debug, Clone, Serialize)]
pub struct HydrodynamicResult {
    /// Number of amino acid residues.
    pub amino_acids: usize,
    /// Number of nucleotide residues.
    pub nucleotides: usize,
    /// Number of saccharide residues.
    pub saccharides: usize,
    /// Number of detergent molecules.
    pub detergents: usize,
    /// Coordinating ion counts (Mg, Mn, K, Na).
    pub magnesium: usize,
    pub manganese: usize,
    pub potassium: usize,
    pub sodium: usize,
    /// Molecular mass, g/mol.
    pub molecular_mass: f64,
    /// Partial specific volume at 20 °C, mL/g.
    pub specific_volume: f64,
    /// Radius of the anhydrous equivalent sphere, Å.
    pub anhydrous_radius: f64,
    /// Anhydrous (electron-weighted) radius of gyration, Å.
    pub anhydrous_rg: f64,
    /// Hydrated radius of gyration including mesh water points, Å.
    pub hydrated_rg: f64,
    /// Maximum hull vertex distance after SAS-rounding correction, Å.
    pub dmax: f64,
    /// Axial ratio of the equivalent prolate ellipsoid of revolution.
    pub axial_ratio: f64,
    /// Translational shape factor (Perrin factor with empirical square root).
    pub shape_factor: f64,
    /// Frictional ratio f/f₀.
    pub frictional_ratio: f64,
    /// Translational diffusion coefficient, cm²/s.
    pub translational_diffusion: f64,
    /// Effective translational hydrodynamic radius, Å.
    pub translational_radius: f64,
    /// Sedimentation coefficient, s.
    pub sedimentation_coefficient: f64,
    /// Intrinsic viscosity, mL/g.
    pub intrinsic_viscosity: f64,
    /// Surface-shell hydration, g/g.
    pub shell_hydration: f64,
    /// Entrained (crevice) hydration, g/g.
    pub entrained_hydration: f64,
    /// Total hydration (shell + entrained), g/g.
    pub total_hydration: f64,
    /// Specific volume of the hydrated particle, mL/g.
    pub hydrated_specific_volume: f64,
    /// Concentration dependence of s (Rowe), mL/g.
    pub ks: f64,
    /// Concentration dependence of Dt (Teraoka), mL/g.
    pub kd: f64,
    /// Tanford excluded-volume second virial coefficient, mL/g.
    pub second_virial: f64,
    /// Asphericity from the gyration tensor (0 sphere, 1 rod).
    pub asphericity: f64,
    /// Rotational diffusion coefficient, s⁻¹.
    pub rotational_diffusion: f64,
    /// Effective rotational hydrodynamic radius, Å.
    pub rotational_radius: f64,
    /// Rotational correlation time from the rotational radius, ns.
    pub rotational_correlation_time: f64,
}
