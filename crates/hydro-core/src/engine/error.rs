use crate::core::io::pdb::PdbError;
use thiserror::Error;

/// Structure-level data-quality faults. Deterministic and not retriable: the
/// caller must supply a corrected file.
#[derive(Debug, Error)]
pub enum StructuralIntegrityError {
    #[error(
        "backbone atom counts are inconsistent: {n} N, {ca} CA, {o} O (expected 2·N == CA + O)"
    )]
    BackboneCountMismatch { n: usize, ca: usize, o: usize },

    #[error("non-glycine residue {residue_name} {chain_id}:{residue_number} has no CB atom")]
    MissingSidechain {
        residue_name: String,
        chain_id: String,
        residue_number: i32,
    },

    #[error("residue {residue_name} {chain_id}:{residue_number} has no CA in its backbone group")]
    MissingAlphaCarbon {
        residue_name: String,
        chain_id: String,
        residue_number: i32,
    },
}

/// Faults raised when no valid convex hull exists for the mesh point set.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("convex hull requires at least 4 points, got {0}")]
    TooFewPoints(usize),

    #[error("point set is degenerate (collinear or coplanar); no 3D hull exists")]
    Degenerate,

    #[error(
        "hull extent is too small: Dmax {dmax:.2} Å does not exceed the {correction:.1} Å surface-rounding correction"
    )]
    HullTooSmall { dmax: f64, correction: f64 },

    #[error("external hull backend failed: {0}")]
    Backend(String),
}

/// Top-level per-structure error. Any variant aborts that structure's
/// computation; sibling structures in a batch are unaffected.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("structural integrity: {0}")]
    StructuralIntegrity(#[from] StructuralIntegrityError),

    #[error("geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("empty input: {0}")]
    EmptyModel(&'static str),

    #[error(transparent)]
    Parse(#[from] PdbError),
}
