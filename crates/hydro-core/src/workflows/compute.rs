use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureSource;
use crate::core::models::reduced::ReducedModel;
use crate::core::models::result::HydrodynamicResult;
use crate::core::models::structure::ClassifiedStructure;
use crate::engine::error::EngineError;
use crate::engine::hull::{HullBackend, QconvexBackend, QuickHull};
use crate::engine::mesh::{self, MeshConfig, SurfaceMesh};
use crate::engine::{hydro, reduce};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Which convex-hull implementation the pipeline uses. Chosen once per run;
/// never discovered from the environment.
#[derive(Debug, Clone, Default)]
pub enum HullEngine {
    /// The built-in quickhull implementation.
    #[default]
    QuickHull,
    /// An external `qconvex` binary at an explicitly configured path.
    Qconvex { executable: PathBuf },
}

/// Configuration for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct ComputeConfig {
    /// Surface-mesh parameters.
    pub mesh: MeshConfig,
    /// Convex-hull backend selection.
    pub hull: HullEngine,
}

/// Everything a pipeline run produces. The reduced model and mesh come along
/// with the coefficient set so callers can export or inspect them.
#[derive(Debug, Clone)]
pub struct ComputeOutput {
    pub result: HydrodynamicResult,
    pub model: ReducedModel,
    pub mesh: SurfaceMesh,
}

/// Runs the full pipeline on an already classified structure.
///
/// # Errors
///
/// Returns [`EngineError`] when the structure fails an integrity check, the
/// mesh admits no convex hull, or the model is empty.
pub fn run(
    structure: &ClassifiedStructure,
    config: &ComputeConfig,
) -> Result<ComputeOutput, EngineError> {
    if structure.is_empty() {
        return Err(EngineError::EmptyModel("no classified atom records"));
    }

    let model = reduce::build(structure)?;
    if model.is_empty() {
        return Err(EngineError::EmptyModel("reduced model has no entries"));
    }
    debug!(entries = model.len(), "reduced model ready");

    let mesh = mesh::sample_surface(&model.entries, &config.mesh);
    debug!(
        points = mesh.points.len(),
        area = mesh.total_area,
        "surface mesh sampled"
    );

    let metrics = match &config.hull {
        HullEngine::QuickHull => QuickHull.compute(&mesh.points)?,
        HullEngine::Qconvex { executable } => {
            QconvexBackend::new(executable.clone()).compute(&mesh.points)?
        }
    };
    debug!(
        area = metrics.area,
        volume = metrics.volume,
        dmax = metrics.dmax,
        "convex hull computed"
    );

    let result = hydro::compute(structure, &model, &mesh, &metrics, config.mesh.probe_radius)?;
    info!(
        mass = result.molecular_mass,
        rht = result.translational_radius,
        s = result.sedimentation_coefficient,
        "coefficients computed"
    );

    Ok(ComputeOutput {
        result,
        model,
        mesh,
    })
}

/// Parses a PDB file and runs the full pipeline on it.
///
/// # Errors
///
/// Returns [`EngineError`] when the file cannot be parsed or any pipeline
/// stage fails.
pub fn run_path(path: impl AsRef<Path>, config: &ComputeConfig) -> Result<ComputeOutput, EngineError> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading structure");
    let structure = PdbFile::read_from_path(path)?;
    run(&structure, config)
}
