use crate::core::models::atom::AtomRecord;
use nalgebra::{Point3, Vector3};
use rstar::{RTree, primitives::GeomWithData};
use serde::{Deserialize, Serialize};

/// United-atom sphere radius in Å, applied to every reduced-model entry.
pub const UNITED_RADIUS: f64 = 2.0;

/// Default rolling-probe radius in Å. Smaller than a water radius on purpose:
/// the mesh feeds a convex hull, so only the outermost envelope matters and a
/// tight probe keeps crevice points from inflating it.
pub const DEFAULT_PROBE_RADIUS: f64 = 0.6;

/// Default number of sample points per sphere.
pub const DEFAULT_MESH_POINTS: usize = 10;

/// Parameters for surface-mesh generation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Rolling-probe radius in Å.
    pub probe_radius: f64,
    /// Number of golden-spiral sample points per sphere.
    pub n_points: usize,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            probe_radius: DEFAULT_PROBE_RADIUS,
            n_points: DEFAULT_MESH_POINTS,
        }
    }
}

/// The solvent-accessible surface mesh of a reduced model.
#[derive(Debug, Clone, Default)]
pub struct SurfaceMesh {
    /// Exposed sample points, in entry order then spiral order.
    pub points: Vec<Point3<f64>>,
    /// Total solvent-accessible surface area in Å².
    pub total_area: f64,
}

/// Distributes `n` near-uniform points on the unit sphere along a golden
/// spiral.
fn golden_spiral(n: usize) -> Vec<Vector3<f64>> {
    let increment = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
    let dz = 2.0 / n as f64;
    let mut points = Vec::with_capacity(n);
    let mut z = 1.0 - dz / 2.0;
    let mut longitude = 0.0_f64;
    for _ in 0..n {
        let r = (1.0 - z * z).max(0.0).sqrt();
        points.push(Vector3::new(longitude.cos() * r, longitude.sin() * r, z));
        z -= dz;
        longitude += increment;
    }
    points
}

/// Samples the solvent-accessible surface of a set of united-atom spheres.
///
/// Every entry carries the same [`UNITED_RADIUS`] inflated by the probe
/// radius. A sample point survives when no neighboring sphere contains it,
/// boundary included; each surviving point contributes `4πr²/n` to the total
/// area. Neighbor
/// candidates come from an R-tree queried within twice the inflated radius,
/// so the scan stays near-linear in the number of entries.
pub fn sample_surface(entries: &[AtomRecord], config: &MeshConfig) -> SurfaceMesh {
    if entries.is_empty() {
        return SurfaceMesh::default();
    }

    let radius = UNITED_RADIUS + config.probe_radius;
    let sphere = golden_spiral(config.n_points);
    let point_area = 4.0 * std::f64::consts::PI * radius * radius / config.n_points as f64;

    let tree: RTree<GeomWithData<[f64; 3], usize>> = RTree::bulk_load(
        entries
            .iter()
            .enumerate()
            .map(|(i, e)| GeomWithData::new([e.position.x, e.position.y, e.position.z], i))
            .collect(),
    );
    let cutoff_sq = (2.0 * radius) * (2.0 * radius);

    let mut mesh = SurfaceMesh {
        points: Vec::new(),
        total_area: 0.0,
    };

    for (i, entry) in entries.iter().enumerate() {
        let center = entry.position;
        let neighbors: Vec<&AtomRecord> = tree
            .locate_within_distance([center.x, center.y, center.z], cutoff_sq)
            .filter(|g| g.data != i)
            .map(|g| &entries[g.data])
            .collect();

        for dir in &sphere {
            let sample = center + dir * radius;
            // Boundary-inclusive: a sample exactly on a neighbor's inflated
            // sphere is buried, so coincident spheres occlude each other.
            let buried = neighbors
                .iter()
                .any(|n| (sample - n.position).norm_squared() <= radius * radius);
            if !buried {
                mesh.points.push(sample);
                mesh.total_area += point_area;
            }
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_approx_equal(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    fn entry_at(index: usize, x: f64, y: f64, z: f64) -> AtomRecord {
        AtomRecord::new(index, "CA", "ALA", "A", index as i32, Point3::new(x, y, z))
    }

    #[test]
    fn spiral_points_lie_on_the_unit_sphere() {
        for p in golden_spiral(64) {
            assert!(f64_approx_equal(p.norm(), 1.0, 1e-12));
        }
    }

    #[test]
    fn isolated_sphere_is_fully_exposed() {
        let config = MeshConfig::default();
        let mesh = sample_surface(&[entry_at(0, 0.0, 0.0, 0.0)], &config);
        assert_eq!(mesh.points.len(), config.n_points);
        let r = UNITED_RADIUS + config.probe_radius;
        let expected = 4.0 * std::f64::consts::PI * r * r;
        assert!(f64_approx_equal(mesh.total_area, expected, 1e-9));
    }

    #[test]
    fn distant_spheres_do_not_occlude_each_other() {
        let config = MeshConfig::default();
        let entries = [entry_at(0, 0.0, 0.0, 0.0), entry_at(1, 50.0, 0.0, 0.0)];
        let mesh = sample_surface(&entries, &config);
        assert_eq!(mesh.points.len(), 2 * config.n_points);
    }

    #[test]
    fn overlapping_spheres_bury_sample_points() {
        let config = MeshConfig {
            probe_radius: DEFAULT_PROBE_RADIUS,
            n_points: 100,
        };
        let entries = [entry_at(0, 0.0, 0.0, 0.0), entry_at(1, 2.0, 0.0, 0.0)];
        let mesh = sample_surface(&entries, &config);
        let r = UNITED_RADIUS + config.probe_radius;
        let two_full = 2.0 * 4.0 * std::f64::consts::PI * r * r;
        assert!(mesh.total_area < two_full);
        assert!(mesh.total_area > 0.0);
    }

    #[test]
    fn coincident_spheres_are_mutually_buried() {
        let config = MeshConfig::default();
        let entries = [entry_at(0, 0.0, 0.0, 0.0), entry_at(1, 0.0, 0.0, 0.0)];
        let mesh = sample_surface(&entries, &config);
        assert!(mesh.points.is_empty());
        assert_eq!(mesh.total_area, 0.0);
    }

    #[test]
    fn smaller_probe_exposes_more_of_a_dumbbell() {
        // Two spheres 3 Å apart. A sample at polar angle θ toward the
        // neighbor is buried iff cos θ > d/(2(R+probe)), so shrinking the
        // probe can only uncover points.
        let entries = [entry_at(0, 0.0, 0.0, 0.0), entry_at(1, 0.0, 0.0, 3.0)];
        let wide = MeshConfig {
            probe_radius: 1.0,
            n_points: 100,
        };
        let tight = MeshConfig {
            probe_radius: 0.1,
            n_points: 100,
        };
        let wide_mesh = sample_surface(&entries, &wide);
        let tight_mesh = sample_surface(&entries, &tight);
        assert!(tight_mesh.points.len() > wide_mesh.points.len());
    }

    #[test]
    fn empty_input_yields_empty_mesh() {
        let mesh = sample_surface(&[], &MeshConfig::default());
        assert!(mesh.points.is_empty());
    }
}
