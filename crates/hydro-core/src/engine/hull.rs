use crate::engine::error::GeometryError;
use nalgebra::{Point3, Vector3};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Scalar summary of a convex hull: what the hydrodynamics calculator
/// consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullMetrics {
    /// Total facet area in Å².
    pub area: f64,
    /// Enclosed volume in Å³.
    pub volume: f64,
    /// Maximum distance between any two hull vertices in Å.
    pub dmax: f64,
}

/// Computes convex-hull metrics for a 3D point cloud.
///
/// The backend is chosen once at configuration time; per-point-cloud results
/// from any two backends agree to within floating-point noise.
pub trait HullBackend {
    /// # Errors
    ///
    /// Returns [`GeometryError`] when the point set admits no 3D hull or the
    /// backend itself fails.
    fn compute(&self, points: &[Point3<f64>]) -> Result<HullMetrics, GeometryError>;
}

/// Largest pairwise distance among hull vertices. Hull vertex counts are
/// small, so the quadratic scan is fine.
fn max_pairwise_distance(vertices: &[Point3<f64>]) -> f64 {
    let mut dmax = 0.0_f64;
    for (i, a) in vertices.iter().enumerate() {
        for b in &vertices[i + 1..] {
            dmax = dmax.max((a - b).norm());
        }
    }
    dmax
}

/// In-process quickhull implementation. The default backend: deterministic,
/// no external binary required.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickHull;

/// Triangular facet with an outward orientation and the unassigned points
/// strictly above it.
struct Facet {
    vertices: [usize; 3],
    normal: Vector3<f64>,
    offset: f64,
    outside: Vec<usize>,
    alive: bool,
}

impl Facet {
    fn new(a: usize, b: usize, c: usize, points: &[Point3<f64>], interior: &Point3<f64>) -> Self {
        let (pa, pb, pc) = (points[a], points[b], points[c]);
        let cross = (pb - pa).cross(&(pc - pa));
        // Unit normal keeps plane distances commensurate with the epsilon.
        let mut normal = if cross.norm() > f64::EPSILON {
            cross.normalize()
        } else {
            cross
        };
        let mut vertices = [a, b, c];
        // Orient away from the hull interior.
        if normal.dot(&(interior - pa)) > 0.0 {
            normal = -normal;
            vertices.swap(1, 2);
        }
        let offset = normal.dot(&pa.coords);
        Facet {
            vertices,
            normal,
            offset,
            outside: Vec::new(),
            alive: true,
        }
    }

    fn distance(&self, p: &Point3<f64>) -> f64 {
        self.normal.dot(&p.coords) - self.offset
    }
}

impl QuickHull {
    /// Picks four non-coplanar seed points: the farthest pair among the six
    /// axis extremes, the point farthest from that line, and the point
    /// farthest from the resulting plane.
    fn initial_simplex(points: &[Point3<f64>], eps: f64) -> Result<[usize; 4], GeometryError> {
        let mut extremes = [0usize; 6];
        for (i, p) in points.iter().enumerate() {
            for axis in 0..3 {
                if p.coords[axis] < points[extremes[axis]].coords[axis] {
                    extremes[axis] = i;
                }
                if p.coords[axis] > points[extremes[axis + 3]].coords[axis] {
                    extremes[axis + 3] = i;
                }
            }
        }

        let (mut v0, mut v1, mut best) = (extremes[0], extremes[3], -1.0_f64);
        for &a in &extremes {
            for &b in &extremes {
                let d = (points[a] - points[b]).norm_squared();
                if d > best {
                    best = d;
                    v0 = a;
                    v1 = b;
                }
            }
        }
        if best.sqrt() <= eps {
            return Err(GeometryError::Degenerate);
        }

        let axis = (points[v1] - points[v0]).normalize();
        let (mut v2, mut best) = (v0, -1.0_f64);
        for (i, p) in points.iter().enumerate() {
            let rel = p - points[v0];
            let d = (rel - axis * rel.dot(&axis)).norm_squared();
            if d > best {
                best = d;
                v2 = i;
            }
        }
        if best.sqrt() <= eps {
            return Err(GeometryError::Degenerate);
        }

        let normal = (points[v1] - points[v0])
            .cross(&(points[v2] - points[v0]))
            .normalize();
        let (mut v3, mut best) = (v0, -1.0_f64);
        for (i, p) in points.iter().enumerate() {
            let d = normal.dot(&(p - points[v0])).abs();
            if d > best {
                best = d;
                v3 = i;
            }
        }
        if best <= eps {
            return Err(GeometryError::Degenerate);
        }

        Ok([v0, v1, v2, v3])
    }

    fn facets(points: &[Point3<f64>]) -> Result<Vec<Facet>, GeometryError> {
        if points.len() < 4 {
            return Err(GeometryError::TooFewPoints(points.len()));
        }

        let span = {
            let mut min = points[0];
            let mut max = points[0];
            for p in points {
                min = min.inf(p);
                max = max.sup(p);
            }
            (max - min).norm()
        };
        let eps = 1e-10 * span.max(1.0);

        let [a, b, c, d] = Self::initial_simplex(points, eps)?;
        let interior = Point3::from(
            (points[a].coords + points[b].coords + points[c].coords + points[d].coords) / 4.0,
        );

        let mut facets = vec![
            Facet::new(a, b, c, points, &interior),
            Facet::new(a, b, d, points, &interior),
            Facet::new(a, c, d, points, &interior),
            Facet::new(b, c, d, points, &interior),
        ];

        // Each remaining point goes to the first facet that sees it; points
        // inside the simplex are discarded here and never revisited.
        for (i, p) in points.iter().enumerate() {
            if i == a || i == b || i == c || i == d {
                continue;
            }
            for facet in &mut facets {
                if facet.distance(p) > eps {
                    facet.outside.push(i);
                    break;
                }
            }
        }

        loop {
            let Some(fi) = facets.iter().position(|f| f.alive && !f.outside.is_empty()) else {
                break;
            };
            let apex = *facets[fi]
                .outside
                .iter()
                .max_by(|&&x, &&y| {
                    facets[fi]
                        .distance(&points[x])
                        .total_cmp(&facets[fi].distance(&points[y]))
                })
                .ok_or(GeometryError::Degenerate)?;
            let apex_point = points[apex];

            let visible: Vec<usize> = facets
                .iter()
                .enumerate()
                .filter(|(_, f)| f.alive && f.distance(&apex_point) > eps)
                .map(|(i, _)| i)
                .collect();

            // Horizon edges appear in exactly one visible facet.
            let mut edges: Vec<(usize, usize)> = Vec::new();
            for &vi in &visible {
                let [p, q, r] = facets[vi].vertices;
                for edge in [(p, q), (q, r), (r, p)] {
                    let reversed = (edge.1, edge.0);
                    if let Some(pos) = edges.iter().position(|&e| e == reversed || e == edge) {
                        edges.swap_remove(pos);
                    } else {
                        edges.push(edge);
                    }
                }
            }

            let mut orphans: Vec<usize> = Vec::new();
            for &vi in &visible {
                facets[vi].alive = false;
                orphans.append(&mut facets[vi].outside);
            }

            for (p, q) in edges {
                let mut facet = Facet::new(p, q, apex, points, &interior);
                orphans.retain(|&o| {
                    if o != apex && facet.distance(&points[o]) > eps {
                        facet.outside.push(o);
                        false
                    } else {
                        true
                    }
                });
                facets.push(facet);
            }
        }

        facets.retain(|f| f.alive);
        Ok(facets)
    }
}

impl HullBackend for QuickHull {
    fn compute(&self, points: &[Point3<f64>]) -> Result<HullMetrics, GeometryError> {
        let facets = Self::facets(points)?;

        let mut area = 0.0;
        let mut volume = 0.0;
        let mut vertex_ids: Vec<usize> = Vec::new();
        for facet in &facets {
            let [a, b, c] = facet.vertices;
            let cross = (points[b] - points[a]).cross(&(points[c] - points[a]));
            area += cross.norm() / 2.0;
            // Signed tetrahedron volume against the origin; outward
            // orientation makes the sum the enclosed volume.
            volume += points[a]
                .coords
                .dot(&points[b].coords.cross(&points[c].coords))
                / 6.0;
            vertex_ids.extend_from_slice(&facet.vertices);
        }
        vertex_ids.sort_unstable();
        vertex_ids.dedup();
        let vertices: Vec<Point3<f64>> = vertex_ids.iter().map(|&i| points[i]).collect();

        Ok(HullMetrics {
            area,
            volume: volume.abs(),
            dmax: max_pairwise_distance(&vertices),
        })
    }
}

/// External backend that shells out to the `qconvex` program from the qhull
/// suite. Opt-in: the executable path is explicit configuration, never
/// discovered from the environment.
#[derive(Debug, Clone)]
pub struct QconvexBackend {
    pub executable: PathBuf,
}

impl QconvexBackend {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Serializes the point cloud in qhull's input format.
    fn input_for(points: &[Point3<f64>]) -> String {
        let mut input = format!("3\n{}\n", points.len());
        for p in points {
            input.push_str(&format!("{} {} {}\n", p.x, p.y, p.z));
        }
        input
    }

    fn run(&self, option: &str, input: &str) -> Result<String, GeometryError> {
        let mut child = Command::new(&self.executable)
            .arg(option)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| GeometryError::Backend(format!("failed to spawn qconvex: {e}")))?;
        if let Some(stdin) = child.stdin.take() {
            let mut stdin = stdin;
            stdin
                .write_all(input.as_bytes())
                .map_err(|e| GeometryError::Backend(format!("failed to write input: {e}")))?;
        }
        let output = child
            .wait_with_output()
            .map_err(|e| GeometryError::Backend(format!("qconvex did not finish: {e}")))?;
        if !output.status.success() {
            return Err(GeometryError::Backend(format!(
                "qconvex exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        String::from_utf8(output.stdout)
            .map_err(|e| GeometryError::Backend(format!("non-UTF-8 qconvex output: {e}")))
    }

    fn parse_summary(summary: &str) -> Result<(f64, f64), GeometryError> {
        let mut area = None;
        let mut volume = None;
        for line in summary.lines() {
            let line = line.trim();
            if let Some(rest) = line.strip_prefix("Total facet area:") {
                area = rest.trim().parse::<f64>().ok();
            } else if let Some(rest) = line
                .strip_prefix("Total volume:")
                .or_else(|| line.strip_prefix("Approximate volume:"))
            {
                volume = rest.trim().parse::<f64>().ok();
            }
        }
        match (area, volume) {
            (Some(a), Some(v)) => Ok((a, v)),
            _ => Err(GeometryError::Backend(
                "area/volume not found in qconvex FA output".into(),
            )),
        }
    }

    fn parse_vertices(listing: &str) -> Result<Vec<Point3<f64>>, GeometryError> {
        let bad = |line: &str| GeometryError::Backend(format!("bad qconvex p line: {line:?}"));
        // First line is the dimension, second the vertex count.
        let mut vertices = Vec::new();
        for line in listing.lines().skip(2) {
            let mut fields = line.split_whitespace();
            let mut coord = [0.0_f64; 3];
            for c in &mut coord {
                *c = fields
                    .next()
                    .ok_or_else(|| bad(line))?
                    .parse()
                    .map_err(|_| bad(line))?;
            }
            vertices.push(Point3::new(coord[0], coord[1], coord[2]));
        }
        Ok(vertices)
    }
}

impl HullBackend for QconvexBackend {
    fn compute(&self, points: &[Point3<f64>]) -> Result<HullMetrics, GeometryError> {
        if points.len() < 4 {
            return Err(GeometryError::TooFewPoints(points.len()));
        }
        let input = Self::input_for(points);
        let (area, volume) = Self::parse_summary(&self.run("FA", &input)?)?;
        let vertices = Self::parse_vertices(&self.run("p", &input)?)?;
        Ok(HullMetrics {
            area,
            volume,
            dmax: max_pairwise_distance(&vertices),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_approx_equal(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    fn unit_cube() -> Vec<Point3<f64>> {
        let mut points = Vec::new();
        for x in [0.0, 1.0] {
            for y in [0.0, 1.0] {
                for z in [0.0, 1.0] {
                    points.push(Point3::new(x, y, z));
                }
            }
        }
        points
    }

    #[test]
    fn cube_metrics_are_exact() {
        let metrics = QuickHull.compute(&unit_cube()).unwrap();
        assert!(f64_approx_equal(metrics.area, 6.0, 1e-9));
        assert!(f64_approx_equal(metrics.volume, 1.0, 1e-9));
        assert!(f64_approx_equal(metrics.dmax, 3.0_f64.sqrt(), 1e-9));
    }

    #[test]
    fn interior_points_do_not_change_the_hull() {
        let mut points = unit_cube();
        points.push(Point3::new(0.5, 0.5, 0.5));
        points.push(Point3::new(0.25, 0.75, 0.5));
        let metrics = QuickHull.compute(&points).unwrap();
        assert!(f64_approx_equal(metrics.volume, 1.0, 1e-9));
        assert!(f64_approx_equal(metrics.area, 6.0, 1e-9));
    }

    #[test]
    fn tetrahedron_volume_matches_closed_form() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            Point3::new(0.0, 0.0, 2.0),
        ];
        let metrics = QuickHull.compute(&points).unwrap();
        assert!(f64_approx_equal(metrics.volume, 8.0 / 6.0, 1e-9));
        assert!(f64_approx_equal(metrics.dmax, 8.0_f64.sqrt(), 1e-9));
    }

    #[test]
    fn translation_leaves_metrics_unchanged() {
        let base = QuickHull.compute(&unit_cube()).unwrap();
        let shifted: Vec<Point3<f64>> = unit_cube()
            .iter()
            .map(|p| p + Vector3::new(101.5, -44.0, 7.25))
            .collect();
        let moved = QuickHull.compute(&shifted).unwrap();
        assert!(f64_approx_equal(base.area, moved.area, 1e-7));
        assert!(f64_approx_equal(base.volume, moved.volume, 1e-7));
        assert!(f64_approx_equal(base.dmax, moved.dmax, 1e-7));
    }

    #[test]
    fn repeated_runs_are_bitwise_identical() {
        let points = unit_cube();
        let first = QuickHull.compute(&points).unwrap();
        let second = QuickHull.compute(&points).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn too_few_points_is_rejected() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        assert!(matches!(
            QuickHull.compute(&points),
            Err(GeometryError::TooFewPoints(3))
        ));
    }

    #[test]
    fn coplanar_points_are_degenerate() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.5, 0.5, 0.0),
        ];
        assert!(matches!(
            QuickHull.compute(&points),
            Err(GeometryError::Degenerate)
        ));
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let points: Vec<Point3<f64>> =
            (0..6).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect();
        assert!(matches!(
            QuickHull.compute(&points),
            Err(GeometryError::Degenerate)
        ));
    }

    #[test]
    fn qconvex_summary_parsing_extracts_area_and_volume() {
        let summary = "\nConvex hull of 8 points in 3-d:\n\n  Number of vertices: 8\n  Number of facets: 6\n\nStatistics for:  | qconvex FA\n\n  Total facet area:   6.0000\n  Total volume:       1.0000\n";
        let (area, volume) = QconvexBackend::parse_summary(summary).unwrap();
        assert!(f64_approx_equal(area, 6.0, 1e-12));
        assert!(f64_approx_equal(volume, 1.0, 1e-12));
    }

    #[test]
    fn qconvex_vertex_parsing_reads_coordinates() {
        let listing = "3\n2\n 0.0 0.0 0.0\n 1.0 2.0 3.0\n";
        let vertices = QconvexBackend::parse_vertices(listing).unwrap();
        assert_eq!(vertices.len(), 2);
        assert!(f64_approx_equal(vertices[1].z, 3.0, 1e-12));
    }
}
