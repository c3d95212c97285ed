//! Geometry kernel seam.
//!
//! The site pipeline only talks to `GeometryKernel`; `PlanarKernel` is the
//! default implementation on `nalgebra::Vector2<f64>`. All methods are pure.
//!
//! Failure convention: primitives return `Option`/empty `Vec` and the caller
//! decides which `SiteError` that becomes.

use nalgebra::Vector2;

use super::rect::{largest_inscribed_rect, minimum_bounding_rect, shrink_convex};
use super::subdivide::{bisect_recursive, strip_cut};
use super::types::{Polygon, Ray, Segment};
use super::util::{closest_on_segment, perp_dot, signed_area_open};
use crate::cfg::KernelCfg;

/// Geometry primitives consumed by the envelope pipeline and the subdivision engine.
pub trait GeometryKernel {
    /// Signed area, positive for counterclockwise rings.
    fn signed_area(&self, poly: &Polygon) -> f64;

    /// Mean of the distinct vertices (closing point excluded).
    fn centroid_of_distinct_vertices(&self, poly: &Polygon) -> Vector2<f64>;

    /// Closest point to `q` on the ring read as a polyline.
    fn closest_point_on_polyline(&self, q: Vector2<f64>, line: &Polygon) -> Vector2<f64>;

    /// Boundary-inclusive point containment.
    fn contains(&self, q: Vector2<f64>, poly: &Polygon) -> bool;

    /// Minimum-area bounding rectangle; `None` for collinear or near-zero-area input.
    fn minimum_bounding_rectangle(&self, poly: &Polygon) -> Option<Polygon>;

    /// Whether the half-line meets the closed segment.
    fn ray_intersects_segment(&self, ray: &Ray, seg: &Segment) -> bool;

    /// Largest rectangle inside `poly` whose long/short side ratio is `aspect_ratio`.
    fn largest_inscribed_rectangle(&self, poly: &Polygon, aspect_ratio: f64) -> Option<Polygon>;

    /// Offset the boundary inward by `margin`.
    fn shrink_inward(&self, poly: &Polygon, margin: f64) -> Option<Polygon>;

    /// Recursive bounding-box bisection with `min_cells` rounds (at least one).
    fn box_recursive_subdivide(&self, poly: &Polygon, min_cells: usize) -> Vec<Polygon>;

    /// Cut strips along the edges starting at `cut_indices`; the remaining core is emitted too.
    fn strip_cut_subdivide(&self, poly: &Polygon, cut_indices: &[usize]) -> Vec<Polygon>;

    /// Counterclockwise copy of the ring with consecutive duplicates removed.
    fn face_up(&self, poly: &Polygon) -> Polygon;
}

/// Default kernel: shoelace areas, even-odd containment with a boundary band,
/// rotating-frame OBB over the convex hull, half-space clipping for cuts.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlanarKernel {
    pub cfg: KernelCfg,
}

impl PlanarKernel {
    pub fn new(cfg: KernelCfg) -> Self {
        Self { cfg }
    }

    fn on_boundary(&self, q: Vector2<f64>, poly: &Polygon) -> bool {
        let tol = self.cfg.boundary_eps;
        poly.segments()
            .any(|s| (closest_on_segment(q, s.a, s.b) - q).norm() <= tol)
    }
}

impl GeometryKernel for PlanarKernel {
    fn signed_area(&self, poly: &Polygon) -> f64 {
        signed_area_open(poly.vertices())
    }

    fn centroid_of_distinct_vertices(&self, poly: &Polygon) -> Vector2<f64> {
        let verts = poly.vertices();
        let sum = verts.iter().fold(Vector2::zeros(), |acc, p| acc + p);
        sum / verts.len() as f64
    }

    fn closest_point_on_polyline(&self, q: Vector2<f64>, line: &Polygon) -> Vector2<f64> {
        let mut best = line.point(0);
        let mut best_d2 = f64::INFINITY;
        for s in line.segments() {
            let c = closest_on_segment(q, s.a, s.b);
            let d2 = (c - q).norm_squared();
            if d2 < best_d2 {
                best_d2 = d2;
                best = c;
            }
        }
        best
    }

    fn contains(&self, q: Vector2<f64>, poly: &Polygon) -> bool {
        if self.on_boundary(q, poly) {
            return true;
        }
        // even-odd crossing count on a +x ray
        let mut inside = false;
        for s in poly.segments() {
            let (a, b) = (s.a, s.b);
            if (a.y > q.y) != (b.y > q.y) {
                let x_at = a.x + (q.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if q.x < x_at {
                    inside = !inside;
                }
            }
        }
        inside
    }

    fn minimum_bounding_rectangle(&self, poly: &Polygon) -> Option<Polygon> {
        minimum_bounding_rect(poly.vertices(), self.cfg.eps)
    }

    fn ray_intersects_segment(&self, ray: &Ray, seg: &Segment) -> bool {
        let eps = self.cfg.eps;
        let e = seg.b - seg.a;
        let w = seg.a - ray.origin;
        let denom = perp_dot(ray.dir, e);
        if denom.abs() <= eps {
            // Parallel: only a collinear segment lying (partly) ahead counts.
            if perp_dot(w, ray.dir).abs() > eps {
                return false;
            }
            return w.dot(&ray.dir) >= -eps || (seg.b - ray.origin).dot(&ray.dir) >= -eps;
        }
        let t = perp_dot(w, e) / denom;
        let u = perp_dot(w, ray.dir) / denom;
        t >= -eps && (-eps..=1.0 + eps).contains(&u)
    }

    fn largest_inscribed_rectangle(&self, poly: &Polygon, aspect_ratio: f64) -> Option<Polygon> {
        largest_inscribed_rect(self, poly, aspect_ratio)
    }

    fn shrink_inward(&self, poly: &Polygon, margin: f64) -> Option<Polygon> {
        let up = self.face_up(poly);
        shrink_convex(up.vertices(), margin, self.cfg.eps)
    }

    fn box_recursive_subdivide(&self, poly: &Polygon, min_cells: usize) -> Vec<Polygon> {
        let up = self.face_up(poly);
        bisect_recursive(up.vertices(), min_cells.max(1), self.cfg.eps)
    }

    fn strip_cut_subdivide(&self, poly: &Polygon, cut_indices: &[usize]) -> Vec<Polygon> {
        strip_cut(
            poly.vertices(),
            cut_indices,
            self.cfg.strip_depth,
            self.cfg.strip_cell_width,
            self.cfg.eps,
        )
    }

    fn face_up(&self, poly: &Polygon) -> Polygon {
        let mut verts = poly.vertices().to_vec();
        verts.dedup_by(|a, b| (*a - *b).norm() < 1e-12);
        if verts.len() > 1 && (verts[0] - verts[verts.len() - 1]).norm() < 1e-12 {
            verts.pop();
        }
        if signed_area_open(&verts) < 0.0 {
            verts.reverse();
        }
        Polygon::new(verts).unwrap_or_else(|_| poly.clone())
    }
}
