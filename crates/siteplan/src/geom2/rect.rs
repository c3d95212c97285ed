//! Rectangle primitives: minimum bounding rectangle, inward shrink, largest
//! inscribed rectangle at a fixed aspect ratio.
//!
//! All rectangles come out counterclockwise with edge 0 along the frame's
//! first axis.

use nalgebra::Vector2;

use super::kernel::{GeometryKernel, PlanarKernel};
use super::types::Polygon;
use super::util::{convex_hull, left_normal, perp_dot, segments_cross_properly, signed_area_open};

const REFINE_ROUNDS: usize = 12;

const NEIGHBOURS: [(f64, f64); 8] = [
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (1.0, 1.0),
    (1.0, -1.0),
    (-1.0, 1.0),
    (-1.0, -1.0),
];

/// Orthonormal frame `(u, v)` with `v` the left normal of `u`.
#[derive(Clone, Copy, Debug)]
struct Frame {
    u: Vector2<f64>,
    v: Vector2<f64>,
}

impl Frame {
    fn along(u: Vector2<f64>) -> Option<Self> {
        let len = u.norm();
        if !(len.is_finite()) || len <= 0.0 {
            return None;
        }
        let u = u / len;
        Some(Self {
            u,
            v: left_normal(u),
        })
    }

    #[inline]
    fn coords(&self, p: Vector2<f64>) -> (f64, f64) {
        (p.dot(&self.u), p.dot(&self.v))
    }

    #[inline]
    fn point(&self, a: f64, b: f64) -> Vector2<f64> {
        self.u * a + self.v * b
    }

    /// Extent `(umin, umax, vmin, vmax)` of the points in this frame.
    fn extent(&self, pts: &[Vector2<f64>]) -> (f64, f64, f64, f64) {
        let mut ext = (
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
        );
        for p in pts {
            let (a, b) = self.coords(*p);
            ext.0 = ext.0.min(a);
            ext.1 = ext.1.max(a);
            ext.2 = ext.2.min(b);
            ext.3 = ext.3.max(b);
        }
        ext
    }

    fn rect(&self, umin: f64, umax: f64, vmin: f64, vmax: f64) -> Option<Polygon> {
        Polygon::new(vec![
            self.point(umin, vmin),
            self.point(umax, vmin),
            self.point(umax, vmax),
            self.point(umin, vmax),
        ])
        .ok()
    }
}

/// Rotating-frame OBB: one candidate frame per convex-hull edge, keep the smallest area.
pub(crate) fn minimum_bounding_rect(verts: &[Vector2<f64>], eps: f64) -> Option<Polygon> {
    let hull = convex_hull(verts)?;
    if signed_area_open(&hull) <= eps {
        return None;
    }
    let mut best: Option<(f64, Frame, (f64, f64, f64, f64))> = None;
    for k in 0..hull.len() {
        let Some(frame) = Frame::along(hull[(k + 1) % hull.len()] - hull[k]) else {
            continue;
        };
        let ext = frame.extent(&hull);
        let area = (ext.1 - ext.0) * (ext.3 - ext.2);
        if best.as_ref().is_none_or(|(a, _, _)| area < *a) {
            best = Some((area, frame, ext));
        }
    }
    let (area, frame, (umin, umax, vmin, vmax)) = best?;
    if area <= eps {
        return None;
    }
    frame.rect(umin, umax, vmin, vmax)
}

/// Offset every edge line of a counterclockwise convex loop inward by `margin`.
///
/// Exact for convex input. Returns `None` when the margin collapses the loop.
pub(crate) fn shrink_convex(verts: &[Vector2<f64>], margin: f64, eps: f64) -> Option<Polygon> {
    let n = verts.len();
    if n < 3 {
        return None;
    }
    let lines: Vec<(Vector2<f64>, Vector2<f64>)> = (0..n)
        .filter_map(|i| {
            let d = verts[(i + 1) % n] - verts[i];
            let len = d.norm();
            (len > eps).then(|| {
                let dir = d / len;
                (verts[i] + left_normal(dir) * margin, dir)
            })
        })
        .collect();
    let m = lines.len();
    if m < 3 {
        return None;
    }
    let mut out = Vec::with_capacity(m);
    for i in 0..m {
        let (p, d1) = lines[(i + m - 1) % m];
        let (q, d2) = lines[i];
        let denom = perp_dot(d1, d2);
        if denom.abs() <= eps {
            // collinear neighbours: the offset start point is the corner
            out.push(q);
            continue;
        }
        let s = perp_dot(q - p, d2) / denom;
        out.push(p + d1 * s);
    }
    // Inverted edges mean the margin exceeded the inradius.
    for i in 0..m {
        let e = out[(i + 1) % m] - out[i];
        if e.dot(&lines[i].1) < -eps {
            return None;
        }
    }
    if signed_area_open(&out) <= eps {
        return None;
    }
    Polygon::new(out).ok()
}

/// Largest rectangle with long/short ratio `aspect_ratio`, aligned with the OBB long axis.
///
/// Grid of candidate centers inside the polygon, bisection on the scale for
/// each, then a shrinking pattern search around the best center.
pub(crate) fn largest_inscribed_rect(
    kernel: &PlanarKernel,
    poly: &Polygon,
    aspect_ratio: f64,
) -> Option<Polygon> {
    let cfg = kernel.cfg;
    if !(aspect_ratio.is_finite()) || aspect_ratio <= 0.0 {
        return None;
    }
    let ratio = if aspect_ratio < 1.0 {
        1.0 / aspect_ratio
    } else {
        aspect_ratio
    };
    let up = kernel.face_up(poly);
    let obb = minimum_bounding_rect(up.vertices(), cfg.eps)?;
    let c = obb.vertices();
    let (e0, e1) = (c[1] - c[0], c[2] - c[1]);
    let frame = Frame::along(if e0.norm() >= e1.norm() { e0 } else { e1 })?;
    let (umin, umax, vmin, vmax) = frame.extent(c);
    let (lu, lv) = (umax - umin, vmax - vmin);
    let s_max = lv.min(lu / ratio);

    let g = cfg.inscribed_grid.max(1);
    let mut centers = Vec::with_capacity(g * g + 1);
    centers.push(kernel.centroid_of_distinct_vertices(&up));
    for i in 0..g {
        for j in 0..g {
            let a = umin + (i as f64 + 0.5) / g as f64 * lu;
            let b = vmin + (j as f64 + 0.5) / g as f64 * lv;
            centers.push(frame.point(a, b));
        }
    }

    let max_scale = |center: Vector2<f64>| -> Option<f64> {
        if !kernel.contains(center, &up) {
            return None;
        }
        let (mut lo, mut hi) = (0.0, s_max);
        for _ in 0..cfg.inscribed_iters {
            let mid = 0.5 * (lo + hi);
            if rect_fits(kernel, &up, &frame, center, mid * ratio, mid) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Some(lo)
    };

    let mut best: Option<(f64, Vector2<f64>)> = None;
    for center in centers {
        let Some(s) = max_scale(center) else {
            continue;
        };
        if best.as_ref().is_none_or(|(b, _)| s > *b) {
            best = Some((s, center));
        }
    }
    let (mut s, mut center) = best?;

    // Pattern search around the best grid center, halving the step each round.
    let (mut du, mut dv) = (lu / g as f64, lv / g as f64);
    for _ in 0..REFINE_ROUNDS {
        for (a, b) in NEIGHBOURS {
            let cand = center + frame.point(a * du, b * dv);
            if let Some(sc) = max_scale(cand) {
                if sc > s {
                    s = sc;
                    center = cand;
                }
            }
        }
        du *= 0.5;
        dv *= 0.5;
    }
    if s <= cfg.eps.sqrt() {
        return None;
    }
    let (cu, cv) = frame.coords(center);
    let (hw, hh) = (0.5 * s * ratio, 0.5 * s);
    frame.rect(cu - hw, cu + hw, cv - hh, cv + hh)
}

fn rect_fits(
    kernel: &PlanarKernel,
    poly: &Polygon,
    frame: &Frame,
    center: Vector2<f64>,
    width: f64,
    height: f64,
) -> bool {
    let eps = kernel.cfg.eps;
    let (cu, cv) = frame.coords(center);
    let (hw, hh) = (0.5 * width, 0.5 * height);
    let corners = [
        frame.point(cu - hw, cv - hh),
        frame.point(cu + hw, cv - hh),
        frame.point(cu + hw, cv + hh),
        frame.point(cu - hw, cv + hh),
    ];
    if !corners.iter().all(|p| kernel.contains(*p, poly)) {
        return false;
    }
    for p in poly.vertices() {
        let (a, b) = frame.coords(*p);
        if (a - cu).abs() < hw - eps && (b - cv).abs() < hh - eps {
            return false;
        }
    }
    poly.segments().all(|s| {
        (0..4).all(|k| !segments_cross_properly(s.a, s.b, corners[k], corners[(k + 1) % 4], eps))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn obb_of_axis_square_is_itself() {
        let sq = [
            vector![0.0, 0.0],
            vector![20.0, 0.0],
            vector![20.0, 20.0],
            vector![0.0, 20.0],
        ];
        let r = minimum_bounding_rect(&sq, 1e-9).unwrap();
        assert!(r.is_rectangular());
        assert!((signed_area_open(r.vertices()) - 400.0).abs() < 1e-9);
    }

    #[test]
    fn obb_of_rotated_rectangle_recovers_area() {
        let th: f64 = 0.4;
        let (u, v) = (vector![th.cos(), th.sin()], vector![-th.sin(), th.cos()]);
        let pts = [
            vector![0.0, 0.0],
            u * 30.0,
            u * 30.0 + v * 10.0,
            u * 15.0 + v * 14.0,
            v * 10.0,
        ];
        let r = minimum_bounding_rect(&pts, 1e-9).unwrap();
        let area = signed_area_open(r.vertices());
        assert!(area > 0.0);
        assert!(area <= 30.0 * 14.0 + 1e-6, "area {area}");
    }

    #[test]
    fn shrink_square_by_half_unit() {
        let sq = [
            vector![0.0, 0.0],
            vector![20.0, 0.0],
            vector![20.0, 20.0],
            vector![0.0, 20.0],
        ];
        let r = shrink_convex(&sq, 0.5, 1e-9).unwrap();
        assert!((signed_area_open(r.vertices()) - 361.0).abs() < 1e-9);
        assert!((r.point(0) - vector![0.5, 0.5]).norm() < 1e-12);
        assert!(shrink_convex(&sq, 11.0, 1e-9).is_none());
    }
}
