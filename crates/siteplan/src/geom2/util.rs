use nalgebra::Vector2;

use super::types::{Hs2, Polygon};

#[inline]
pub(crate) fn cross(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> f64 {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

/// 2D cross product (z-component) of two vectors.
#[inline]
pub(crate) fn perp_dot(u: Vector2<f64>, v: Vector2<f64>) -> f64 {
    u.x * v.y - u.y * v.x
}

/// Left normal of `d` (90° CCW).
#[inline]
pub(crate) fn left_normal(d: Vector2<f64>) -> Vector2<f64> {
    Vector2::new(-d.y, d.x)
}

/// Shoelace signed area of an open vertex loop (CCW positive).
pub(crate) fn signed_area_open(verts: &[Vector2<f64>]) -> f64 {
    let n = verts.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..n {
        let p = verts[i];
        let q = verts[(i + 1) % n];
        acc += p.x * q.y - q.x * p.y;
    }
    0.5 * acc
}

/// Andrew’s monotone chain convex hull: counterclockwise, collinear points
/// dropped, `None` unless at least three hull vertices remain.
pub(crate) fn convex_hull(points: &[Vector2<f64>]) -> Option<Vec<Vector2<f64>>> {
    if points.len() < 3 {
        return None;
    }
    let mut pts: Vec<_> = points.to_vec();
    pts.sort_by(|a, b| {
        match a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal) {
            std::cmp::Ordering::Equal => a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal),
            o => o,
        }
    });
    pts.dedup_by(|a, b| (*a - *b).norm() < 1e-12);
    if pts.len() < 3 {
        return None;
    }
    let mut lower: Vec<Vector2<f64>> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], *p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<Vector2<f64>> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], *p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    let mut hull = lower;
    hull.extend(upper);
    if hull.len() < 3 {
        return None;
    }
    Some(hull)
}

/// Sutherland–Hodgman clip of an open vertex loop against `h`.
///
/// For non-convex input the result may contain zero-width bridges and spikes,
/// but the enclosed area is exact, so complementary clips always partition the
/// input. [`simple_pieces`] untangles it.
pub(crate) fn clip_halfspace(verts: &[Vector2<f64>], h: &Hs2) -> Vec<Vector2<f64>> {
    let n = verts.len();
    let mut out = Vec::with_capacity(n + 2);
    for i in 0..n {
        let p = verts[i];
        let q = verts[(i + 1) % n];
        let ep = h.excess(p);
        let eq = h.excess(q);
        if ep <= 0.0 {
            out.push(p);
        }
        if (ep < 0.0 && eq > 0.0) || (ep > 0.0 && eq < 0.0) {
            let t = ep / (ep - eq);
            out.push(p + (q - p) * t);
        }
    }
    out.dedup_by(|a, b| (*a - *b).norm() < 1e-12);
    if out.len() > 1 && (out[0] - out[out.len() - 1]).norm() < 1e-12 {
        out.pop();
    }
    out
}

/// Points closer than this are one vertex when rings are untangled.
const SNAP: f64 = 1e-7;

/// Untangle a clip result into simple, connected counterclockwise loops.
///
/// Edges are split at every ring vertex lying on them, opposite edge pairs
/// (zero-width bridges and spikes) cancel, and the rest is relinked taking the
/// leftmost turn wherever several edges leave one point. Loops enclosing no
/// more than `min_area` are dropped.
pub(crate) fn simple_pieces(verts: &[Vector2<f64>], min_area: f64) -> Vec<Vec<Vector2<f64>>> {
    let same = |p: Vector2<f64>, q: Vector2<f64>| (p - q).norm() <= SNAP;
    let mut ring = verts.to_vec();
    ring.dedup_by(|a, b| same(*a, *b));
    while ring.len() > 1 && same(ring[0], ring[ring.len() - 1]) {
        ring.pop();
    }
    if ring.len() < 3 {
        return Vec::new();
    }
    if signed_area_open(&ring) < 0.0 {
        ring.reverse();
    }

    let n = ring.len();
    let mut edges: Vec<(Vector2<f64>, Vector2<f64>)> = Vec::with_capacity(n);
    for i in 0..n {
        let (a, b) = (ring[i], ring[(i + 1) % n]);
        let d = b - a;
        let len2 = d.norm_squared();
        let mut on_edge: Vec<(f64, Vector2<f64>)> = ring
            .iter()
            .filter_map(|&p| {
                let t = (p - a).dot(&d) / len2;
                (t > 0.0 && t < 1.0 && same(a + d * t, p)).then_some((t, p))
            })
            .collect();
        on_edge.sort_by(|x, y| x.0.total_cmp(&y.0));
        let mut from = a;
        for (_, p) in on_edge {
            if !same(from, p) {
                edges.push((from, p));
                from = p;
            }
        }
        if !same(from, b) {
            edges.push((from, b));
        }
    }

    let mut alive = vec![true; edges.len()];
    for i in 0..edges.len() {
        if !alive[i] {
            continue;
        }
        let (a, b) = edges[i];
        if let Some(j) = (i + 1..edges.len())
            .find(|&j| alive[j] && same(edges[j].0, b) && same(edges[j].1, a))
        {
            alive[i] = false;
            alive[j] = false;
        }
    }
    let edges: Vec<_> = edges
        .into_iter()
        .zip(alive)
        .filter_map(|(e, keep)| keep.then_some(e))
        .collect();

    let turn = |din: Vector2<f64>, dout: Vector2<f64>| perp_dot(din, dout).atan2(din.dot(&dout));
    let mut used = vec![false; edges.len()];
    let mut out = Vec::new();
    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let origin = edges[start].0;
        let mut piece = vec![origin];
        let mut cur = start;
        loop {
            let (a, b) = edges[cur];
            if same(b, origin) {
                break;
            }
            piece.push(b);
            let din = b - a;
            let next = (0..edges.len())
                .filter(|&k| !used[k] && same(edges[k].0, b))
                .max_by(|&x, &y| {
                    let tx = turn(din, edges[x].1 - edges[x].0);
                    let ty = turn(din, edges[y].1 - edges[y].0);
                    tx.total_cmp(&ty)
                });
            match next {
                Some(k) => {
                    used[k] = true;
                    cur = k;
                }
                None => break,
            }
        }
        let piece = drop_straight(piece);
        if piece.len() >= 3 && signed_area_open(&piece) > min_area {
            out.push(piece);
        }
    }
    out
}

/// Remove vertices where the ring runs straight on or folds straight back.
fn drop_straight(mut ring: Vec<Vector2<f64>>) -> Vec<Vector2<f64>> {
    loop {
        let before = ring.len();
        let mut i = 0;
        while ring.len() >= 3 && i < ring.len() {
            let n = ring.len();
            let u = ring[i] - ring[(i + n - 1) % n];
            let w = ring[(i + 1) % n] - ring[i];
            let (lu, lw) = (u.norm(), w.norm());
            if lu <= SNAP || lw <= SNAP || perp_dot(u, w).abs() <= 1e-9 * lu * lw {
                ring.remove(i);
                i = i.saturating_sub(1);
            } else {
                i += 1;
            }
        }
        if ring.len() == before || ring.len() < 3 {
            return ring;
        }
    }
}

/// Close every simple piece of a clip result into a `Polygon`.
pub(crate) fn solid_rings(verts: &[Vector2<f64>], min_area: f64) -> Vec<Polygon> {
    simple_pieces(verts, min_area)
        .into_iter()
        .filter_map(|piece| Polygon::new(piece).ok())
        .collect()
}

/// Closest point to `q` on segment `a → b`.
#[inline]
pub(crate) fn closest_on_segment(q: Vector2<f64>, a: Vector2<f64>, b: Vector2<f64>) -> Vector2<f64> {
    let d = b - a;
    let len2 = d.norm_squared();
    if len2 <= 0.0 {
        return a;
    }
    let t = ((q - a).dot(&d) / len2).clamp(0.0, 1.0);
    a + d * t
}

/// True if the open segments `p1p2` and `q1q2` cross at a single interior point.
pub(crate) fn segments_cross_properly(
    p1: Vector2<f64>,
    p2: Vector2<f64>,
    q1: Vector2<f64>,
    q2: Vector2<f64>,
    eps: f64,
) -> bool {
    let d1 = cross(q1, q2, p1);
    let d2 = cross(q1, q2, p2);
    let d3 = cross(p1, p2, q1);
    let d4 = cross(p1, p2, q2);
    ((d1 > eps && d2 < -eps) || (d1 < -eps && d2 > eps))
        && ((d3 > eps && d4 < -eps) || (d3 < -eps && d4 > eps))
}
