//! Basic 2D types: closed polygon rings, segments, rays, half-spaces.
//!
//! - `Polygon`: closed ring (first point repeated as last), at least three
//!   distinct vertices. Immutable; every derived ring is a new value.
//! - `Segment`, `Ray`: edge and half-line views used by orientation.
//! - `Hs2`: closed half-space `n·x <= c`, the clipping primitive behind
//!   subdivision.
//!
//! Code cross-refs: `kernel::GeometryKernel`, `util::clip_halfspace`

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::SiteError;

/// Closed polygon ring in the plane.
///
/// Invariants:
/// - `pts.first() == pts.last()` (exact copy of the first point).
/// - `pts.len() >= 4`, i.e. at least three distinct vertices.
/// - All coordinates finite.
///
/// Serializes as a JSON array of `[x, y]` pairs including the closing point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct Polygon {
    pts: Vec<Vector2<f64>>,
}

impl Polygon {
    /// Build a ring from points; closes it if the last point does not repeat the first.
    pub fn new(mut pts: Vec<Vector2<f64>>) -> Result<Self, SiteError> {
        if pts.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(SiteError::polygon("non-finite coordinate"));
        }
        let first = match pts.first() {
            Some(p) => *p,
            None => return Err(SiteError::polygon("no points")),
        };
        let closed = pts.len() > 1 && pts.last().is_some_and(|q| (q - first).norm() < 1e-12);
        if closed {
            let last = pts.len() - 1;
            pts[last] = first;
        } else {
            pts.push(first);
        }
        if pts.len() < 4 {
            return Err(SiteError::polygon(format!(
                "need at least 3 distinct vertices, got {}",
                pts.len() - 1
            )));
        }
        Ok(Self { pts })
    }

    /// Convenience constructor from coordinate pairs.
    pub fn from_xy(coords: &[(f64, f64)]) -> Result<Self, SiteError> {
        Self::new(coords.iter().map(|&(x, y)| Vector2::new(x, y)).collect())
    }

    /// Axis-aligned rectangle `[x0, x1] × [y0, y1]`, counterclockwise from `(x0, y0)`.
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Result<Self, SiteError> {
        Self::from_xy(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
    }

    /// All ring points, closing point included.
    #[inline]
    pub fn points(&self) -> &[Vector2<f64>] {
        &self.pts
    }

    /// Distinct vertices (closing point dropped).
    #[inline]
    pub fn vertices(&self) -> &[Vector2<f64>] {
        &self.pts[..self.pts.len() - 1]
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.pts.len()
    }

    #[inline]
    pub fn num_segments(&self) -> usize {
        self.pts.len() - 1
    }

    #[inline]
    pub fn point(&self, i: usize) -> Vector2<f64> {
        self.pts[i]
    }

    /// Edge `i` from vertex `i` to vertex `i + 1` (indices modulo the vertex count).
    #[inline]
    pub fn segment(&self, i: usize) -> Segment {
        let n = self.num_segments();
        Segment::new(self.pts[i % n], self.pts[i % n + 1])
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.pts.windows(2).map(|w| Segment::new(w[0], w[1]))
    }

    /// Four distinct corners plus the closing point.
    #[inline]
    pub fn is_rectangular(&self) -> bool {
        self.pts.len() == 5
    }

    /// Same ring started at vertex `start`, cyclic order preserved.
    pub fn rotated_to(&self, start: usize) -> Polygon {
        let verts = self.vertices();
        let n = verts.len();
        let mut pts: Vec<Vector2<f64>> = (0..n).map(|i| verts[(i + start) % n]).collect();
        pts.push(pts[0]);
        Polygon { pts }
    }

    /// Same ring with opposite orientation; vertex 0 is kept.
    pub fn reversed(&self) -> Polygon {
        let mut pts = self.pts.clone();
        pts.reverse();
        Polygon { pts }
    }
}

impl TryFrom<Vec<[f64; 2]>> for Polygon {
    type Error = SiteError;

    fn try_from(coords: Vec<[f64; 2]>) -> Result<Self, Self::Error> {
        Self::new(coords.into_iter().map(|[x, y]| Vector2::new(x, y)).collect())
    }
}

impl From<Polygon> for Vec<[f64; 2]> {
    fn from(poly: Polygon) -> Self {
        poly.pts.into_iter().map(|p| [p.x, p.y]).collect()
    }
}

/// Directed segment `a → b`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub a: Vector2<f64>,
    pub b: Vector2<f64>,
}

impl Segment {
    #[inline]
    pub fn new(a: Vector2<f64>, b: Vector2<f64>) -> Self {
        Self { a, b }
    }
    #[inline]
    pub fn length(&self) -> f64 {
        (self.b - self.a).norm()
    }
    /// Unit direction; zero for a degenerate segment.
    #[inline]
    pub fn direction(&self) -> Vector2<f64> {
        let d = self.b - self.a;
        let len = d.norm();
        if len > 0.0 {
            d / len
        } else {
            Vector2::zeros()
        }
    }
    /// Point at arc length `dist` from `a` toward `b`.
    #[inline]
    pub fn point_at(&self, dist: f64) -> Vector2<f64> {
        self.a + self.direction() * dist
    }
    #[inline]
    pub fn center(&self) -> Vector2<f64> {
        (self.a + self.b) * 0.5
    }
}

/// Half-line `origin + t·dir`, `t >= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vector2<f64>,
    pub dir: Vector2<f64>,
}

impl Ray {
    /// Ray from `from` through `toward`.
    #[inline]
    pub fn through(from: Vector2<f64>, toward: Vector2<f64>) -> Self {
        Self {
            origin: from,
            dir: toward - from,
        }
    }
}

/// Closed half-space `n·x <= c`; `n` need not be unit length.
#[derive(Clone, Copy, Debug)]
pub struct Hs2 {
    pub n: Vector2<f64>,
    pub c: f64,
}

impl Hs2 {
    #[inline]
    pub fn new(n: Vector2<f64>, c: f64) -> Self {
        Self { n, c }
    }
    /// Half-space bounded by the line through `p` with outward normal `n`.
    #[inline]
    pub fn through(p: Vector2<f64>, n: Vector2<f64>) -> Self {
        Self { n, c: n.dot(&p) }
    }
    /// Complementary closed half-space sharing the boundary line.
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            n: -self.n,
            c: -self.c,
        }
    }
    /// `n·p - c`; non-positive inside.
    #[inline]
    pub fn excess(&self, p: Vector2<f64>) -> f64 {
        self.n.dot(&p) - self.c
    }
}
