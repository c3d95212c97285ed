//! Orientation: turn the envelope so that edge 0 faces the nearest frontage.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::envelope::SiteEnvelope;
use crate::geom2::{GeometryKernel, Polygon, Ray};

/// Traffic frontage near one site, split by street class.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontage {
    #[serde(default)]
    pub primary: Vec<Polygon>,
    #[serde(default)]
    pub secondary: Vec<Polygon>,
}

impl Frontage {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }
}

/// Envelope after orientation.
#[derive(Clone, Debug, PartialEq)]
pub struct Oriented {
    pub envelope: SiteEnvelope,
    /// Mean of the distinct envelope vertices.
    pub center: Vector2<f64>,
    /// Nearest frontage is secondary.
    pub sub: bool,
    /// Closest frontage point, if any frontage was given.
    pub target: Option<Vector2<f64>>,
}

/// Rotate `envelope` so that edge 0 is the first edge hit by the ray from the
/// centroid toward the closest frontage point.
///
/// Primary frontage is scanned first; secondary frontage replaces it only when
/// strictly closer. Without frontage, or when no edge is hit, the envelope is
/// returned unchanged.
pub fn resolve_orientation<K: GeometryKernel>(
    kernel: &K,
    envelope: SiteEnvelope,
    frontage: &Frontage,
) -> Oriented {
    let center = kernel.centroid_of_distinct_vertices(&envelope.polygon);
    let mut best: Option<(f64, Vector2<f64>, bool)> = None;
    let tagged = frontage
        .primary
        .iter()
        .map(|f| (f, false))
        .chain(frontage.secondary.iter().map(|f| (f, true)));
    for (line, sub) in tagged {
        let p = kernel.closest_point_on_polyline(center, line);
        let d2 = (p - center).norm_squared();
        if best.is_none_or(|(b, _, _)| d2 < b) {
            best = Some((d2, p, sub));
        }
    }
    let Some((_, target, sub)) = best else {
        debug!("no frontage; envelope kept as is");
        return Oriented {
            envelope,
            center,
            sub: false,
            target: None,
        };
    };

    let ray = Ray::through(center, target);
    let poly = &envelope.polygon;
    let hit = (0..poly.num_segments())
        .find(|&i| kernel.ray_intersects_segment(&ray, &poly.segment(i)));
    let envelope = match hit {
        Some(0) | None => envelope,
        Some(i) => envelope.rotated_to(i),
    };
    debug!(?hit, sub, "envelope oriented toward frontage");
    Oriented {
        envelope,
        center,
        sub,
        target: Some(target),
    }
}
