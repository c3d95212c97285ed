//! Envelope generation: raw site polygon → buildable rectangle.

use nalgebra::Vector2;
use serde::Serialize;
use tracing::debug;

use crate::cfg::EnvelopeCfg;
use crate::error::SiteError;
use crate::geom2::{GeometryKernel, Polygon};

/// How the envelope was derived from the site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeSource {
    /// The site filled its bounding rectangle; the rectangle was shrunk inward.
    ShrunkBounds,
    /// Largest inscribed rectangle at the bounding rectangle's aspect ratio.
    Inscribed,
}

/// Buildable rectangle of one site plus its direction marker.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SiteEnvelope {
    pub polygon: Polygon,
    /// Midpoint of edge 0.
    pub marker: Vector2<f64>,
    pub source: EnvelopeSource,
}

impl SiteEnvelope {
    pub fn new(polygon: Polygon, source: EnvelopeSource) -> Self {
        let marker = polygon.segment(0).center();
        Self {
            polygon,
            marker,
            source,
        }
    }

    /// Same envelope with the vertex sequence starting at `start`; the marker follows edge 0.
    pub fn rotated_to(&self, start: usize) -> Self {
        Self::new(self.polygon.rotated_to(start), self.source)
    }
}

/// Derive the envelope of `site`.
///
/// Errors: `DegenerateGeometry` when the bounding rectangle is not 4-sided or
/// when the shrink / inscribed-rectangle primitive yields nothing.
pub fn generate_envelope<K: GeometryKernel>(
    kernel: &K,
    site: &Polygon,
    cfg: &EnvelopeCfg,
) -> Result<SiteEnvelope, SiteError> {
    let obb = kernel
        .minimum_bounding_rectangle(site)
        .filter(Polygon::is_rectangular)
        .ok_or_else(|| SiteError::degenerate("site has no 4-sided bounding rectangle"))?;
    let obb_area = kernel.signed_area(&obb).abs();
    if obb_area <= 0.0 {
        return Err(SiteError::degenerate("bounding rectangle has zero area"));
    }
    let fill = kernel.signed_area(site).abs() / obb_area;

    if fill > cfg.rect_fill_ratio {
        let polygon = kernel
            .shrink_inward(&obb, cfg.shrink_margin)
            .ok_or_else(|| {
                SiteError::degenerate(format!(
                    "shrinking by {} collapses the bounding rectangle",
                    cfg.shrink_margin
                ))
            })?;
        debug!(fill, "envelope from shrunk bounding rectangle");
        return Ok(SiteEnvelope::new(polygon, EnvelopeSource::ShrunkBounds));
    }

    let (e0, e1) = (obb.segment(0).length(), obb.segment(1).length());
    let ratio = e0.max(e1) / e0.min(e1);
    let polygon = kernel
        .largest_inscribed_rectangle(site, ratio)
        .ok_or_else(|| SiteError::degenerate("no inscribed rectangle"))?;
    debug!(fill, ratio, "envelope from inscribed rectangle");
    Ok(SiteEnvelope::new(polygon, EnvelopeSource::Inscribed))
}
