//! Shop massing for one site.
//!
//! Purpose
//! - Turn a raw site polygon and its nearby frontage into building footprints
//!   with floor counts and floor heights.
//!
//! Pipeline
//! - `envelope::generate_envelope`: bounding rectangle, then shrink (site fills
//!   its rectangle) or largest inscribed rectangle (irregular site).
//! - `orient::resolve_orientation`: rotate the envelope so edge 0 faces the
//!   nearest frontage; records whether that frontage is secondary (`sub`).
//! - `pattern::layout_bases`: one of three base patterns.
//! - `building::instantiate_buildings`: floors and heights per base.
//!
//! Why this design
//! - Each step is a free function over `&impl GeometryKernel` and an injected
//!   `Rng`, so steps can be tested alone and a plan is reproducible from a seed.
//! - Missing frontage is not an error; orientation keeps the identity.
//!
//! Code cross-refs: `cfg::{EnvelopeCfg, LayoutCfg, BuildingCfg}`, `subdivision` (feeds shop-ready parcels here)

mod building;
mod envelope;
mod orient;
mod pattern;

pub use building::{instantiate_buildings, Building};
pub use envelope::{generate_envelope, EnvelopeSource, SiteEnvelope};
pub use orient::{resolve_orientation, Frontage, Oriented};
pub use pattern::{layout_bases, select_pattern, BasePattern};

use nalgebra::Vector2;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::cfg::PlanCfg;
use crate::error::SiteError;
use crate::geom2::{GeometryKernel, Polygon};

/// Everything the shop pipeline produced for one site.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShopPlan {
    pub site: Polygon,
    pub envelope: SiteEnvelope,
    pub center: Vector2<f64>,
    pub sub: bool,
    pub pattern: BasePattern,
    pub bases: Vec<Polygon>,
    pub buildings: Vec<Building>,
}

impl ShopPlan {
    /// Sum of footprint areas.
    pub fn built_area<K: GeometryKernel>(&self, kernel: &K) -> f64 {
        self.bases.iter().map(|b| kernel.signed_area(b).abs()).sum()
    }
}

/// Run envelope → orientation → bases → buildings for one site.
pub fn plan_shop<K: GeometryKernel, R: Rng>(
    kernel: &K,
    site: &Polygon,
    frontage: &Frontage,
    cfg: &PlanCfg,
    rng: &mut R,
) -> Result<ShopPlan, SiteError> {
    let envelope = generate_envelope(kernel, site, &cfg.envelope)?;
    let oriented = resolve_orientation(kernel, envelope, frontage);
    let (pattern, bases) = layout_bases(kernel, &oriented.envelope.polygon, &cfg.layout, rng)?;
    let buildings = instantiate_buildings(&bases, oriented.sub, &cfg.building, rng);
    debug!(
        ?pattern,
        sub = oriented.sub,
        buildings = buildings.len(),
        "shop planned"
    );
    Ok(ShopPlan {
        site: site.clone(),
        envelope: oriented.envelope,
        center: oriented.center,
        sub: oriented.sub,
        pattern,
        bases,
        buildings,
    })
}

#[cfg(test)]
mod tests;
