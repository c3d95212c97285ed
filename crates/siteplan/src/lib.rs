//! Site parcel subdivision and shop footprint layout.
//!
//! Two pipelines share one planar geometry kernel:
//! - `shop`: raw site polygon → buildable envelope → frontage orientation →
//!   base pattern → buildings with floors and floor heights.
//! - `subdivision`: pools of block polygons → interactive pick/divide →
//!   parcels sorted into invalid / shop-ready / re-pooled tiers.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - Breaking changes are fine when they improve the design; callers live in
//!   this workspace (`crates/cli`).

pub mod cfg;
pub mod error;
pub mod geom2;
pub mod shop;
pub mod subdivision;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::PlanCfg;
pub use error::SiteError;
pub use geom2::{GeometryKernel, PlanarKernel, Polygon};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::{
        Band, BuildingCfg, EnvelopeCfg, KernelCfg, LayoutCfg, PlanCfg, SubdivisionCfg, TierCfg,
    };
    pub use crate::error::SiteError;
    pub use crate::geom2::{GeometryKernel, PlanarKernel, Polygon, Ray, Segment};
    pub use crate::shop::{plan_shop, BasePattern, Building, Frontage, ShopPlan, SiteEnvelope};
    pub use crate::subdivision::{classify, DivideReport, Selection, SubdivisionEngine, Tier};
    pub use nalgebra::Vector2 as Vec2;
}
