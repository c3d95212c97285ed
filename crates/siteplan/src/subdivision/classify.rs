use serde::{Deserialize, Serialize};

use crate::cfg::TierCfg;
use crate::geom2::{GeometryKernel, Polygon};

/// Area tier of a subdivision output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Too small to build on; kept for reporting.
    Invalid,
    /// Ready for the shop pipeline.
    ShopReady,
    /// Too large; goes back to the pool of its group.
    Repooled,
}

/// Tier of a parcel with area `area` (sign ignored).
///
/// `[0, invalid_below)` invalid, `[invalid_below, repool_at)` shop-ready,
/// `[repool_at, ∞)` re-pooled. Non-finite areas are invalid.
pub fn classify(area: f64, tiers: &TierCfg) -> Tier {
    let area = area.abs();
    if !area.is_finite() || area < tiers.invalid_below {
        Tier::Invalid
    } else if area < tiers.repool_at {
        Tier::ShopReady
    } else {
        Tier::Repooled
    }
}

pub fn classify_polygon<K: GeometryKernel>(kernel: &K, parcel: &Polygon, tiers: &TierCfg) -> Tier {
    classify(kernel.signed_area(parcel), tiers)
}
