use rand::Rng;
use serde::Serialize;

use crate::cfg::BuildingCfg;
use crate::geom2::Polygon;

/// One building on one base. Created once, never mutated.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Building {
    pub footprint: Polygon,
    pub floors: u32,
    pub floor_height: f64,
    pub basement: bool,
}

impl Building {
    /// Eave height above ground.
    pub fn height(&self) -> f64 {
        f64::from(self.floors) * self.floor_height
    }
}

/// One building per base; `sub` selects the secondary-street floor bands.
///
/// Draw order per base: floor count, then floor height.
pub fn instantiate_buildings<R: Rng>(
    bases: &[Polygon],
    sub: bool,
    cfg: &BuildingCfg,
    rng: &mut R,
) -> Vec<Building> {
    let (floors, height) = if sub {
        (cfg.secondary_floors, cfg.secondary_floor_height)
    } else {
        (cfg.primary_floors, cfg.primary_floor_height)
    };
    bases
        .iter()
        .map(|base| {
            let n = floors.sample(rng).round().max(0.0) as u32;
            Building {
                footprint: base.clone(),
                floors: n,
                floor_height: height.sample(rng),
                basement: cfg.basement,
            }
        })
        .collect()
}
