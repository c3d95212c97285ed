//! Tuning parameters for the site pipeline.
//!
//! Units: lengths are site units (the frontage and site polygons share one
//! unit, usually metres); areas are square site units; ratios and
//! probabilities are dimensionless.
//!
//! Defaults reproduce the calibrated values of the shop-block study. Every
//! struct deserializes with `#[serde(default)]`, so a config file only needs
//! the fields it overrides.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Half-open sampling band `[lo, hi)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub lo: f64,
    pub hi: f64,
}

impl Band {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Uniform draw in `[lo, hi)` from a single `gen::<f64>()`; collapses to
    /// `lo` for an empty band, and for a draw that rounds up onto `hi`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.hi <= self.lo {
            return self.lo;
        }
        let x = self.lo + (self.hi - self.lo) * rng.gen::<f64>();
        if x < self.hi {
            x
        } else {
            self.lo
        }
    }

    /// The band scaled by `k` (e.g. a fraction band turned into lengths).
    pub fn scaled(&self, k: f64) -> Band {
        Band::new(self.lo * k, self.hi * k)
    }

    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.lo <= x && x < self.hi
    }
}

/// Envelope generation (raw site → buildable rectangle).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeCfg {
    /// `site area / OBB area` above which the site counts as already rectangular.
    pub rect_fill_ratio: f64,
    /// Inward margin applied to the OBB of a near-rectangular site (length).
    pub shrink_margin: f64,
}

impl Default for EnvelopeCfg {
    fn default() -> Self {
        Self {
            rect_fill_ratio: 0.95,
            shrink_margin: 0.5,
        }
    }
}

/// Building-base pattern selection and geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutCfg {
    /// Envelopes with `|area|` below this get a single full-footprint base (area).
    pub solo_area_below: f64,
    /// Uniform draws above this pick the solo pattern for wide envelopes.
    pub solo_draw_above: f64,
    /// Twin-strip base depth as a fraction of edge 1.
    pub twin_depth: Band,
    /// Diagonal-pair along-edge fraction of edge 0. Drawn but not applied.
    pub diagonal_along: Band,
    /// Diagonal-pair base depth as a fraction of edge 1.
    pub diagonal_depth: Band,
    /// Offset of the diagonal anchors before the edge midpoints (length).
    pub diagonal_gap: f64,
}

impl Default for LayoutCfg {
    fn default() -> Self {
        Self {
            solo_area_below: 150.0,
            solo_draw_above: 0.6,
            twin_depth: Band::new(0.30, 0.36),
            diagonal_along: Band::new(0.5, 0.7),
            diagonal_depth: Band::new(0.85, 1.0),
            diagonal_gap: 0.4,
        }
    }
}

/// Floor count and floor height per building.
///
/// Floor counts are drawn as reals in the band and rounded to the nearest integer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingCfg {
    pub primary_floors: Band,
    pub primary_floor_height: Band,
    pub secondary_floors: Band,
    pub secondary_floor_height: Band,
    pub basement: bool,
}

impl Default for BuildingCfg {
    fn default() -> Self {
        Self {
            primary_floors: Band::new(2.5, 3.5),
            primary_floor_height: Band::new(3.5, 4.0),
            secondary_floors: Band::new(1.5, 2.9),
            secondary_floor_height: Band::new(3.0, 3.5),
            basement: false,
        }
    }
}

/// Area tiers for subdivision output.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierCfg {
    /// Parcels below this area are unbuildable (area).
    pub invalid_below: f64,
    /// Parcels at or above this area go back to the pool (area).
    pub repool_at: f64,
}

impl Default for TierCfg {
    fn default() -> Self {
        Self {
            invalid_below: 50.0,
            repool_at: 400.0,
        }
    }
}

/// Subdivision engine parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubdivisionCfg {
    pub tiers: TierCfg,
    /// Bisection rounds of the bounding-box strategy (at least one).
    pub box_min_cells: usize,
}

impl Default for SubdivisionCfg {
    fn default() -> Self {
        Self {
            tiers: TierCfg::default(),
            box_min_cells: 1,
        }
    }
}

/// Tolerances and primitive parameters of `PlanarKernel`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelCfg {
    /// Determinant / area epsilon.
    pub eps: f64,
    /// Distance within which a point counts as on a polygon boundary.
    pub boundary_eps: f64,
    /// Depth of a frontage strip (length).
    pub strip_depth: f64,
    /// Target width of one strip cell along its frontage edge (length).
    pub strip_cell_width: f64,
    /// Candidate centers per axis for the inscribed-rectangle search.
    pub inscribed_grid: usize,
    /// Bisection steps on the rectangle scale per candidate center.
    pub inscribed_iters: usize,
}

impl Default for KernelCfg {
    fn default() -> Self {
        Self {
            eps: 1e-9,
            boundary_eps: 1e-6,
            strip_depth: 12.0,
            strip_cell_width: 15.0,
            inscribed_grid: 12,
            inscribed_iters: 40,
        }
    }
}

/// Everything the pipeline needs, as loaded from one config file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanCfg {
    pub envelope: EnvelopeCfg,
    pub layout: LayoutCfg,
    pub building: BuildingCfg,
    pub subdivision: SubdivisionCfg,
    pub kernel: KernelCfg,
}
