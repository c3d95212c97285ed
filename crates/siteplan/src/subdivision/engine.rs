//! Parcel pool, selection and the two divide strategies.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::classify::{classify, Tier};
use crate::cfg::SubdivisionCfg;
use crate::error::SiteError;
use crate::geom2::{GeometryKernel, PlanarKernel, Polygon};

/// A picked parcel and the traffic group it belongs to.
///
/// Plain value: divide calls take it by reference and never mutate it. Once a
/// divide has consumed the parcel, the selection is stale and further divides
/// with it are no-ops.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Selection {
    pub group: usize,
    pub parcel: Polygon,
}

impl Selection {
    /// Keep `prior` when a pick hit nothing.
    pub fn repick(prior: Option<Selection>, hit: Option<Selection>) -> Option<Selection> {
        hit.or(prior)
    }
}

/// Terminal parcel tagged with its originating group.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Parcel {
    pub group: usize,
    pub polygon: Polygon,
}

/// What one divide call produced, by tier.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DivideReport {
    pub group: usize,
    /// Area of the consumed parcel.
    pub parent_area: f64,
    pub invalid: Vec<Polygon>,
    pub shop_ready: Vec<Polygon>,
    pub repooled: Vec<Polygon>,
}

impl DivideReport {
    pub fn num_parcels(&self) -> usize {
        self.invalid.len() + self.shop_ready.len() + self.repooled.len()
    }

    /// Summed area over all three tiers.
    pub fn total_area<K: GeometryKernel>(&self, kernel: &K) -> f64 {
        self.invalid
            .iter()
            .chain(&self.shop_ready)
            .chain(&self.repooled)
            .map(|p| kernel.signed_area(p).abs())
            .sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivideStrategy {
    /// Strips cut along the edges that touch the group's traffic polygon.
    SideStrip,
    /// Recursive bisection of the bounding rectangle.
    BoundingBox,
}

/// Pool of parcels per traffic group plus the accumulated terminal tiers.
///
/// Invariants:
/// - `traffic.len() == pool.len()`; group `g` cuts along `traffic[g]`.
/// - Every pooled polygon sits in exactly one group.
/// - `invalid` and `shop_ready` only grow.
#[derive(Clone, Debug)]
pub struct SubdivisionEngine<K: GeometryKernel = PlanarKernel> {
    kernel: K,
    cfg: SubdivisionCfg,
    pool: Vec<Vec<Polygon>>,
    traffic: Vec<Polygon>,
    invalid: Vec<Parcel>,
    shop_ready: Vec<Parcel>,
}

impl SubdivisionEngine<PlanarKernel> {
    /// Engine over the default kernel and configuration.
    pub fn with_defaults(
        groups: Vec<Vec<Polygon>>,
        traffic: Vec<Polygon>,
    ) -> Result<Self, SiteError> {
        Self::new(groups, traffic, PlanarKernel::default(), SubdivisionCfg::default())
    }
}

impl<K: GeometryKernel> SubdivisionEngine<K> {
    /// Errors: `InvalidInput` when `traffic` is not aligned 1:1 with `groups`
    /// or the tier thresholds are out of order.
    pub fn new(
        groups: Vec<Vec<Polygon>>,
        traffic: Vec<Polygon>,
        kernel: K,
        cfg: SubdivisionCfg,
    ) -> Result<Self, SiteError> {
        if groups.len() != traffic.len() {
            return Err(SiteError::invalid(format!(
                "{} parcel groups but {} traffic polygons",
                groups.len(),
                traffic.len()
            )));
        }
        if !(0.0 <= cfg.tiers.invalid_below && cfg.tiers.invalid_below <= cfg.tiers.repool_at) {
            return Err(SiteError::invalid(format!(
                "tier thresholds out of order: {} / {}",
                cfg.tiers.invalid_below, cfg.tiers.repool_at
            )));
        }
        Ok(Self {
            kernel,
            cfg,
            pool: groups,
            traffic,
            invalid: Vec::new(),
            shop_ready: Vec::new(),
        })
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn cfg(&self) -> &SubdivisionCfg {
        &self.cfg
    }

    /// Pooled parcels per group.
    pub fn groups(&self) -> &[Vec<Polygon>] {
        &self.pool
    }

    pub fn traffic(&self) -> &[Polygon] {
        &self.traffic
    }

    pub fn invalid(&self) -> &[Parcel] {
        &self.invalid
    }

    pub fn shop_ready(&self) -> &[Parcel] {
        &self.shop_ready
    }

    pub fn pooled_count(&self) -> usize {
        self.pool.iter().map(Vec::len).sum()
    }

    /// First pooled parcel containing `(x, y)`, groups ascending, parcels in insertion order.
    pub fn pick(&self, x: f64, y: f64) -> Option<Selection> {
        let q = nalgebra::Vector2::new(x, y);
        self.pool.iter().enumerate().find_map(|(group, parcels)| {
            parcels
                .iter()
                .find(|p| self.kernel.contains(q, p))
                .map(|p| Selection {
                    group,
                    parcel: p.clone(),
                })
        })
    }

    /// Selection of the `index`-th pooled parcel of `group`.
    pub fn select_at(&self, group: usize, index: usize) -> Option<Selection> {
        let parcel = self.pool.get(group)?.get(index)?;
        Some(Selection {
            group,
            parcel: parcel.clone(),
        })
    }

    /// Whether `selection` still refers to a pooled parcel.
    pub fn is_live(&self, selection: &Selection) -> bool {
        self.position(selection).is_some()
    }

    fn position(&self, selection: &Selection) -> Option<usize> {
        self.pool
            .get(selection.group)?
            .iter()
            .position(|p| *p == selection.parcel)
    }

    pub fn divide(
        &mut self,
        strategy: DivideStrategy,
        selection: Option<&Selection>,
    ) -> Result<Option<DivideReport>, SiteError> {
        match strategy {
            DivideStrategy::SideStrip => self.divide_side_strip(selection),
            DivideStrategy::BoundingBox => self.divide_box(selection),
        }
    }

    /// Cut strips along the edges of the selected parcel that lie on its
    /// group's traffic polygon, classify the pieces and consume the parcel.
    ///
    /// `Ok(None)` without a selection or with a stale one. Errors:
    /// `DegenerateGeometry` when the strip primitive yields nothing (e.g. no
    /// edge touches the traffic polygon); the pool is left untouched then.
    pub fn divide_side_strip(
        &mut self,
        selection: Option<&Selection>,
    ) -> Result<Option<DivideReport>, SiteError> {
        let Some((sel, pos)) = self.resolve(selection) else {
            return Ok(None);
        };
        let up = self.kernel.face_up(&sel.parcel);
        let traffic = &self.traffic[sel.group];
        let marked: Vec<usize> = up
            .vertices()
            .iter()
            .enumerate()
            .filter(|(_, p)| self.kernel.contains(**p, traffic))
            .map(|(i, _)| i)
            .collect();
        let cuts = frontage_cut_indices(&marked, up.vertices().len());
        debug!(group = sel.group, ?marked, ?cuts, "side-strip cut positions");
        let parts = self.kernel.strip_cut_subdivide(&up, &cuts);
        self.commit(sel, pos, parts, DivideStrategy::SideStrip).map(Some)
    }

    /// Bisect the selected parcel's bounding rectangle, classify the pieces
    /// and consume the parcel.
    ///
    /// `Ok(None)` without a selection or with a stale one.
    pub fn divide_box(
        &mut self,
        selection: Option<&Selection>,
    ) -> Result<Option<DivideReport>, SiteError> {
        let Some((sel, pos)) = self.resolve(selection) else {
            return Ok(None);
        };
        let parts = self
            .kernel
            .box_recursive_subdivide(&sel.parcel, self.cfg.box_min_cells.max(1));
        self.commit(sel, pos, parts, DivideStrategy::BoundingBox).map(Some)
    }

    fn resolve<'s>(&self, selection: Option<&'s Selection>) -> Option<(&'s Selection, usize)> {
        let sel = selection?;
        match self.position(sel) {
            Some(pos) => Some((sel, pos)),
            None => {
                warn!(group = sel.group, "stale selection; divide skipped");
                None
            }
        }
    }

    fn commit(
        &mut self,
        sel: &Selection,
        pos: usize,
        parts: Vec<Polygon>,
        strategy: DivideStrategy,
    ) -> Result<DivideReport, SiteError> {
        if parts.is_empty() {
            warn!(group = sel.group, ?strategy, "divide produced no parcels");
            return Err(SiteError::degenerate(format!(
                "{strategy:?} divide produced no parcels"
            )));
        }
        let group = sel.group;
        let parent = self.pool[group].remove(pos);
        let mut report = DivideReport {
            group,
            parent_area: self.kernel.signed_area(&parent).abs(),
            ..DivideReport::default()
        };
        for polygon in parts {
            match classify(self.kernel.signed_area(&polygon), &self.cfg.tiers) {
                Tier::Invalid => {
                    report.invalid.push(polygon.clone());
                    self.invalid.push(Parcel { group, polygon });
                }
                Tier::ShopReady => {
                    report.shop_ready.push(polygon.clone());
                    self.shop_ready.push(Parcel { group, polygon });
                }
                Tier::Repooled => {
                    report.repooled.push(polygon.clone());
                    self.pool[group].push(polygon);
                }
            }
        }
        debug!(
            group,
            ?strategy,
            invalid = report.invalid.len(),
            shop_ready = report.shop_ready.len(),
            repooled = report.repooled.len(),
            "parcel divided"
        );
        Ok(report)
    }
}

/// Strip-cut positions from the sorted indices of vertices on the frontage.
///
/// Each entry is the start vertex of a frontage edge, so the list is one
/// shorter than `marked`. When the run wraps past vertex `n - 1` back to 0,
/// the tail after the first gap is moved in front of the head; with no gap
/// (every vertex marked) the list starts at vertex 1 instead. Fewer than two
/// marked vertices give no positions.
pub fn frontage_cut_indices(marked: &[usize], n: usize) -> Vec<usize> {
    if marked.len() < 2 {
        return Vec::new();
    }
    let wraps = marked[0] == 0 && marked[marked.len() - 1] + 1 == n;
    let gap = marked.windows(2).position(|w| w[1] != w[0] + 1);
    match (wraps, gap) {
        (true, Some(j)) => marked[j + 1..]
            .iter()
            .chain(&marked[..j])
            .copied()
            .collect(),
        (true, None) => marked[1..].to_vec(),
        (false, _) => marked[..marked.len() - 1].to_vec(),
    }
}
