//! Batch driver for the subdivision engine: divide until the pool is empty,
//! then plan a shop on every shop-ready parcel.

use rand::Rng;
use serde::Serialize;
use siteplan::shop::{plan_shop, Frontage, ShopPlan};
use siteplan::subdivision::{DivideStrategy, Parcel, Selection, SubdivisionEngine};
use siteplan::{GeometryKernel, PlanCfg, Polygon, SiteError};

#[derive(Debug, Serialize)]
pub struct PlannedParcel {
    pub group: usize,
    pub plan: ShopPlan,
}

#[derive(Debug, Serialize)]
pub struct FailedParcel {
    pub group: usize,
    pub polygon: Polygon,
    pub reason: String,
}

/// Everything `cli subdivide` writes.
#[derive(Debug, Serialize)]
pub struct DrainOutput {
    pub rounds: usize,
    /// Pool empty when the loop stopped.
    pub drained: bool,
    pub pool: Vec<Vec<Polygon>>,
    pub invalid: Vec<Parcel>,
    pub shop_ready: Vec<Parcel>,
    /// Parcels neither strategy could divide.
    pub stuck: Vec<FailedParcel>,
    pub plans: Vec<PlannedParcel>,
    pub failed_plans: Vec<FailedParcel>,
}

/// First pooled parcel, groups ascending, skipping parcels already known to be stuck.
fn next_selection<K: GeometryKernel>(
    engine: &SubdivisionEngine<K>,
    stuck: &[FailedParcel],
) -> Option<Selection> {
    engine.groups().iter().enumerate().find_map(|(g, parcels)| {
        parcels
            .iter()
            .position(|p| !stuck.iter().any(|s| s.group == g && s.polygon == *p))
            .and_then(|i| engine.select_at(g, i))
    })
}

/// Divide one selection with `strategy`; a failed side-strip falls back to the bounding box.
fn divide_with_fallback<K: GeometryKernel>(
    engine: &mut SubdivisionEngine<K>,
    strategy: DivideStrategy,
    sel: &Selection,
) -> Result<(), SiteError> {
    match engine.divide(strategy, Some(sel)) {
        Ok(_) => Ok(()),
        Err(e) if strategy == DivideStrategy::SideStrip => {
            tracing::debug!(group = sel.group, error = %e, "side-strip failed; trying bounding box");
            engine.divide(DivideStrategy::BoundingBox, Some(sel)).map(|_| ())
        }
        Err(e) => Err(e),
    }
}

/// Run up to `max_rounds` divides, then plan shops on the shop-ready tier.
///
/// Frontage per shop-ready parcel: the traffic polygon of its group as primary,
/// `sub_traffic` as secondary.
pub fn drain<K: GeometryKernel, R: Rng>(
    mut engine: SubdivisionEngine<K>,
    strategy: DivideStrategy,
    max_rounds: usize,
    sub_traffic: &[Polygon],
    cfg: &PlanCfg,
    rng: &mut R,
) -> DrainOutput {
    let mut stuck: Vec<FailedParcel> = Vec::new();
    let mut rounds = 0;
    while rounds < max_rounds {
        let Some(sel) = next_selection(&engine, &stuck) else {
            break;
        };
        rounds += 1;
        if let Err(e) = divide_with_fallback(&mut engine, strategy, &sel) {
            tracing::warn!(group = sel.group, error = %e, "parcel left in pool");
            stuck.push(FailedParcel {
                group: sel.group,
                polygon: sel.parcel,
                reason: e.to_string(),
            });
        }
    }
    tracing::info!(
        rounds,
        pooled = engine.pooled_count(),
        shop_ready = engine.shop_ready().len(),
        invalid = engine.invalid().len(),
        "subdivision finished"
    );

    let mut plans = Vec::new();
    let mut failed_plans = Vec::new();
    for parcel in engine.shop_ready() {
        let frontage = Frontage {
            primary: vec![engine.traffic()[parcel.group].clone()],
            secondary: sub_traffic.to_vec(),
        };
        match plan_shop(engine.kernel(), &parcel.polygon, &frontage, cfg, rng) {
            Ok(plan) => plans.push(PlannedParcel {
                group: parcel.group,
                plan,
            }),
            Err(e) => {
                tracing::warn!(group = parcel.group, error = %e, "shop plan failed");
                failed_plans.push(FailedParcel {
                    group: parcel.group,
                    polygon: parcel.polygon.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    DrainOutput {
        rounds,
        drained: engine.pooled_count() == 0,
        pool: engine.groups().to_vec(),
        invalid: engine.invalid().to_vec(),
        shop_ready: engine.shop_ready().to_vec(),
        stuck,
        plans,
        failed_plans,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::rect(x0, y0, x1, y1).unwrap()
    }

    fn block_engine() -> SubdivisionEngine {
        SubdivisionEngine::with_defaults(
            vec![vec![rect(0.0, 0.0, 60.0, 40.0)]],
            vec![rect(-5.0, -6.0, 65.0, 0.0)],
        )
        .unwrap()
    }

    #[test]
    fn strip_strategy_drains_block_and_plans_every_shop_parcel() {
        let mut rng = StdRng::seed_from_u64(1);
        let out = drain(
            block_engine(),
            DivideStrategy::SideStrip,
            1000,
            &[],
            &PlanCfg::default(),
            &mut rng,
        );
        assert!(out.drained);
        assert!(out.stuck.is_empty());
        assert!(!out.shop_ready.is_empty());
        assert_eq!(out.plans.len() + out.failed_plans.len(), out.shop_ready.len());
    }

    #[test]
    fn round_limit_stops_early() {
        let mut rng = StdRng::seed_from_u64(1);
        let out = drain(
            block_engine(),
            DivideStrategy::BoundingBox,
            1,
            &[],
            &PlanCfg::default(),
            &mut rng,
        );
        assert_eq!(out.rounds, 1);
        // 2400 -> two halves of 1200, both back in the pool
        assert!(!out.drained);
        assert_eq!(out.pool[0].len(), 2);
    }

    #[test]
    fn box_strategy_never_touches_frontage() {
        let engine = SubdivisionEngine::with_defaults(
            vec![vec![rect(0.0, 0.0, 30.0, 30.0)]],
            vec![rect(100.0, 100.0, 101.0, 101.0)],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let out = drain(
            engine,
            DivideStrategy::BoundingBox,
            100,
            &[],
            &PlanCfg::default(),
            &mut rng,
        );
        assert!(out.drained);
        // 900 -> 450 + 450 -> four 225
        assert_eq!(out.shop_ready.len(), 4);
    }
}
