use super::*;
use crate::cfg::{BuildingCfg, EnvelopeCfg, LayoutCfg};
use crate::geom2::PlanarKernel;
use nalgebra::vector;
use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn kernel() -> PlanarKernel {
    PlanarKernel::default()
}

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
    Polygon::rect(x0, y0, x1, y1).unwrap()
}

fn closed(p: &Polygon) -> bool {
    p.num_points() >= 4 && p.point(0) == p.point(p.num_points() - 1)
}

fn y_range(p: &Polygon) -> (f64, f64) {
    p.vertices()
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v.y), hi.max(v.y))
        })
}

fn x_range(p: &Polygon) -> (f64, f64) {
    p.vertices()
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v.x), hi.max(v.x))
        })
}

fn assert_plan_closed(plan: &ShopPlan) {
    assert!(closed(&plan.envelope.polygon));
    for b in &plan.bases {
        assert!(closed(b));
    }
    for b in &plan.buildings {
        assert!(closed(&b.footprint));
    }
}

/// 10 x 40 site with primary frontage just above its short top edge.
fn narrow_site() -> (Polygon, Frontage) {
    let frontage = Frontage {
        primary: vec![rect(0.0, 41.0, 10.0, 47.0)],
        secondary: vec![rect(30.0, 0.0, 36.0, 40.0)],
    };
    (rect(0.0, 0.0, 10.0, 40.0), frontage)
}

#[test]
fn square_site_shrinks_its_bounding_rectangle() {
    let k = kernel();
    let env = generate_envelope(&k, &rect(0.0, 0.0, 20.0, 20.0), &EnvelopeCfg::default()).unwrap();
    assert_eq!(env.source, EnvelopeSource::ShrunkBounds);
    assert!(env.polygon.is_rectangular());
    assert!((k.signed_area(&env.polygon) - 361.0).abs() < 1e-9);
    assert!((env.polygon.point(0) - vector![0.5, 0.5]).norm() < 1e-12);
    assert!((env.marker - vector![10.0, 0.5]).norm() < 1e-12);
}

#[test]
fn irregular_site_gets_inscribed_envelope() {
    let k = kernel();
    let l = Polygon::from_xy(&[
        (0.0, 0.0),
        (40.0, 0.0),
        (40.0, 10.0),
        (10.0, 10.0),
        (10.0, 30.0),
        (0.0, 30.0),
    ])
    .unwrap();
    let env = generate_envelope(&k, &l, &EnvelopeCfg::default()).unwrap();
    assert_eq!(env.source, EnvelopeSource::Inscribed);
    assert!(env.polygon.is_rectangular());
    for p in env.polygon.vertices() {
        assert!(k.contains(*p, &l));
    }
    assert_eq!(env.marker, env.polygon.segment(0).center());
}

#[test]
fn collinear_site_is_degenerate() {
    let k = kernel();
    let flat = Polygon::from_xy(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]).unwrap();
    let err = generate_envelope(&k, &flat, &EnvelopeCfg::default()).unwrap_err();
    assert!(matches!(err, SiteError::DegenerateGeometry { .. }));
}

#[test]
fn oversized_margin_is_degenerate() {
    let k = kernel();
    let cfg = EnvelopeCfg {
        shrink_margin: 3.0,
        ..EnvelopeCfg::default()
    };
    let err = generate_envelope(&k, &rect(0.0, 0.0, 5.0, 5.0), &cfg).unwrap_err();
    assert!(matches!(err, SiteError::DegenerateGeometry { .. }));
}

#[test]
fn no_frontage_keeps_envelope() {
    let k = kernel();
    let env = generate_envelope(&k, &rect(0.0, 0.0, 30.0, 12.0), &EnvelopeCfg::default()).unwrap();
    let out = resolve_orientation(&k, env.clone(), &Frontage::default());
    assert_eq!(out.envelope, env);
    assert!(!out.sub);
    assert!(out.target.is_none());
    assert_eq!(out.center, vector![15.0, 6.0]);
}

#[test]
fn primary_frontage_on_short_edge_becomes_edge_zero() {
    let k = kernel();
    let (site, frontage) = narrow_site();
    let env = generate_envelope(&k, &site, &EnvelopeCfg::default()).unwrap();
    let out = resolve_orientation(&k, env, &frontage);
    assert!(!out.sub, "secondary is farther and must not win");
    let poly = &out.envelope.polygon;
    assert!((poly.point(0) - vector![9.5, 39.5]).norm() < 1e-12);
    assert!((poly.point(1) - vector![0.5, 39.5]).norm() < 1e-12);
    assert!((out.envelope.marker - vector![5.0, 39.5]).norm() < 1e-12);
    assert!(closed(poly));
    // cyclic order kept: still counterclockwise, same area
    assert!((k.signed_area(poly) - 9.0 * 39.0).abs() < 1e-9);
}

#[test]
fn strictly_closer_secondary_frontage_sets_sub() {
    let k = kernel();
    let (site, mut frontage) = narrow_site();
    frontage.secondary = vec![rect(-8.0, 0.0, -2.0, 40.0)];
    let env = generate_envelope(&k, &site, &EnvelopeCfg::default()).unwrap();
    let out = resolve_orientation(&k, env, &frontage);
    assert!(out.sub);
    let poly = &out.envelope.polygon;
    assert!((poly.point(0) - vector![0.5, 39.5]).norm() < 1e-12);
    assert!((poly.point(1) - vector![0.5, 0.5]).norm() < 1e-12);
}

#[test]
fn equidistant_secondary_frontage_does_not_win() {
    let k = kernel();
    let (site, mut frontage) = narrow_site();
    // centroid (5, 20): primary hit at (5, 41), secondary at (-16, 20), both 21 away
    frontage.secondary = vec![rect(-22.0, 0.0, -16.0, 40.0)];
    let env = generate_envelope(&k, &site, &EnvelopeCfg::default()).unwrap();
    let out = resolve_orientation(&k, env, &frontage);
    assert!(!out.sub);
    assert!((out.target.unwrap() - vector![5.0, 41.0]).norm() < 1e-12);
    let poly = &out.envelope.polygon;
    assert!((poly.point(0) - vector![9.5, 39.5]).norm() < 1e-12);
    assert!((poly.point(1) - vector![0.5, 39.5]).norm() < 1e-12);
}

#[test]
fn small_envelopes_are_always_solo() {
    let k = kernel();
    let env = rect(0.0, 0.0, 11.0, 11.0);
    for seed in 0..32 {
        let mut rng = StdRng::seed_from_u64(seed);
        let pattern = select_pattern(&k, &env, &LayoutCfg::default(), &mut rng);
        assert_eq!(pattern, BasePattern::Solo, "seed {seed}");
    }
    // also below the threshold when the frontage edge is the short side
    let thin = rect(0.0, 0.0, 4.0, 30.0);
    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(
        select_pattern(&k, &thin, &LayoutCfg::default(), &mut rng),
        BasePattern::Solo
    );
}

/// Every draw is 0.9: above the solo threshold, below the top of every band.
fn high_draw() -> StepRng {
    StepRng::new((0.9 * u64::MAX as f64) as u64, 0)
}

#[test]
fn high_draw_on_square_gives_single_full_base() {
    let k = kernel();
    let mut rng = high_draw();
    let plan = plan_shop(
        &k,
        &rect(0.0, 0.0, 20.0, 20.0),
        &Frontage::default(),
        &PlanCfg::default(),
        &mut rng,
    )
    .unwrap();
    assert_eq!(plan.pattern, BasePattern::Solo);
    assert!(!plan.sub);
    assert_eq!(plan.bases, vec![plan.envelope.polygon.clone()]);
    assert_eq!(plan.buildings.len(), 1);
    let b = &plan.buildings[0];
    assert_eq!(b.floors, 3);
    assert!((3.5..4.0).contains(&b.floor_height));
    assert!(!b.basement);
    assert_plan_closed(&plan);
}

#[test]
fn low_draw_on_square_gives_diagonal_pair() {
    let k = kernel();
    let mut rng = StepRng::new(0, 0);
    let plan = plan_shop(
        &k,
        &rect(0.0, 0.0, 20.0, 20.0),
        &Frontage::default(),
        &PlanCfg::default(),
        &mut rng,
    )
    .unwrap();
    assert_eq!(plan.pattern, BasePattern::DiagonalPair);
    assert_eq!(plan.bases.len(), 2);
    // every band collapses to its low end: depth 0.85 * 19, anchor 9.5 - 0.4
    let expect = 9.1 * 0.85 * 19.0;
    for b in &plan.bases {
        assert!((k.signed_area(b) - expect).abs() < 1e-9);
        for p in b.vertices() {
            assert!(k.contains(*p, &plan.envelope.polygon));
        }
    }
    let (a, b) = (x_range(&plan.bases[0]), x_range(&plan.bases[1]));
    assert!((a.1 - 9.6).abs() < 1e-12 && (b.0 - 10.4).abs() < 1e-12);
    for b in &plan.buildings {
        assert_eq!(b.floors, 3);
        assert_eq!(b.floor_height, 3.5);
    }
    assert_plan_closed(&plan);
}

#[test]
fn square_pattern_is_solo_or_diagonal_for_any_seed() {
    let k = kernel();
    let site = rect(0.0, 0.0, 20.0, 20.0);
    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed);
        let plan = plan_shop(&k, &site, &Frontage::default(), &PlanCfg::default(), &mut rng).unwrap();
        assert_ne!(plan.pattern, BasePattern::TwinStrip, "seed {seed}");
        assert_eq!(plan.buildings.len(), plan.bases.len());
    }
}

#[test]
fn narrow_site_gets_twin_strips() {
    let k = kernel();
    let (site, frontage) = narrow_site();
    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed);
        let plan = plan_shop(&k, &site, &frontage, &PlanCfg::default(), &mut rng).unwrap();
        assert!(!plan.sub);
        assert_eq!(plan.pattern, BasePattern::TwinStrip, "seed {seed}");
        assert_eq!(plan.bases.len(), 2);
        for base in &plan.bases {
            assert!(base.is_rectangular());
            for p in base.vertices() {
                assert!(k.contains(*p, &plan.envelope.polygon));
            }
        }
        // strip A hangs from the frontage edge, strip B from the opposite one
        let (a, b) = (y_range(&plan.bases[0]), y_range(&plan.bases[1]));
        assert!((a.1 - 39.5).abs() < 1e-12 && (b.0 - 0.5).abs() < 1e-12);
        let (da, db) = (a.1 - a.0, b.1 - b.0);
        for d in [da, db] {
            assert!((0.30 * 39.0..0.36 * 39.0 + 1e-9).contains(&d), "depth {d}");
        }
        assert!(b.1 < a.0, "strips overlap: {b:?} vs {a:?}");
        for bldg in &plan.buildings {
            assert_eq!(bldg.floors, 3);
        }
        assert_plan_closed(&plan);
    }
}

#[test]
fn secondary_frontage_uses_secondary_floor_bands() {
    let k = kernel();
    let (site, mut frontage) = narrow_site();
    frontage.secondary = vec![rect(-8.0, 0.0, -2.0, 40.0)];
    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed);
        let plan = plan_shop(&k, &site, &frontage, &PlanCfg::default(), &mut rng).unwrap();
        assert!(plan.sub);
        for b in &plan.buildings {
            assert!((2..=3).contains(&b.floors), "floors {}", b.floors);
            assert!((3.0..3.5).contains(&b.floor_height));
        }
    }
}

#[test]
fn buildings_follow_config_basement_flag() {
    let cfg = BuildingCfg {
        basement: true,
        ..BuildingCfg::default()
    };
    let bases = vec![rect(0.0, 0.0, 5.0, 5.0), rect(6.0, 0.0, 9.0, 5.0)];
    let mut rng = StdRng::seed_from_u64(7);
    let out = instantiate_buildings(&bases, false, &cfg, &mut rng);
    assert_eq!(out.len(), 2);
    for (b, base) in out.iter().zip(&bases) {
        assert!(b.basement);
        assert_eq!(&b.footprint, base);
        assert!((b.height() - f64::from(b.floors) * b.floor_height).abs() < 1e-12);
    }
}

#[test]
fn layout_rejects_non_rectangular_envelope() {
    let k = kernel();
    let tri = Polygon::from_xy(&[(0.0, 0.0), (30.0, 0.0), (0.0, 30.0)]).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let err = layout_bases(&k, &tri, &LayoutCfg::default(), &mut rng).unwrap_err();
    assert!(matches!(err, SiteError::InvalidInput { .. }));
}

#[test]
fn plan_serializes_for_renderers() {
    let k = kernel();
    let mut rng = high_draw();
    let plan = plan_shop(
        &k,
        &rect(0.0, 0.0, 20.0, 20.0),
        &Frontage::default(),
        &PlanCfg::default(),
        &mut rng,
    )
    .unwrap();
    let v = serde_json::to_value(&plan).unwrap();
    assert_eq!(v["pattern"], "solo");
    assert_eq!(v["envelope"]["source"], "shrunk_bounds");
    assert_eq!(v["envelope"]["polygon"].as_array().map(Vec::len), Some(5));
    assert_eq!(v["buildings"][0]["floors"], 3);
}
