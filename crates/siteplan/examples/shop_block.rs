//! Plan one irregular corner site and print its buildings.
//!
//! Usage:
//!   cargo run -p siteplan --example shop_block -- [seed]
//!
//! The site is an L-shaped corner lot with a primary street along its south
//! side and a secondary lane to the west.

use rand::{rngs::StdRng, SeedableRng};
use siteplan::shop::{plan_shop, Frontage};
use siteplan::{PlanCfg, PlanarKernel, Polygon};

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2025u64);
    let site = Polygon::from_xy(&[
        (0.0, 0.0),
        (40.0, 0.0),
        (40.0, 10.0),
        (10.0, 10.0),
        (10.0, 30.0),
        (0.0, 30.0),
    ])
    .unwrap();
    let frontage = Frontage {
        primary: vec![Polygon::rect(-5.0, -8.0, 45.0, -1.0).unwrap()],
        secondary: vec![Polygon::rect(-6.0, 0.0, -2.0, 30.0).unwrap()],
    };
    let k = PlanarKernel::default();
    let mut rng = StdRng::seed_from_u64(seed);
    match plan_shop(&k, &site, &frontage, &PlanCfg::default(), &mut rng) {
        Ok(plan) => {
            println!(
                "pattern={:?} sub={} built_area={:.1}",
                plan.pattern,
                plan.sub,
                plan.built_area(&k)
            );
            for (i, b) in plan.buildings.iter().enumerate() {
                println!(
                    "  building {i}: floors={} floor_height={:.2} height={:.2}",
                    b.floors,
                    b.floor_height,
                    b.height()
                );
            }
        }
        Err(e) => eprintln!("plan failed: {e}"),
    }
}
