mod drain;
mod io;
mod provenance;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use rand::{rngs::StdRng, Rng, SeedableRng};
use siteplan::shop::plan_shop;
use siteplan::subdivision::{DivideStrategy, SubdivisionEngine};
use siteplan::PlanarKernel;
use std::path::PathBuf;
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Site subdivision and shop massing runner")]
struct Cmd {
    /// Optional run label; propagated to provenance and logs
    #[arg(long)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    /// Cut strips along frontage edges, bounding-box bisection when that fails
    Strip,
    /// Bounding-box bisection only
    #[value(name = "box")]
    BoundingBox,
}

impl From<Strategy> for DivideStrategy {
    fn from(s: Strategy) -> Self {
        match s {
            Strategy::Strip => DivideStrategy::SideStrip,
            Strategy::BoundingBox => DivideStrategy::BoundingBox,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Plan buildings on one site
    Plan {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// RNG seed; drawn and recorded in provenance when omitted
        #[arg(long)]
        seed: Option<u64>,
        /// JSON config overriding any subset of the defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Subdivide parcel groups until the pool drains, then plan every shop-ready parcel
    Subdivide {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = Strategy::Strip)]
        strategy: Strategy,
        #[arg(long, default_value_t = 1000)]
        max_rounds: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Plan {
            input,
            out,
            seed,
            config,
        } => plan(input, out, seed, config, cmd.tag),
        Action::Subdivide {
            input,
            out,
            strategy,
            max_rounds,
            seed,
            config,
        } => subdivide(input, out, strategy, max_rounds, seed, config, cmd.tag),
        Action::Report => report(cmd.tag),
    }
}

fn seeded(seed: Option<u64>) -> (u64, StdRng) {
    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    (seed, StdRng::seed_from_u64(seed))
}

fn plan(
    input: PathBuf,
    out: PathBuf,
    seed: Option<u64>,
    config: Option<PathBuf>,
    tag: Option<String>,
) -> Result<()> {
    let cfg = io::load_cfg(config.as_deref())?;
    let site: io::SiteInput = io::read_json(&input)?;
    let (seed, mut rng) = seeded(seed);
    tracing::info!(input = %input.display(), seed, tag = ?tag, "plan");

    let kernel = PlanarKernel::new(cfg.kernel);
    let shop = plan_shop(&kernel, &site.site, &site.frontage(), &cfg, &mut rng)
        .with_context(|| format!("planning site from {}", input.display()))?;
    tracing::info!(
        pattern = ?shop.pattern,
        sub = shop.sub,
        buildings = shop.buildings.len(),
        "planned"
    );
    io::write_json(&out, &shop)?;

    let params = serde_json::json!({
        "command": "plan",
        "input": input.to_string_lossy(),
        "config": cfg,
    });
    write_sidecar(&out, Payload::new(params).with_seed(seed).with_tag(tag))?;
    Ok(())
}

fn subdivide(
    input: PathBuf,
    out: PathBuf,
    strategy: Strategy,
    max_rounds: usize,
    seed: Option<u64>,
    config: Option<PathBuf>,
    tag: Option<String>,
) -> Result<()> {
    let cfg = io::load_cfg(config.as_deref())?;
    let block: io::BlockInput = io::read_json(&input)?;
    let (seed, mut rng) = seeded(seed);
    tracing::info!(input = %input.display(), seed, max_rounds, tag = ?tag, "subdivide");

    let engine = SubdivisionEngine::new(
        block.groups,
        block.traffic,
        PlanarKernel::new(cfg.kernel),
        cfg.subdivision,
    )
    .with_context(|| format!("building engine from {}", input.display()))?;
    let result = drain::drain(
        engine,
        strategy.into(),
        max_rounds,
        &block.sub_traffic,
        &cfg,
        &mut rng,
    );
    io::write_json(&out, &result)?;

    let params = serde_json::json!({
        "command": "subdivide",
        "input": input.to_string_lossy(),
        "strategy": DivideStrategy::from(strategy),
        "max_rounds": max_rounds,
        "config": cfg,
        "summary": {
            "rounds": result.rounds,
            "drained": result.drained,
            "shop_ready": result.shop_ready.len(),
            "invalid": result.invalid.len(),
            "plans": result.plans.len(),
        },
    });
    write_sidecar(&out, Payload::new(params).with_seed(seed).with_tag(tag))?;
    Ok(())
}

fn report(tag: Option<String>) -> Result<()> {
    let mut obj = provenance::header(tag.as_deref());
    obj["params"] = serde_json::to_value(siteplan::PlanCfg::default())?;
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
