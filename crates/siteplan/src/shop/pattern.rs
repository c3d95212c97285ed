//! Building-base patterns on an oriented rectangular envelope.
//!
//! Corner names: `c0..c3` are the distinct envelope vertices in ring order;
//! edge `i` runs `c_i → c_{i+1}`. Edge 0 faces the frontage.
//!
//! - `TwinStrip`: one strip along edge 0 and one along edge 2, each as deep as
//!   30–36% of edge 1. The middle strip stays unbuilt.
//! - `DiagonalPair`: two blocks in opposite corners (`c0` and `c2`), each
//!   stopping short of the edge midpoint by `diagonal_gap` and as deep as
//!   85–100% of edge 1.
//! - `Solo`: the whole envelope is one base.

use nalgebra::Vector2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cfg::LayoutCfg;
use crate::error::SiteError;
use crate::geom2::{GeometryKernel, Polygon};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasePattern {
    TwinStrip,
    DiagonalPair,
    Solo,
}

/// Choose the pattern for `envelope`.
///
/// Small envelopes are always `Solo`; envelopes whose frontage edge is the
/// short side get `TwinStrip`; otherwise one uniform draw decides between
/// `Solo` (draw above `solo_draw_above`) and `DiagonalPair`.
pub fn select_pattern<K: GeometryKernel, R: Rng>(
    kernel: &K,
    envelope: &Polygon,
    cfg: &LayoutCfg,
    rng: &mut R,
) -> BasePattern {
    if kernel.signed_area(envelope).abs() < cfg.solo_area_below {
        return BasePattern::Solo;
    }
    if envelope.segment(0).length() / envelope.segment(1).length() < 1.0 {
        return BasePattern::TwinStrip;
    }
    let r: f64 = rng.gen();
    if r > cfg.solo_draw_above {
        BasePattern::Solo
    } else {
        BasePattern::DiagonalPair
    }
}

/// Select a pattern and lay out its bases.
///
/// Errors: `InvalidInput` when `envelope` is not a 5-point rectangle.
pub fn layout_bases<K: GeometryKernel, R: Rng>(
    kernel: &K,
    envelope: &Polygon,
    cfg: &LayoutCfg,
    rng: &mut R,
) -> Result<(BasePattern, Vec<Polygon>), SiteError> {
    if !envelope.is_rectangular() {
        return Err(SiteError::invalid(format!(
            "base layout needs a rectangular envelope, got {} points",
            envelope.num_points()
        )));
    }
    let pattern = select_pattern(kernel, envelope, cfg, rng);
    let bases = match pattern {
        BasePattern::TwinStrip => twin_strip(envelope, cfg, rng)?,
        BasePattern::DiagonalPair => diagonal_pair(envelope, cfg, rng)?,
        BasePattern::Solo => vec![envelope.clone()],
    };
    debug!(?pattern, bases = bases.len(), "bases laid out");
    Ok((pattern, bases))
}

fn corners(envelope: &Polygon) -> [Vector2<f64>; 4] {
    [
        envelope.point(0),
        envelope.point(1),
        envelope.point(2),
        envelope.point(3),
    ]
}

fn twin_strip<R: Rng>(
    envelope: &Polygon,
    cfg: &LayoutCfg,
    rng: &mut R,
) -> Result<Vec<Polygon>, SiteError> {
    let depth = cfg.twin_depth.scaled(envelope.segment(1).length());
    let (d0, d1) = (depth.sample(rng), depth.sample(rng));
    let [c0, c1, c2, c3] = corners(envelope);
    let p = envelope.segment(1).point_at(d0);
    let q = envelope.segment(3).point_at(d1);
    Ok(vec![
        Polygon::new(vec![c0, c1, p, c0 + (p - c1)])?,
        Polygon::new(vec![c2, c3, q, c2 + (q - c3)])?,
    ])
}

fn diagonal_pair<R: Rng>(
    envelope: &Polygon,
    cfg: &LayoutCfg,
    rng: &mut R,
) -> Result<Vec<Polygon>, SiteError> {
    let (e0, e1, e2, e3) = (
        envelope.segment(0),
        envelope.segment(1),
        envelope.segment(2),
        envelope.segment(3),
    );
    // Along-edge offsets are drawn to keep the draw sequence stable; the
    // anchors below do not use them.
    let along = cfg.diagonal_along.scaled(e0.length());
    let _ = (along.sample(rng), along.sample(rng));
    let depth = cfg.diagonal_depth.scaled(e1.length());
    let (d0, d1) = (depth.sample(rng), depth.sample(rng));

    let [c0, _, c2, _] = corners(envelope);
    let p = e0.point_at(e0.length() * 0.5 - cfg.diagonal_gap);
    let q = e2.point_at(e2.length() * 0.5 - cfg.diagonal_gap);
    let (u1, u3) = (e1.direction() * d0, e3.direction() * d1);
    Ok(vec![
        Polygon::new(vec![c0, p, p + u1, c0 + u1])?,
        Polygon::new(vec![c2, q, q + u3, c2 + u3])?,
    ])
}
