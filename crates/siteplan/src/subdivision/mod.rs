//! Interactive subdivision of oversized sites.
//!
//! Purpose
//! - Keep a pool of parcels per traffic group; a caller picks one by point and
//!   divides it with one of two strategies; every output is routed by area into
//!   invalid / shop-ready / re-pooled.
//!
//! Why this design
//! - Selections are plain values returned by `pick` and passed into the divide
//!   calls, so no hidden selection state lives on the engine. Divides never
//!   clear a selection; a consumed one just stops matching the pool.
//! - `classify` is a pure function of area and thresholds, testable alone.
//!
//! Code cross-refs: `geom2::GeometryKernel::{strip_cut_subdivide, box_recursive_subdivide}`, `shop::plan_shop` (consumer of the shop-ready tier)

mod classify;
mod engine;

pub use classify::{classify, classify_polygon, Tier};
pub use engine::{
    frontage_cut_indices, DivideReport, DivideStrategy, Parcel, Selection, SubdivisionEngine,
};
