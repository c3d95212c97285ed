//! Planar geometry for site polygons.
//!
//! Purpose
//! - Closed polygon rings and the handful of primitives the site pipeline
//!   consumes, behind the `GeometryKernel` trait.
//! - `PlanarKernel` is the default implementation; tolerances and primitive
//!   parameters live in `cfg::KernelCfg`.
//!
//! Conventions
//! - Rings are closed (first point repeated as last); counterclockwise means
//!   positive signed area.
//! - Rectangles produced here are counterclockwise with exactly 5 points.
//! - Cutting is Sutherland–Hodgman against closed half-spaces `n·x <= c`.
//!
//! Code cross-refs: `types::{Polygon, Segment, Ray, Hs2}`, `kernel::PlanarKernel`

mod kernel;
mod rect;
mod subdivide;
mod types;
mod util;

pub use kernel::{GeometryKernel, PlanarKernel};
pub use types::{Hs2, Polygon, Ray, Segment};
