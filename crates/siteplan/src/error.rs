//! Error type shared by the envelope pipeline and the subdivision engine.
//!
//! Absent frontage and absent selection are not errors: orientation falls back
//! to the identity and divide calls return `Ok(None)`.

use std::fmt;

/// Errors surfaced to callers of the site pipeline.
#[derive(Clone, Debug, PartialEq)]
pub enum SiteError {
    /// A ring violates the closed-polygon invariant (too few points, non-finite coordinates).
    InvalidPolygon { reason: String },
    /// A kernel primitive returned a non-polygon or an empty result.
    DegenerateGeometry { reason: String },
    /// Inputs are inconsistent with each other (e.g. traffic list not aligned with groups).
    InvalidInput { reason: String },
}

impl SiteError {
    pub(crate) fn polygon(reason: impl Into<String>) -> Self {
        Self::InvalidPolygon {
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPolygon { reason } => write!(f, "invalid polygon: {reason}"),
            Self::DegenerateGeometry { reason } => write!(f, "degenerate geometry: {reason}"),
            Self::InvalidInput { reason } => write!(f, "invalid input: {reason}"),
        }
    }
}

impl std::error::Error for SiteError {}
