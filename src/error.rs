// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

use thiserror::Error;

/// Errors returned by [`Tessellator`](crate::Tessellator).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TessError {
    /// A coordinate was NaN, infinite, or outside the supported magnitude.
    #[error("invalid coordinate {value} at contour {contour}, vertex {vertex}")]
    InvalidCoordinate {
        contour: usize,
        vertex: usize,
        value: f32,
    },

    #[error("polygon size must be at least 3, got {0}")]
    InvalidPolySize(usize),

    /// `add_contour_flat` was given a vertex size other than 2 or 3.
    #[error("vertex size must be 2 or 3, got {0}")]
    InvalidVertexSize(usize),

    #[error("too many vertices for 32-bit output indices")]
    ContourTooLarge,

    #[error("internal consistency failure: {0}")]
    Internal(#[from] InternalError),
}

/// Faults that indicate a broken algorithm invariant rather than bad input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalError {
    #[error("active region has no neighbour in the edge dictionary")]
    MissingRegion,

    #[error("edge has no active region")]
    MissingActiveRegion,

    #[error("priority queue handle is not live")]
    StaleQueueHandle,

    #[error("edge dictionary still holds a non-sentinel region after the sweep")]
    ResidualRegion,

    #[error("region left the sweep with non-zero winding number {0}")]
    ResidualWinding(i32),

    #[error("face with fewer than three edges reached triangulation")]
    DegenerateFace,

    #[error("mesh topology check failed: {0}")]
    BadTopology(&'static str),
}
