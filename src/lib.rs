// polytess: sweep-line polygon tessellation over a half-edge mesh
// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

pub mod dict;
pub mod error;
pub mod geom;
pub mod handle;
pub mod mesh;
pub mod pool;
pub mod priorityq;
pub mod sweep;
pub mod tess;

pub use error::{InternalError, TessError};
pub use geom::Real;
pub use glam::Vec3;
pub use mesh::UNDEF;
pub use tess::{
    CombineFn, ContourOrientation, ContourVertex, ElementType, TessOption, Tessellator,
    WindingRule,
};
