// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Public tessellator: contour intake, the tessellate pipeline and access to
// the output arrays.
//
// Pipeline of one `tessellate` call:
//   1. project every vertex onto the sweep plane (`projection`)
//   2. sweep the plane, classifying faces under the winding rule (`sweep`)
//   3. triangulate the inside faces, or reduce them to their boundaries
//   4. copy the surviving faces into flat arrays (`output`)
// The mesh is discarded afterwards; contours have to be added again for the
// next call.

mod output;
mod projection;

use glam::Vec3;
use log::{debug, warn};

use crate::error::TessError;
use crate::geom::Real;
use crate::handle::EdgeId;
use crate::mesh::{Mesh, UNDEF};
use crate::sweep::{self, SweepState};

/// Largest coordinate magnitude accepted by `add_contour`.
const MAX_VALID_COORD: Real = (1u32 << 23) as Real;

/// Which winding numbers count as inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindingRule {
    #[default]
    Odd,
    NonZero,
    Positive,
    Negative,
    AbsGeqTwo,
}

impl WindingRule {
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            WindingRule::Odd => winding & 1 != 0,
            WindingRule::NonZero => winding != 0,
            WindingRule::Positive => winding > 0,
            WindingRule::Negative => winding < 0,
            WindingRule::AbsGeqTwo => winding.abs() >= 2,
        }
    }
}

/// Layout of [`Tessellator::elements`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementType {
    /// `poly_size` vertex ids per polygon, padded with [`UNDEF`].
    #[default]
    Polygons,
    /// Like `Polygons`, followed by `poly_size` neighbouring polygon ids.
    /// Entry `i` is the polygon across the edge from vertex `i` to `i + 1`.
    ConnectedPolygons,
    /// `(start, count)` pairs into the vertex arrays, one per boundary loop.
    BoundaryContours,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TessOption {
    /// Flip interior edges of the triangulation until it is Delaunay.
    ConstrainedDelaunayTriangulation,
    /// Contours contribute winding -1 instead of +1.
    ReverseContours,
    /// Skip zero-area polygons in the output.
    NoEmptyPolygons,
}

/// Orientation forced on a contour before it is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContourOrientation {
    #[default]
    Original,
    Clockwise,
    CounterClockwise,
}

/// An input vertex with an optional payload carried through to the output.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourVertex<D> {
    pub position: Vec3,
    pub data: Option<D>,
}

impl<D> ContourVertex<D> {
    pub fn new(position: Vec3) -> Self {
        ContourVertex { position, data: None }
    }

    pub fn with_data(position: Vec3, data: D) -> Self {
        ContourVertex {
            position,
            data: Some(data),
        }
    }
}

impl<D> From<Vec3> for ContourVertex<D> {
    fn from(position: Vec3) -> Self {
        ContourVertex::new(position)
    }
}

impl<D> From<[Real; 2]> for ContourVertex<D> {
    fn from([x, y]: [Real; 2]) -> Self {
        ContourVertex::new(Vec3::new(x, y, 0.0))
    }
}

impl<D> From<[Real; 3]> for ContourVertex<D> {
    fn from(p: [Real; 3]) -> Self {
        ContourVertex::new(Vec3::from_array(p))
    }
}

/// Payload interpolation for vertices created at edge intersections. It
/// receives the new position, the payloads of the two endpoints of each
/// crossing edge and their weights (summing to one).
pub type CombineFn<'a, D> = dyn FnMut(Vec3, [Option<&D>; 4], [Real; 4]) -> Option<D> + 'a;

#[derive(Debug, Clone, Copy, Default)]
struct Options {
    constrained_delaunay: bool,
    reverse_contours: bool,
    no_empty_polygons: bool,
}

pub struct Tessellator<D: Clone = ()> {
    mesh: Mesh,
    sweep: SweepState,
    /// Input payloads by global vertex index, followed by combined ones.
    payloads: Vec<Option<D>>,
    contour_count: usize,
    options: Options,

    vertices: Vec<Vec3>,
    vertex_data: Vec<Option<D>>,
    vertex_indices: Vec<u32>,
    elements: Vec<u32>,
    element_count: usize,
}

impl<D: Clone> Default for Tessellator<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Clone> Tessellator<D> {
    pub fn new() -> Self {
        Tessellator {
            mesh: Mesh::new(),
            sweep: SweepState::new(),
            payloads: Vec::new(),
            contour_count: 0,
            options: Options::default(),
            vertices: Vec::new(),
            vertex_data: Vec::new(),
            vertex_indices: Vec::new(),
            elements: Vec::new(),
            element_count: 0,
        }
    }

    pub fn set_option(&mut self, option: TessOption, value: bool) {
        match option {
            TessOption::ConstrainedDelaunayTriangulation => self.options.constrained_delaunay = value,
            TessOption::ReverseContours => self.options.reverse_contours = value,
            TessOption::NoEmptyPolygons => self.options.no_empty_polygons = value,
        }
    }

    /// Adds a closed contour. Coordinates are validated before anything is
    /// added, so a rejected contour leaves the tessellator unchanged.
    pub fn add_contour(
        &mut self,
        vertices: &[ContourVertex<D>],
        orientation: ContourOrientation,
    ) -> Result<(), TessError> {
        let contour = self.contour_count;
        for (i, v) in vertices.iter().enumerate() {
            for value in v.position.to_array() {
                if !is_valid_coord(value) {
                    return Err(TessError::InvalidCoordinate {
                        contour,
                        vertex: i,
                        value,
                    });
                }
            }
        }
        if self.payloads.len() + vertices.len() >= UNDEF as usize {
            return Err(TessError::ContourTooLarge);
        }
        self.contour_count += 1;

        let reverse = match orientation {
            ContourOrientation::Original => false,
            ContourOrientation::CounterClockwise => signed_area(vertices) < 0.0,
            ContourOrientation::Clockwise => signed_area(vertices) > 0.0,
        };
        let winding = if self.options.reverse_contours { -1 } else { 1 };
        let base = self.payloads.len();
        self.payloads.extend(vertices.iter().map(|v| v.data.clone()));

        let n = vertices.len();
        let mut e_prev: Option<EdgeId> = None;
        for k in 0..n {
            let i = if reverse { n - 1 - k } else { k };
            let e = match e_prev {
                None => {
                    // A single self-loop: one vertex, two faces.
                    let e = self.mesh.make_edge();
                    self.mesh.splice(e, e.sym());
                    e
                }
                Some(prev) => {
                    self.mesh.split_edge(prev);
                    self.mesh.lnext(prev)
                }
            };
            let org = self.mesh.org(e);
            self.mesh[org].coords = vertices[i].position;
            self.mesh[org].idx = (base + i) as u32;
            self.mesh[e].winding = winding;
            self.mesh[e.sym()].winding = -winding;
            e_prev = Some(e);
        }
        Ok(())
    }

    /// Adds a contour given as `size` floats per vertex (2 or 3), with no
    /// payloads.
    pub fn add_contour_flat(&mut self, size: usize, coords: &[Real]) -> Result<(), TessError> {
        if size != 2 && size != 3 {
            return Err(TessError::InvalidVertexSize(size));
        }
        let vertices: Vec<ContourVertex<D>> = coords
            .chunks_exact(size)
            .map(|c| {
                let z = if size == 3 { c[2] } else { 0.0 };
                ContourVertex::new(Vec3::new(c[0], c[1], z))
            })
            .collect();
        self.add_contour(&vertices, ContourOrientation::Original)
    }

    /// Tessellates everything added since the last call. A zero or missing
    /// `normal` is computed from the contours.
    pub fn tessellate(
        &mut self,
        rule: WindingRule,
        element_type: ElementType,
        poly_size: usize,
        normal: Option<Vec3>,
    ) -> Result<(), TessError> {
        self.tessellate_with(rule, element_type, poly_size, normal, None)
    }

    /// Same as [`Self::tessellate`], with a hook that produces payloads for
    /// vertices created at intersections.
    pub fn tessellate_with(
        &mut self,
        rule: WindingRule,
        element_type: ElementType,
        poly_size: usize,
        normal: Option<Vec3>,
        combine: Option<&mut CombineFn<'_, D>>,
    ) -> Result<(), TessError> {
        self.clear_output();
        let result = self.run(rule, element_type, poly_size, normal, combine);

        self.mesh.reset();
        self.payloads.clear();
        self.contour_count = 0;
        if let Err(err) = &result {
            warn!("tessellation failed: {}", err);
            self.clear_output();
        }
        result
    }

    fn run(
        &mut self,
        rule: WindingRule,
        element_type: ElementType,
        poly_size: usize,
        normal: Option<Vec3>,
        mut combine: Option<&mut CombineFn<'_, D>>,
    ) -> Result<(), TessError> {
        if element_type != ElementType::BoundaryContours && poly_size < 3 {
            return Err(TessError::InvalidPolySize(poly_size));
        }
        let input_count = self.payloads.len();
        if self.mesh.is_empty() {
            debug!("tessellate: no input vertices");
            return Ok(());
        }

        let (bounds, used_normal) = projection::project(&mut self.mesh, normal.unwrap_or(Vec3::ZERO));
        debug!(
            "tessellate: {} contours, {} input vertices, normal {:?}, rule {:?}",
            self.contour_count, input_count, used_normal, rule
        );

        let payloads = &mut self.payloads;
        let mut hook = |coords: Vec3, idx: [u32; 4], weights: [Real; 4]| -> u32 {
            let Some(f) = combine.as_mut() else {
                return UNDEF;
            };
            let sources = idx.map(|i| payloads.get(i as usize).and_then(Option::as_ref));
            match f(coords, sources, weights) {
                Some(data) => {
                    payloads.push(Some(data));
                    (payloads.len() - 1) as u32
                }
                None => UNDEF,
            }
        };
        sweep::compute_interior(&mut self.mesh, &mut self.sweep, rule, bounds, &mut hook)?;
        #[cfg(debug_assertions)]
        self.mesh.check()?;

        if element_type == ElementType::BoundaryContours {
            self.mesh.set_winding_number(1, true);
            self.output_contours(input_count);
        } else {
            self.mesh.tessellate_interior()?;
            if self.options.constrained_delaunay {
                self.mesh.refine_delaunay();
            }
            self.mesh.discard_exterior();
            self.output_polymesh(element_type, poly_size, input_count);
        }

        debug!(
            "tessellate: {} output vertices, {} elements",
            self.vertices.len(),
            self.element_count
        );
        Ok(())
    }

    fn clear_output(&mut self) {
        self.vertices.clear();
        self.vertex_data.clear();
        self.vertex_indices.clear();
        self.elements.clear();
        self.element_count = 0;
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Output positions in the original 3D space.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Output payloads, parallel to [`Self::vertices`].
    pub fn vertex_data(&self) -> &[Option<D>] {
        &self.vertex_data
    }

    /// Input vertex index of each output vertex, [`UNDEF`] for vertices
    /// created by the tessellator.
    pub fn vertex_indices(&self) -> &[u32] {
        &self.vertex_indices
    }

    pub fn elements(&self) -> &[u32] {
        &self.elements
    }
}

fn is_valid_coord(c: Real) -> bool {
    c.is_finite() && c.abs() <= MAX_VALID_COORD
}

/// Signed area of the contour projected onto the xy plane; positive when
/// counter-clockwise.
fn signed_area<D>(vertices: &[ContourVertex<D>]) -> Real {
    let n = vertices.len();
    let mut area = 0.0;
    for i in 0..n {
        let a = vertices[i].position;
        let b = vertices[(i + 1) % n].position;
        area += a.x * b.y - a.y * b.x;
    }
    area * 0.5
}
