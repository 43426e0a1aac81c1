// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Flattening of the classified mesh into the output arrays.

use super::{ElementType, Tessellator};
use crate::geom::Real;
use crate::handle::{EdgeId, VertId};
use crate::mesh::UNDEF;

impl<D: Clone> Tessellator<D> {
    /// Input index for the output, or `UNDEF` for synthesized vertices.
    fn source_index(idx: u32, input_count: usize) -> u32 {
        if (idx as usize) < input_count {
            idx
        } else {
            UNDEF
        }
    }

    fn push_vertex(&mut self, v: VertId, input_count: usize) {
        let vert = &self.mesh[v];
        self.vertices.push(vert.coords);
        self.vertex_data
            .push(self.payloads.get(vert.idx as usize).cloned().flatten());
        self.vertex_indices
            .push(Self::source_index(vert.idx, input_count));
    }

    /// One record per inside face: vertex ids padded to `poly_size`, then
    /// for `ConnectedPolygons` the neighbour across each edge.
    pub(super) fn output_polymesh(&mut self, element_type: ElementType, poly_size: usize, input_count: usize) {
        if poly_size > 3 {
            self.mesh.merge_convex_faces(poly_size);
        }

        let verts: Vec<VertId> = self.mesh.vertex_ids().collect();
        for &v in &verts {
            self.mesh[v].n = UNDEF;
        }

        // Dense ids: vertices on first use, faces in list order.
        let mut vertex_count = 0u32;
        let mut order: Vec<VertId> = Vec::new();
        let mut faces = Vec::new();
        let face_ids: Vec<_> = self.mesh.face_ids().collect();
        for f in face_ids {
            self.mesh[f].n = UNDEF;
            if !self.mesh[f].inside {
                continue;
            }
            if self.options.no_empty_polygons && (self.mesh.face_area(f) * 0.5).abs() < Real::EPSILON {
                continue;
            }
            let start = self.mesh[f].an_edge;
            let mut e = start;
            loop {
                let org = self.mesh.org(e);
                if self.mesh[org].n == UNDEF {
                    self.mesh[org].n = vertex_count;
                    vertex_count += 1;
                    order.push(org);
                }
                e = self.mesh.lnext(e);
                if e == start {
                    break;
                }
            }
            self.mesh[f].n = faces.len() as u32;
            faces.push(f);
        }

        self.vertices.reserve(order.len());
        for v in order {
            self.push_vertex(v, input_count);
        }

        let stride = match element_type {
            ElementType::ConnectedPolygons => 2 * poly_size,
            _ => poly_size,
        };
        self.elements.reserve(faces.len() * stride);
        for &f in &faces {
            let start = self.mesh[f].an_edge;
            let edges = self.face_edges(start);
            self.elements
                .extend(edges.iter().map(|&e| self.mesh[self.mesh.org(e)].n));
            self.pad(poly_size, edges.len());
            if element_type == ElementType::ConnectedPolygons {
                let neighbours: Vec<u32> = edges.iter().map(|&e| self.neighbour(e)).collect();
                self.elements.extend(neighbours);
                self.pad(poly_size, edges.len());
            }
        }
        self.element_count = faces.len();
    }

    /// One `(start, count)` record per inside face boundary. Vertices are
    /// not shared between records.
    pub(super) fn output_contours(&mut self, input_count: usize) {
        let face_ids: Vec<_> = self.mesh.face_ids().collect();
        let mut start_vert = 0u32;
        for f in face_ids {
            if !self.mesh[f].inside {
                continue;
            }
            let edges = self.face_edges(self.mesh[f].an_edge);
            for &e in &edges {
                self.push_vertex(self.mesh.org(e), input_count);
            }
            let count = edges.len() as u32;
            self.elements.push(start_vert);
            self.elements.push(count);
            start_vert += count;
            self.element_count += 1;
        }
    }

    fn face_edges(&self, start: EdgeId) -> Vec<EdgeId> {
        let mut edges = Vec::new();
        let mut e = start;
        loop {
            edges.push(e);
            e = self.mesh.lnext(e);
            if e == start {
                return edges;
            }
        }
    }

    fn neighbour(&self, e: EdgeId) -> u32 {
        match self.mesh.rface(e) {
            Some(f) if self.mesh[f].inside => self.mesh[f].n,
            _ => UNDEF,
        }
    }

    fn pad(&mut self, poly_size: usize, used: usize) {
        let missing = poly_size.saturating_sub(used);
        self.elements.extend(std::iter::repeat(UNDEF).take(missing));
    }
}
