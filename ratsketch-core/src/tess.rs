//! # Tessellator
//! Converts a stroke's polyline into a triangle mesh, with round caps and round joins so that
//! consecutive segments never show seams and taps come out as dots.
//!
//! Meshes are in output pixel space: positions and width are multiplied by the canvas-to-pixel scale.

use crate::stroke::Stroke;

/// Maximum distance, in output pixels, between the true round geometry and its flattened mesh.
pub const DEFAULT_TOLERANCE: f32 = 0.05;

#[derive(thiserror::Error, Debug)]
pub enum TessellationError {
    #[error("stroke has fewer than two points")]
    Degenerate,
    #[error("lyon tessellation failed: {0:?}")]
    Lyon(lyon_tessellation::TessellationError),
}

/// Indexed triangle list.
#[derive(Clone, Debug, Default)]
pub struct StrokeMesh {
    pub vertices: Vec<[f32; 2]>,
    /// Always a multiple of three.
    pub indices: Vec<u32>,
}
impl StrokeMesh {
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 2]; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let fetch = |idx: u32| self.vertices.get(usize::try_from(idx).ok()?).copied();
            Some([fetch(tri[0])?, fetch(tri[1])?, fetch(tri[2])?])
        })
    }
    /// Axis-aligned bounds as `(min, max)`, or `None` if empty.
    #[must_use]
    pub fn bounds(&self) -> Option<([f32; 2], [f32; 2])> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (
                [min[0].min(v[0]), min[1].min(v[1])],
                [max[0].max(v[0]), max[1].max(v[1])],
            )
        }))
    }
}

/// Consumes lyon's stroke events into a [`StrokeMesh`].
struct MeshBuilder<'data> {
    mesh: &'data mut StrokeMesh,
    /// Where this geometry began, for rollback on abort.
    begin_vertex: usize,
    begin_index: usize,
}
impl lyon_tessellation::GeometryBuilder for MeshBuilder<'_> {
    fn begin_geometry(&mut self) {
        self.begin_vertex = self.mesh.vertices.len();
        self.begin_index = self.mesh.indices.len();
    }
    fn add_triangle(
        &mut self,
        a: lyon_tessellation::VertexId,
        b: lyon_tessellation::VertexId,
        c: lyon_tessellation::VertexId,
    ) {
        self.mesh.indices.extend_from_slice(&[a.0, b.0, c.0]);
    }
    fn abort_geometry(&mut self) {
        self.mesh.vertices.truncate(self.begin_vertex);
        self.mesh.indices.truncate(self.begin_index);
    }
}
impl lyon_tessellation::StrokeGeometryBuilder for MeshBuilder<'_> {
    fn add_stroke_vertex(
        &mut self,
        vertex: lyon_tessellation::StrokeVertex,
    ) -> Result<lyon_tessellation::VertexId, lyon_tessellation::GeometryBuilderError> {
        let id = u32::try_from(self.mesh.vertices.len())
            .map_err(|_| lyon_tessellation::GeometryBuilderError::TooManyVertices)?;
        self.mesh.vertices.push(vertex.position().to_array());
        Ok(lyon_tessellation::VertexId(id))
    }
}

pub struct Tessellator {
    inner: lyon_tessellation::StrokeTessellator,
    tolerance: f32,
}
impl Default for Tessellator {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}
impl Tessellator {
    #[must_use]
    pub fn new(tolerance: f32) -> Self {
        Self {
            inner: lyon_tessellation::StrokeTessellator::new(),
            tolerance,
        }
    }
    /// Tessellate `stroke` into `mesh`, replacing its contents. `scale` maps canvas units to pixels.
    pub fn tessellate_into(
        &mut self,
        stroke: &Stroke,
        scale: f32,
        mesh: &mut StrokeMesh,
    ) -> Result<(), TessellationError> {
        use lyon_tessellation::{math::point, path::Path, LineCap, LineJoin, StrokeOptions};
        mesh.clear();

        let points = stroke.points();
        let [first, rest @ ..] = points else {
            return Err(TessellationError::Degenerate);
        };
        if rest.is_empty() {
            return Err(TessellationError::Degenerate);
        }

        let mut builder = Path::builder();
        builder.begin(point(first.x * scale, first.y * scale));
        for p in rest {
            builder.line_to(point(p.x * scale, p.y * scale));
        }
        builder.end(false);
        let path = builder.build();

        let options = StrokeOptions::tolerance(self.tolerance)
            .with_line_width(stroke.style().width.get() * scale)
            .with_line_cap(LineCap::Round)
            .with_line_join(LineJoin::Round);

        let mut output = MeshBuilder {
            mesh,
            begin_vertex: 0,
            begin_index: 0,
        };
        self.inner
            .tessellate_path(&path, &options, &mut output)
            .map_err(TessellationError::Lyon)
    }
    /// Convenience for a fresh mesh.
    pub fn tessellate(
        &mut self,
        stroke: &Stroke,
        scale: f32,
    ) -> Result<StrokeMesh, TessellationError> {
        let mut mesh = StrokeMesh::default();
        self.tessellate_into(stroke, scale, &mut mesh)?;
        Ok(mesh)
    }
}
