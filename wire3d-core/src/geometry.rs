//! Wireframe geometry: vertices, edges and the projected-vertex cache
use nalgebra::{Point2, Point3, Vector3};

use crate::error::GeometryError;

/// Corner offsets of the unit cube, in construction order
const CUBE_CORNERS: [[f32; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Front ring, back ring, then the four connecting edges
const CUBE_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// An unordered pair of vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge(pub [usize; 2]);

impl Edge {
    pub fn new(a: usize, b: usize) -> Self {
        Self([a, b])
    }

    pub fn endpoints(&self) -> (usize, usize) {
        (self.0[0], self.0[1])
    }

    /// True if either endpoint is the given vertex
    pub fn touches(&self, index: usize) -> bool {
        self.0[0] == index || self.0[1] == index
    }
}

impl From<[usize; 2]> for Edge {
    fn from(pair: [usize; 2]) -> Self {
        Self(pair)
    }
}

/// A wireframe shape defined by its vertices and edges.
///
/// The projected cache holds one 2D point per vertex and is overwritten
/// wholesale on every frame. Its contents are only meaningful between a
/// projection pass and the next vertex or observer mutation.
#[derive(Debug, Clone)]
pub struct Shape {
    vertices: Vec<Point3<f32>>,
    edges: Vec<Edge>,
    projected: Vec<Point2<f32>>,
}

impl Shape {
    /// Build a shape, panicking if any edge references a missing vertex
    pub fn new(vertices: Vec<Point3<f32>>, edges: Vec<Edge>) -> Self {
        match Self::try_new(vertices, edges) {
            Ok(shape) => shape,
            Err(err) => panic!("invalid shape: {err}"),
        }
    }

    /// Build a shape, reporting the first edge that references a missing vertex
    pub fn try_new(vertices: Vec<Point3<f32>>, edges: Vec<Edge>) -> Result<Self, GeometryError> {
        let vertex_count = vertices.len();
        for edge in &edges {
            let (a, b) = edge.endpoints();
            for index in [a, b] {
                if index >= vertex_count {
                    return Err(GeometryError::EdgeOutOfRange {
                        edge: *edge,
                        index,
                        vertex_count,
                    });
                }
            }
        }

        Ok(Self {
            projected: vec![Point2::origin(); vertex_count],
            vertices,
            edges,
        })
    }

    /// Create an axis-aligned cube wireframe centered on `center`.
    ///
    /// Zero or negative sizes are accepted and yield a collapsed or
    /// inverted cube.
    pub fn cuboid(center: Point3<f32>, size: f32) -> Self {
        let half = size / 2.0;
        let vertices = CUBE_CORNERS
            .iter()
            .map(|[x, y, z]| {
                Point3::new(
                    x * half + center.x,
                    y * half + center.y,
                    z * half + center.z,
                )
            })
            .collect();
        let edges = CUBE_EDGES.iter().copied().map(Edge::from).collect();

        Self::new(vertices, edges)
    }

    /// Unit cube centered on the origin
    pub fn default_cuboid() -> Self {
        Self::cuboid(Point3::origin(), 1.0)
    }

    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    /// Mutable access to vertex positions. The vertex count stays fixed.
    pub fn vertices_mut(&mut self) -> &mut [Point3<f32>] {
        &mut self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn projected(&self) -> &[Point2<f32>] {
        &self.projected
    }

    /// Split borrow used by the projection pass
    pub(crate) fn projection_buffers(&mut self) -> (&[Point3<f32>], &mut [Point2<f32>]) {
        (&self.vertices, &mut self.projected)
    }

    /// Move every vertex by `delta`
    pub fn translate(&mut self, delta: &Vector3<f32>) {
        for vertex in &mut self.vertices {
            *vertex += *delta;
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self::default_cuboid()
    }
}
