//! Observer-relative projection onto the view plane.
//!
//! The view plane is always parallel to the world XY plane and sits at the
//! window origin's Z. Each axis is solved independently: the ray from the
//! observer through a vertex is intersected with `z = window.z` and the
//! resulting X (or Y) coordinate is kept.
use nalgebra::{Point2, Point3};

/// Default distance under which a vertex and the observer are treated as
/// sharing a coordinate
pub const DEFAULT_TOLERANCE: f32 = 1e-6;

/// Stateless vertex projector.
///
/// The only setting is the degeneracy tolerance. When a vertex and the
/// observer are within `tolerance` of each other along an axis, the ray has
/// no usable extent on that axis and the vertex's own coordinate is returned
/// instead of dividing by (nearly) zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub tolerance: f32,
}

impl Projector {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    /// Projector that only falls back on bit-exact coordinate equality
    pub fn exact() -> Self {
        Self { tolerance: 0.0 }
    }

    /// Project a single vertex onto the view plane
    pub fn project(
        &self,
        vertex: &Point3<f32>,
        observer: &Point3<f32>,
        window_origin: &Point3<f32>,
    ) -> Point2<f32> {
        Point2::new(
            self.project_axis(vertex.x, vertex.z, observer.x, observer.z, window_origin.z),
            self.project_axis(vertex.y, vertex.z, observer.y, observer.z, window_origin.z),
        )
    }

    /// Project every vertex into the index-aligned `out` buffer.
    ///
    /// Panics if `out` is not the same length as `vertices`.
    pub fn project_into(
        &self,
        vertices: &[Point3<f32>],
        observer: &Point3<f32>,
        window_origin: &Point3<f32>,
        out: &mut [Point2<f32>],
    ) {
        assert_eq!(
            vertices.len(),
            out.len(),
            "projection buffer must match the vertex count"
        );

        for (vertex, slot) in vertices.iter().zip(out.iter_mut()) {
            *slot = self.project(vertex, observer, window_origin);
        }
    }

    fn project_axis(
        &self,
        point: f32,
        point_z: f32,
        observer: f32,
        observer_z: f32,
        plane_z: f32,
    ) -> f32 {
        let extent = point - observer;
        if extent.abs() <= self.tolerance {
            return point;
        }

        // Slope of the observer-to-vertex ray in the (axis, z) plane
        let slope = (point_z - observer_z) / extent;
        slope.recip() * (plane_z - observer_z + slope * observer)
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}
