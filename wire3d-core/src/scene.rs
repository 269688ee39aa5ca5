//! Scene state and the per-frame render pipeline
use nalgebra::{Point2, Point3, Vector3};
use tracing::{debug, trace, warn};

use crate::config::RenderConfig;
use crate::error::SurfaceError;
use crate::geometry::Shape;
use crate::projection::Projector;
use crate::surface::{DisplaySurface, LineHandle, Segment, Viewport};

/// Observer position and the view-plane origin that travels with it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    pub position: Point3<f32>,
    pub window_origin: Point3<f32>,
}

impl Observer {
    pub fn new(position: Point3<f32>, window_origin: Point3<f32>) -> Self {
        Self {
            position,
            window_origin,
        }
    }

    /// Move observer and window together
    pub fn translate(&mut self, delta: &Vector3<f32>) {
        self.position += *delta;
        self.window_origin += *delta;
    }

    /// Window origin relative to the observer
    pub fn offset(&self) -> Vector3<f32> {
        self.window_origin - self.position
    }
}

impl Default for Observer {
    fn default() -> Self {
        let config = RenderConfig::default();
        Self::new(config.observer_position(), config.window_position())
    }
}

/// Lifecycle of a scene with respect to its display surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    /// No viewport size has been read yet
    Idle,
    /// A viewport size is known
    Ready,
}

/// Summary of one rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub shapes: usize,
    pub segments: usize,
}

/// Owns the shapes, the observer and the lines currently on the surface
#[derive(Debug, Clone)]
pub struct Scene {
    config: RenderConfig,
    projector: Projector,
    observer: Observer,
    shapes: Vec<Shape>,
    viewport: Option<Viewport>,
    drawn: Vec<LineHandle>,
}

impl Scene {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            projector: Projector::new(config.degenerate_tolerance),
            observer: Observer::new(config.observer_position(), config.window_position()),
            config,
            shapes: Vec::new(),
            viewport: None,
            drawn: Vec::new(),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn state(&self) -> SceneState {
        match self.viewport {
            Some(_) => SceneState::Ready,
            None => SceneState::Idle,
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape_mut(&mut self, index: usize) -> Option<&mut Shape> {
        self.shapes.get_mut(index)
    }

    /// Move the observer and its window by `delta`
    pub fn translate_observer(&mut self, delta: Vector3<f32>) {
        self.observer.translate(&delta);
        debug!(
            x = self.observer.position.x,
            y = self.observer.position.y,
            z = self.observer.position.z,
            "observer moved"
        );
    }

    /// Take ownership of a shape and return its index
    pub fn add_shape(&mut self, shape: Shape) -> usize {
        debug!(
            vertices = shape.vertex_count(),
            edges = shape.edge_count(),
            "adding shape"
        );
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    /// Recompute every shape's projected cache from the current observer
    pub fn project(&mut self) {
        let projector = self.projector;
        let observer = self.observer;
        for shape in &mut self.shapes {
            let (vertices, projected) = shape.projection_buffers();
            projector.project_into(
                vertices,
                &observer.position,
                &observer.window_origin,
                projected,
            );
        }
    }

    /// Device-space segments for every edge, built from the projected caches.
    ///
    /// Uses a zero-sized viewport while the scene is idle.
    pub fn segments(&self) -> Vec<Segment> {
        let center = self.viewport.unwrap_or_default().center();
        let scale = self.config.scale;
        let to_device = |p: &Point2<f32>| center + p.coords * scale;

        let mut segments = Vec::with_capacity(self.shapes.iter().map(Shape::edge_count).sum());
        for shape in &self.shapes {
            let projected = shape.projected();
            for edge in shape.edges() {
                let (a, b) = edge.endpoints();
                let from = to_device(&projected[a]);
                let to = to_device(&projected[b]);
                segments.push(Segment::new(from, to));
            }
        }
        segments
    }

    /// Replace everything previously drawn with the current segments
    pub fn emit<S>(&mut self, surface: &mut S) -> Result<usize, SurfaceError>
    where
        S: DisplaySurface + ?Sized,
    {
        self.clear(surface)?;

        let segments = self.segments();
        self.drawn.reserve(segments.len());
        for segment in &segments {
            let handle = surface.draw_line(segment)?;
            self.drawn.push(handle);
        }
        Ok(segments.len())
    }

    /// Remove every line this scene has drawn on the surface
    pub fn clear<S>(&mut self, surface: &mut S) -> Result<(), SurfaceError>
    where
        S: DisplaySurface + ?Sized,
    {
        while let Some(handle) = self.drawn.pop() {
            match surface.remove_line(handle) {
                Ok(()) => {}
                Err(SurfaceError::UnknownHandle(handle)) => {
                    warn!(?handle, "surface no longer knows a drawn line");
                }
                Err(err) => {
                    self.drawn.push(handle);
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Render one frame with no scene mutation
    pub fn tick<S>(&mut self, surface: &mut S) -> Result<FrameStats, SurfaceError>
    where
        S: DisplaySurface + ?Sized,
    {
        self.tick_with(surface, |_| {})
    }

    /// Render one frame: refresh the viewport, run `mutate`, project, emit.
    ///
    /// Safe to call repeatedly; the only state carried between calls is what
    /// the scene stores explicitly.
    pub fn tick_with<S, F>(
        &mut self,
        surface: &mut S,
        mutate: F,
    ) -> Result<FrameStats, SurfaceError>
    where
        S: DisplaySurface + ?Sized,
        F: FnOnce(&mut Scene),
    {
        self.viewport = Some(surface.viewport());
        mutate(self);
        self.project();
        let segments = self.emit(surface)?;

        let stats = FrameStats {
            shapes: self.shapes.len(),
            segments,
        };
        trace!(shapes = stats.shapes, segments = stats.segments, "frame rendered");
        Ok(stats)
    }

    /// Device-space bounds of all current segments as `(min, max)`
    pub fn bounding_box(&self) -> Option<(Point2<f32>, Point2<f32>)> {
        self.segments()
            .iter()
            .flat_map(|s| [s.from, s.to])
            .fold(None, |bounds, p| match bounds {
                None => Some((p, p)),
                Some((min, max)) => Some((
                    Point2::new(min.x.min(p.x), min.y.min(p.y)),
                    Point2::new(max.x.max(p.x), max.y.max(p.y)),
                )),
            })
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    fn cube_scene() -> Scene {
        let mut scene = Scene::default();
        scene.add_shape(Shape::cuboid(Point3::new(0.0, 0.0, 4.0), 1.0));
        scene
    }

    fn extent(scene: &Scene) -> f32 {
        let (min, max) = scene.bounding_box().unwrap();
        (max.x - min.x) * (max.y - min.y)
    }

    #[test]
    fn test_starts_idle() {
        let scene = cube_scene();
        assert_eq!(scene.state(), SceneState::Idle);
        assert_eq!(scene.viewport(), None);
    }

    #[test]
    fn test_single_cube_frame() {
        let mut scene = cube_scene();
        let mut surface = MemorySurface::new(600.0, 500.0);

        let stats = scene.tick(&mut surface).unwrap();
        assert_eq!(scene.state(), SceneState::Ready);
        assert_eq!(stats, FrameStats { shapes: 1, segments: 12 });

        let segments = surface.segments();
        assert_eq!(segments.len(), 12);
        let viewport = surface.viewport();
        for segment in &segments {
            assert!(viewport.contains(&segment.from), "{segment:?} leaves the viewport");
            assert!(viewport.contains(&segment.to), "{segment:?} leaves the viewport");
        }

        // Far corner (+0.5, +0.5, 4.5) lands at 0.5 / 5.5 on the plane
        let front = scene.shapes()[0].projected()[6];
        assert!((front.x - 0.5 / 5.5).abs() < 1e-6);
        let corner = Point2::new(300.0, 250.0) + front.coords * 200.0;

        // Each projected corner closes three edges of the outline
        let corners: Vec<Point2<f32>> = scene.shapes()[0]
            .projected()
            .iter()
            .map(|p| Point2::new(300.0, 250.0) + p.coords * 200.0)
            .collect();
        assert!(corners.contains(&corner));
        for (i, corner) in corners.iter().enumerate() {
            let copies = corners.iter().filter(|c| *c == corner).count();
            assert_eq!(copies, 1, "corner {i} not distinct");
            let uses = segments
                .iter()
                .filter(|s| s.from == *corner || s.to == *corner)
                .count();
            assert_eq!(uses, 3, "corner {i} should close three segments");
        }
    }

    #[test]
    fn test_emit_is_idempotent() {
        let mut scene = cube_scene();
        let mut surface = MemorySurface::new(600.0, 500.0);
        scene.tick(&mut surface).unwrap();

        let first = surface.segments();
        scene.emit(&mut surface).unwrap();
        let second = surface.segments();

        assert_eq!(first, second);
        assert_eq!(surface.len(), 12);
    }

    #[test]
    fn test_translate_keeps_window_offset() {
        let mut scene = Scene::default();
        let offset = scene.observer().offset();

        scene.translate_observer(Vector3::new(1.0, -2.0, 0.5));
        assert_eq!(scene.observer().position, Point3::new(1.0, -2.0, -0.5));
        assert_eq!(scene.observer().window_origin, Point3::new(0.5, -2.5, 0.5));
        assert_eq!(scene.observer().offset(), offset);
    }

    #[test]
    fn test_approaching_grows_the_shape() {
        let mut scene = cube_scene();
        let mut surface = MemorySurface::new(600.0, 500.0);
        scene.tick(&mut surface).unwrap();

        let mut previous = extent(&scene);
        for _ in 0..5 {
            scene
                .tick_with(&mut surface, |scene| {
                    scene.translate_observer(Vector3::new(0.0, 0.0, 0.5))
                })
                .unwrap();
            let current = extent(&scene);
            assert!(current > previous, "{current} should exceed {previous}");
            previous = current;
        }
    }

    #[test]
    fn test_mutation_runs_before_projection() {
        let delta = Vector3::new(0.2, 0.1, 0.3);
        let mut surface = MemorySurface::new(600.0, 500.0);

        let mut mutated = cube_scene();
        mutated
            .tick_with(&mut surface, |scene| scene.translate_observer(delta))
            .unwrap();

        let mut config = RenderConfig::default();
        config.observer = [0.2, 0.1, -0.7];
        config.window_origin = [-0.3, -0.4, 0.3];
        let mut expected = Scene::new(config);
        expected.add_shape(Shape::cuboid(Point3::new(0.0, 0.0, 4.0), 1.0));
        let mut other = MemorySurface::new(600.0, 500.0);
        expected.tick(&mut other).unwrap();

        for (a, b) in surface.segments().iter().zip(other.segments()) {
            assert!((a.from - b.from).norm() < 1e-3);
            assert!((a.to - b.to).norm() < 1e-3);
        }
    }

    #[test]
    fn test_mutation_can_edit_vertices() {
        let mut scene = cube_scene();
        let mut surface = MemorySurface::new(600.0, 500.0);
        scene
            .tick_with(&mut surface, |scene| {
                if let Some(shape) = scene.shape_mut(0) {
                    shape.vertices_mut()[0] = Point3::new(0.0, 0.0, 10.0);
                }
            })
            .unwrap();

        // Vertex shares the observer's X and Y, so it projects onto itself
        assert_eq!(scene.shapes()[0].projected()[0], Point2::new(0.0, 0.0));
    }

    #[test]
    fn test_duplicate_shapes_draw_twice() {
        let mut scene = Scene::default();
        let cube = Shape::cuboid(Point3::new(0.0, 0.0, 4.0), 1.0);
        assert_eq!(scene.add_shape(cube.clone()), 0);
        assert_eq!(scene.add_shape(cube), 1);

        let mut surface = MemorySurface::new(600.0, 500.0);
        let stats = scene.tick(&mut surface).unwrap();
        assert_eq!(stats.segments, 24);
        assert_eq!(surface.len(), 24);
    }

    #[test]
    fn test_idle_segments_use_zero_viewport() {
        let mut scene = cube_scene();
        scene.project();
        let front = scene.shapes()[0].projected()[6];
        let segments = scene.segments();
        assert!(segments.iter().any(|s| s.from == Point2::from(front.coords * 200.0)));
    }

    #[test]
    fn test_viewport_refreshed_each_tick() {
        let mut scene = cube_scene();
        let mut surface = MemorySurface::new(600.0, 500.0);
        scene.tick(&mut surface).unwrap();

        surface.resize(800.0, 400.0);
        scene.tick(&mut surface).unwrap();
        assert_eq!(scene.viewport(), Some(Viewport::new(800.0, 400.0)));
        assert_eq!(surface.len(), 12);
    }

    #[test]
    fn test_switching_surfaces_tolerates_unknown_handles() {
        let mut scene = cube_scene();
        let mut first = MemorySurface::new(600.0, 500.0);
        let mut second = MemorySurface::new(600.0, 500.0);

        scene.tick(&mut first).unwrap();
        second.draw_line(&Segment::new(Point2::origin(), Point2::origin())).unwrap();
        second.remove_line(LineHandle(0)).unwrap();

        scene.tick(&mut second).unwrap();
        assert_eq!(second.len(), 12);
        assert_eq!(first.len(), 12);
    }

    /// Memory surface that fails chosen draw and remove calls
    struct FailingSurface {
        inner: MemorySurface,
        draws: usize,
        fail_draw_at: Option<usize>,
        fail_next_remove: bool,
    }

    impl FailingSurface {
        fn new() -> Self {
            Self {
                inner: MemorySurface::new(600.0, 500.0),
                draws: 0,
                fail_draw_at: None,
                fail_next_remove: false,
            }
        }
    }

    impl DisplaySurface for FailingSurface {
        fn viewport(&self) -> Viewport {
            self.inner.viewport()
        }

        fn draw_line(&mut self, segment: &Segment) -> Result<LineHandle, SurfaceError> {
            self.draws += 1;
            if self.fail_draw_at == Some(self.draws) {
                self.fail_draw_at = None;
                return Err(SurfaceError::Backend("draw rejected".to_string()));
            }
            self.inner.draw_line(segment)
        }

        fn remove_line(&mut self, handle: LineHandle) -> Result<(), SurfaceError> {
            if std::mem::take(&mut self.fail_next_remove) {
                return Err(SurfaceError::Backend("remove rejected".to_string()));
            }
            self.inner.remove_line(handle)
        }
    }

    #[test]
    fn test_surface_failures_keep_handles_tracked() {
        let mut scene = cube_scene();
        let mut surface = FailingSurface::new();

        // Sixth draw fails: the five lines already drawn stay tracked
        surface.fail_draw_at = Some(6);
        let err = scene.tick(&mut surface).unwrap_err();
        assert!(matches!(err, SurfaceError::Backend(_)));
        assert_eq!(surface.inner.len(), 5);
        assert_eq!(scene.drawn, surface.inner.handles());

        // A failed remove keeps the handle for the next attempt
        surface.fail_next_remove = true;
        assert!(scene.tick(&mut surface).is_err());
        assert_eq!(surface.inner.len(), 5);
        assert_eq!(scene.drawn, surface.inner.handles());

        let stats = scene.tick(&mut surface).unwrap();
        assert_eq!(stats.segments, 12);
        assert_eq!(surface.inner.len(), 12);
        assert_eq!(scene.drawn.len(), 12);
    }

    #[test]
    fn test_clear_removes_drawn_lines() {
        let mut scene = cube_scene();
        let mut surface = MemorySurface::new(600.0, 500.0);
        scene.tick(&mut surface).unwrap();

        scene.clear(&mut surface).unwrap();
        assert!(surface.is_empty());
    }

    #[test]
    fn test_empty_scene_has_no_bounds() {
        let mut scene = Scene::default();
        let mut surface = MemorySurface::new(600.0, 500.0);
        let stats = scene.tick(&mut surface).unwrap();
        assert_eq!(stats, FrameStats::default());
        assert_eq!(scene.bounding_box(), None);
    }
}
