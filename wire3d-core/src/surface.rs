//! Display surface contract between the core and its host
use std::collections::BTreeMap;

use nalgebra::Point2;

use crate::error::SurfaceError;

/// Opaque identifier for a line drawn on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineHandle(pub u64);

/// A 2D line segment in device units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point2<f32>,
    pub to: Point2<f32>,
}

impl Segment {
    pub fn new(from: Point2<f32>, to: Point2<f32>) -> Self {
        Self { from, to }
    }

    /// The four coordinates as `(x0, y0, x1, y1)`
    pub fn coords(&self) -> (f32, f32, f32, f32) {
        (self.from.x, self.from.y, self.to.x, self.to.y)
    }
}

/// Size of the drawable area in device units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point2<f32> {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True if the point lies inside `[0, width] x [0, height]`
    pub fn contains(&self, point: &Point2<f32>) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

/// Something the scene can draw line segments onto.
///
/// Implementations own the actual pixels (a canvas, a terminal, a GPU
/// buffer). The scene only asks for the viewport size and adds or removes
/// individual segments by handle.
pub trait DisplaySurface {
    /// Current drawable size
    fn viewport(&self) -> Viewport;

    /// Submit a segment for drawing
    fn draw_line(&mut self, segment: &Segment) -> Result<LineHandle, SurfaceError>;

    /// Remove a segment previously returned by `draw_line`
    fn remove_line(&mut self, handle: LineHandle) -> Result<(), SurfaceError>;
}

/// In-memory surface that just records live segments
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    viewport: Viewport,
    lines: BTreeMap<LineHandle, Segment>,
    next_handle: u64,
}

impl MemorySurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            lines: BTreeMap::new(),
            next_handle: 0,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    /// Live segments in draw order
    pub fn segments(&self) -> Vec<Segment> {
        self.lines.values().copied().collect()
    }

    pub fn handles(&self) -> Vec<LineHandle> {
        self.lines.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl DisplaySurface for MemorySurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn draw_line(&mut self, segment: &Segment) -> Result<LineHandle, SurfaceError> {
        let handle = LineHandle(self.next_handle);
        self.next_handle += 1;
        self.lines.insert(handle, *segment);
        Ok(handle)
    }

    fn remove_line(&mut self, handle: LineHandle) -> Result<(), SurfaceError> {
        self.lines
            .remove(&handle)
            .map(|_| ())
            .ok_or(SurfaceError::UnknownHandle(handle))
    }
}
