//! Character-cell display surface for terminal rendering
use std::collections::BTreeMap;
use std::io::Write;

use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use wire3d_core::{DisplaySurface, LineHandle, Segment, SurfaceError, Viewport};

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f32 = 2.0;

const EMPTY: char = ' ';

/// Display surface that rasterizes segments into a grid of characters.
///
/// Device units are cell heights: a unit step along X covers
/// `CELL_ASPECT` columns so that cubes stay square on screen.
pub struct TerminalSurface {
    width: usize,
    height: usize,
    lines: BTreeMap<LineHandle, Segment>,
    next_handle: u64,
    char_buffer: Vec<char>,
}

impl TerminalSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            lines: BTreeMap::new(),
            next_handle: 0,
            char_buffer: vec![EMPTY; width * height],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.char_buffer = vec![EMPTY; width * height];
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Character at a cell after the last `rasterize`
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        if x < self.width && y < self.height {
            Some(self.char_buffer[y * self.width + x])
        } else {
            None
        }
    }

    /// Redraw the character buffer from the live segments
    pub fn rasterize(&mut self) {
        self.char_buffer.fill(EMPTY);

        let segments: Vec<Segment> = self.lines.values().copied().collect();
        for segment in &segments {
            if let Some((from, to)) = self.clip(segment) {
                self.plot_line(from, to);
            }
        }
    }

    /// Map a segment to cell space and clip it to the grid (Cohen-Sutherland).
    ///
    /// Runs in f64 so that huge but finite device coordinates survive the
    /// aspect stretch and the intersection arithmetic.
    fn clip(&self, segment: &Segment) -> Option<(Point2<f32>, Point2<f32>)> {
        if self.width == 0 || self.height == 0 {
            return None;
        }

        let (x0, y0, x1, y1) = segment.coords();
        let aspect = f64::from(CELL_ASPECT);
        let mut a = Point2::new(f64::from(x0) * aspect, f64::from(y0));
        let mut b = Point2::new(f64::from(x1) * aspect, f64::from(y1));
        if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
            return None;
        }

        let max = Point2::new((self.width - 1) as f64, (self.height - 1) as f64);
        loop {
            let (code_a, code_b) = (outcode(&a, &max), outcode(&b, &max));
            if code_a | code_b == 0 {
                return Some((a.cast::<f32>(), b.cast::<f32>()));
            }
            if code_a & code_b != 0 {
                return None;
            }

            let code = if code_a != 0 { code_a } else { code_b };
            let delta = b - a;
            let moved = if code & ABOVE != 0 {
                Point2::new(a.x + delta.x * (0.0 - a.y) / delta.y, 0.0)
            } else if code & BELOW != 0 {
                Point2::new(a.x + delta.x * (max.y - a.y) / delta.y, max.y)
            } else if code & RIGHT != 0 {
                Point2::new(max.x, a.y + delta.y * (max.x - a.x) / delta.x)
            } else {
                Point2::new(0.0, a.y + delta.y * (0.0 - a.x) / delta.x)
            };

            if code == code_a {
                a = moved;
            } else {
                b = moved;
            }
        }
    }

    fn plot_line(&mut self, from: Point2<f32>, to: Point2<f32>) {
        let delta = to - from;
        let glyph = line_glyph(delta.x, delta.y);
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;

        for step in 0..=steps {
            let point = from + delta * (step as f32 / steps as f32);
            let x = point.x.round() as usize;
            let y = point.y.round() as usize;
            if x < self.width && y < self.height {
                self.char_buffer[y * self.width + x] = glyph;
            }
        }
    }

    /// Queue the character buffer to a writer
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetForegroundColor(Color::Cyan))?;
        for (y, row) in self.char_buffer.chunks(self.width.max(1)).enumerate() {
            if y > 0 {
                writer.queue(Print("\r\n"))?;
            }
            let line: String = row.iter().collect();
            writer.queue(Print(line))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl DisplaySurface for TerminalSurface {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f32 / CELL_ASPECT, self.height as f32)
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

const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const ABOVE: u8 = 4;
const BELOW: u8 = 8;

/// Which sides of the grid a cell-space point lies beyond
fn outcode(point: &Point2<f64>, max: &Point2<f64>) -> u8 {
    let mut code = 0;
    if point.x < 0.0 {
        code |= LEFT;
    } else if point.x > max.x {
        code |= RIGHT;
    }
    if point.y < 0.0 {
        code |= ABOVE;
    } else if point.y > max.y {
        code |= BELOW;
    }
    code
}

/// Pick a character that follows the line's direction (rows grow downward)
fn line_glyph(dx: f32, dy: f32) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ay * 2.0 < ax {
        '-'
    } else if ax * 2.0 < ay {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}
