//! Terminal drawing surface backed by a display list of line segments
//!
//! Device pixels are Braille dots: a terminal cell is 2 dots wide and 4 dots
//! tall. With a pixel ratio of 2 one logical unit is one column wide and
//! half a row tall, which keeps logical units roughly square.

use crate::surface::{Point, Rgba, StrokeStyle, Surface};

/// Terminal background the translucent strokes are composited over
const BACKGROUND: Rgba = Rgba::rgb(0, 0, 0);

/// One stroked segment in device pixels, y pointing down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub color: Rgba,
}

/// Display-list surface drawn by the terminal UI each frame
#[derive(Debug)]
pub struct TerminalCanvas {
    width: u32,
    height: u32,
    scale: f32,
    segments: Vec<Segment>,
}

impl Default for TerminalCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalCanvas {
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            scale: 1.0,
            segments: Vec::new(),
        }
    }

    /// Dots needed to cover `cols` x `rows` cells
    pub fn dots_for_cells(cols: u16, rows: u16) -> (u32, u32) {
        (u32::from(cols) * 2, u32::from(rows) * 4)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl Surface for TerminalCanvas {
    fn backing_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.scale = 1.0;
        self.segments.clear();
    }

    fn scale(&mut self, factor: f32) {
        self.scale *= factor;
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let (left, top) = (x * self.scale, y * self.scale);
        let (right, bottom) = (left + width * self.scale, top + height * self.scale);
        // Strokes past the edges are invisible, so a full-surface clear drops them too
        if left <= 0.0
            && top <= 0.0
            && right >= self.width as f32
            && bottom >= self.height as f32
        {
            self.segments.clear();
            return;
        }
        let inside = |px: f32, py: f32| px >= left && px <= right && py >= top && py <= bottom;
        self.segments
            .retain(|s| !(inside(s.x1, s.y1) && inside(s.x2, s.y2)));
    }

    fn clear_all(&mut self) {
        self.segments.clear();
    }

    fn stroke_path(&mut self, points: &[Point], style: &StrokeStyle) {
        let scale = self.scale;
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let color = style.paint.color_at((a.x + b.x) / 2.0).over(BACKGROUND);
            self.segments.push(Segment {
                x1: a.x * scale,
                y1: a.y * scale,
                x2: b.x * scale,
                y2: b.y * scale,
                color,
            });
        }
    }
}
